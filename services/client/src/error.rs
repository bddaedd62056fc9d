//! services/client/src/error.rs
//!
//! Defines the primary error type for the client service.

use crate::config::ConfigError;
use phishing_quiz_core::ports::PortError;
use phishing_quiz_core::wizard::WizardError;

/// The primary error type for the `client` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A wizard refused an action or its request failed.
    #[error("{0}")]
    Wizard(#[from] WizardError),

    /// Represents an error building the underlying HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g. reading the session file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The terminal prompt failed or was interrupted.
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("You are not logged in. Run `phishquiz login` first.")]
    NotLoggedIn,

    #[error("This command requires an administrator account.")]
    Forbidden,

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
