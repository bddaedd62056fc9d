//! crates/phishing_quiz_core/src/wizard/mod.rs
//!
//! The step wizard and its two uses: answering today's quiz and authoring
//! a quiz for a calendar day.

pub mod authoring;
pub mod engine;
pub mod quiz;

pub use authoring::{AuthoringWizard, DraftField, DraftGate, StepRecap};
pub use engine::{Stage, StepPolicy, StepWizard, Submission};
pub use quiz::{AnswerGate, QuizStep, QuizSummary, QuizWizard};

use crate::ports::PortError;

/// Why a wizard action was refused or failed. Every refusal leaves the
/// wizard exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("The current step is not complete")]
    StepIncomplete,
    #[error("Another request is still in progress")]
    Busy,
    #[error("The wizard is at the summary stage")]
    AtSummary,
    #[error("This action is only available at the summary stage")]
    NotAtSummary,
    #[error("Step {0} does not exist")]
    NoSuchStep(usize),
    #[error("This step can no longer be changed")]
    Locked,
    #[error("No answer has been selected")]
    NoChoice,
    #[error("This item has already been answered")]
    AlreadyAnswered,
    #[error("No date has been selected")]
    NoDateSelected,
    /// The response belongs to a view that has since been replaced.
    #[error("The response arrived for a view that is no longer active")]
    Stale,
    #[error(transparent)]
    Port(#[from] PortError),
}

pub type WizardResult<T> = Result<T, WizardError>;
