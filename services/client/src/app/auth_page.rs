//! services/client/src/app/auth_page.rs
//!
//! Login, registration, logout and `whoami`. Successful logins are written
//! to the session store so later invocations are authenticated.

use phishing_quiz_core::session::{Role, Session};
use tracing::info;

use super::console::Console;
use super::session_store::SessionStore;
use super::state::AppState;
use crate::error::ClientError;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Returns the first problem found, if any.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.user_name.trim().is_empty() {
            return Err("User name is required.");
        }
        if self.email.trim().chars().count() <= 3 {
            return Err("Enter a valid email address.");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 6 characters.");
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match.");
        }
        Ok(())
    }
}

pub async fn login(
    state: &AppState,
    console: &mut dyn Console,
    store: &SessionStore,
) -> Result<Session, ClientError> {
    let email = console.input("Email", "")?;
    let password = console.password("Password")?;
    let tokens = state.auth.login(email.trim(), &password).await?;
    let session = store.save(tokens)?;
    info!("Logged in.");
    console.show(&describe(&session));
    Ok(session)
}

/// Registers a new account. Returns `None` when the form was invalid.
pub async fn register(
    state: &AppState,
    console: &mut dyn Console,
    store: &SessionStore,
) -> Result<Option<Session>, ClientError> {
    let form = RegistrationForm {
        user_name: console.input("User name", "")?,
        email: console.input("Email", "")?,
        password: console.password("Password")?,
        confirm_password: console.password("Repeat password")?,
    };
    if let Err(problem) = form.validate() {
        console.show(problem);
        return Ok(None);
    }
    let tokens = state
        .auth
        .register(form.user_name.trim(), form.email.trim(), &form.password)
        .await?;
    let session = store.save(tokens)?;
    console.show(&describe(&session));
    Ok(Some(session))
}

/// Tells the backend (best effort) and always forgets the local session.
pub async fn logout(state: &AppState, store: &SessionStore) -> Result<(), ClientError> {
    if state.session.is_logged_in() {
        state.auth.logout().await?;
    }
    store.clear()?;
    info!("Logged out.");
    Ok(())
}

pub fn describe(session: &Session) -> String {
    if !session.is_logged_in() {
        return "Not logged in.".to_string();
    }
    let name = session
        .claims
        .as_ref()
        .and_then(|c| c.name.clone().or_else(|| c.subject.clone()))
        .unwrap_or_else(|| "unknown user".to_string());
    let role = if session.is_admin() {
        "admin".to_string()
    } else {
        match session.claims.as_ref().and_then(|c| c.roles.first()) {
            Some(Role::Other(other)) => other.clone(),
            _ => "user".to_string(),
        }
    };
    format!("Logged in as {} ({}).", name, role)
}
