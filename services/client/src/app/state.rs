//! services/client/src/app/state.rs
//!
//! Defines the shared state every page receives.

use std::sync::Arc;

use phishing_quiz_core::ports::{
    AdminQuizService, AuthService, ForumService, ProfileService, QuizService,
};
use phishing_quiz_core::session::Session;

use crate::adapters::{
    HttpAdminQuizAdapter, HttpAuthAdapter, HttpBackend, HttpForumAdapter, HttpProfileAdapter,
    HttpQuizAdapter,
};
use crate::config::Config;
use crate::error::ClientError;

//=========================================================================================
// AppState
//=========================================================================================

/// The shared application state, created once per invocation.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Session,
    pub quiz: Arc<dyn QuizService>,
    pub admin: Arc<dyn AdminQuizService>,
    pub profile: Arc<dyn ProfileService>,
    pub forum: Arc<dyn ForumService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppState {
    /// Wires the HTTP adapters, authenticated with the session's token.
    pub fn connect(config: Arc<Config>, session: Session) -> Result<Self, ClientError> {
        let backend = HttpBackend::new(
            config.api_base_url.clone(),
            config.request_timeout,
            session.access_token().map(str::to_string),
        )?;

        Ok(Self {
            quiz: Arc::new(HttpQuizAdapter::new(backend.clone())),
            admin: Arc::new(HttpAdminQuizAdapter::new(backend.clone())),
            profile: Arc::new(HttpProfileAdapter::new(backend.clone())),
            forum: Arc::new(HttpForumAdapter::new(backend.clone())),
            auth: Arc::new(HttpAuthAdapter::new(backend)),
            config,
            session,
        })
    }

    pub fn require_login(&self) -> Result<(), ClientError> {
        if self.session.is_logged_in() {
            Ok(())
        } else {
            Err(ClientError::NotLoggedIn)
        }
    }

    /// Admin pages need a token whose claims carry the admin role.
    pub fn require_admin(&self) -> Result<(), ClientError> {
        self.require_login()?;
        if self.session.is_admin() {
            Ok(())
        } else {
            Err(ClientError::Forbidden)
        }
    }
}
