//! crates/phishing_quiz_core/src/ports.rs
//!
//! Defines the service contracts (traits) the quiz client consumes.
//! These traits form the boundary of the hexagonal architecture: the wizards
//! and pages depend on them, and the HTTP adapters implement them.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{
    AdminQuizDraft, AdminQuizItemDraft, AnswerOutcome, ForumPost, LeaderboardEntry,
    NewForumPost, Profile, TodayQuiz,
};
use crate::session::TokenPair;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    /// The backend refused the request and said why.
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait QuizService: Send + Sync {
    /// Fetches today's quiz items, in display order.
    async fn today_quiz(&self) -> PortResult<TodayQuiz>;

    /// Submits the user's label for one item.
    async fn submit_answer(&self, item_id: Uuid, answer_is_phishing: bool)
        -> PortResult<AnswerOutcome>;

    async fn leaderboard(&self, limit: u32) -> PortResult<Vec<LeaderboardEntry>>;
}

#[async_trait]
pub trait AdminQuizService: Send + Sync {
    /// Fetches the drafts stored for `date`. `None` means no quiz exists yet.
    async fn quiz_items_for(&self, date: NaiveDate) -> PortResult<Option<Vec<AdminQuizItemDraft>>>;

    async fn create_quiz(&self, draft: &AdminQuizDraft) -> PortResult<()>;

    async fn update_quiz(&self, date: NaiveDate, items: &[AdminQuizItemDraft]) -> PortResult<()>;

    async fn delete_quiz(&self, date: NaiveDate) -> PortResult<()>;
}

#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn my_profile(&self) -> PortResult<Profile>;
}

#[async_trait]
pub trait ForumService: Send + Sync {
    async fn list_posts(&self, page: u32, page_size: u32) -> PortResult<Vec<ForumPost>>;

    async fn create_post(&self, post: &NewForumPost) -> PortResult<()>;

    async fn delete_post(&self, post_id: Uuid) -> PortResult<()>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> PortResult<TokenPair>;

    async fn register(&self, user_name: &str, email: &str, password: &str)
        -> PortResult<TokenPair>;

    /// Invalidates the session server-side. Callers treat failures as non-fatal.
    async fn logout(&self) -> PortResult<()>;
}
