pub mod admin_quiz;
pub mod auth;
pub mod forum;
pub mod http;
pub mod profile;
pub mod quiz;

pub use admin_quiz::HttpAdminQuizAdapter;
pub use auth::HttpAuthAdapter;
pub use forum::HttpForumAdapter;
pub use http::HttpBackend;
pub use profile::HttpProfileAdapter;
pub use quiz::HttpQuizAdapter;
