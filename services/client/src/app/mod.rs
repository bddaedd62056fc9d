pub mod admin_page;
pub mod auth_page;
pub mod console;
pub mod forum_page;
pub mod profile_page;
pub mod quiz_page;
pub mod session_store;
pub mod state;

pub use console::{Console, TerminalConsole};
pub use session_store::SessionStore;
pub use state::AppState;
