//! API middleware.

mod auth;
mod present;
mod session;

pub use auth::{require_bearer, CurrentUser};
pub use present::{present_errors, wants_html};
pub use session::{require_admin_session, session_layer};
