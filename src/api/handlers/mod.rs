//! HTTP request handlers.

pub mod admin_auth_handler;
pub mod auth_handler;
pub mod document_handler;
pub mod order_handler;

pub use admin_auth_handler::admin_routes;
pub use auth_handler::auth_routes;
pub use document_handler::document_routes;
pub use order_handler::order_routes;
