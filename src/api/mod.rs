//! API layer - HTTP handlers and middleware
//!
//! This module contains all HTTP-related concerns:
//! - Request handlers for the admin web pages and the customer API
//! - Middleware (JWT auth, sessions, error presentation)
//! - Custom extractors
//! - HTML views and route definitions

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod views;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
