//! Rent-N-Go - Car, driver and tour rental backend
//!
//! Customers sign in with JWTs, look up their order history, place car
//! or driver orders and upload their SIM/NIK documents. Administrators
//! sign in to a cookie-session web area.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **services**: Application use cases and order dispatch
//! - **infra**: Database, Redis, sessions and file storage
//! - **api**: HTTP handlers, middleware, views and routes
//! - **types**: Shared response envelope
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Rebuild and seed a development database
//! cargo run -- migrate refresh
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::{create_router, AppState};
pub use config::Config;
pub use domain::{User, UserRole};
pub use errors::{AppError, AppResult};
