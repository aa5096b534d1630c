//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod car;
pub mod document;
pub mod driver;
pub mod order;
pub mod refresh_token;
pub mod tour;
pub mod user;
