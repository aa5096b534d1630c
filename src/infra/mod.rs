//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations, seeding and repositories
//! - Redis-backed cache and sessions
//! - Local storage for uploaded files

pub mod cache;
pub mod db;
pub mod repositories;
pub mod session;
pub mod storage;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, MigrationState, Migrator, SchemaChange, Seeder};
pub use repositories::{
    DocumentRepository, FleetRepository, OrderRepository, RefreshGrant, TokenRepository,
    UserRepository,
};
pub use session::{RedisSessionStore, SessionBackend};
pub use storage::{FileStorage, ImageType};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::TestUnitOfWork;
