//! Repository layer - Data access abstraction
//!
//! Each repository is a trait plus a SeaORM-backed store so services can
//! be tested against mocks.

mod document_repository;
pub(crate) mod entities;
mod fleet_repository;
mod order_repository;
mod token_repository;
mod user_repository;

pub use document_repository::{DocumentRepository, DocumentStore};
pub use fleet_repository::{FleetRepository, FleetStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use token_repository::{RefreshGrant, TokenRepository, TokenStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use document_repository::MockDocumentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use fleet_repository::MockFleetRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use token_repository::MockTokenRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
