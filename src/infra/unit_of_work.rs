//! Unit of Work: single entry point to every repository.
//!
//! Services depend on the trait so tests can swap in mocked repositories.
//! Multi-row writes that must be atomic (order placement) open their
//! transaction inside the owning repository.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    DocumentRepository, DocumentStore, FleetRepository, FleetStore, OrderRepository, OrderStore,
    TokenRepository, TokenStore, UserRepository, UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn fleet(&self) -> Arc<dyn FleetRepository>;

    fn orders(&self) -> Arc<dyn OrderRepository>;

    fn documents(&self) -> Arc<dyn DocumentRepository>;

    fn tokens(&self) -> Arc<dyn TokenRepository>;
}

/// Database-backed UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    fleet_repo: Arc<FleetStore>,
    order_repo: Arc<OrderStore>,
    document_repo: Arc<DocumentStore>,
    token_repo: Arc<TokenStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            fleet_repo: Arc::new(FleetStore::new(db.clone())),
            order_repo: Arc::new(OrderStore::new(db.clone())),
            document_repo: Arc::new(DocumentStore::new(db.clone())),
            token_repo: Arc::new(TokenStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn fleet(&self) -> Arc<dyn FleetRepository> {
        self.fleet_repo.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.order_repo.clone()
    }

    fn documents(&self) -> Arc<dyn DocumentRepository> {
        self.document_repo.clone()
    }

    fn tokens(&self) -> Arc<dyn TokenRepository> {
        self.token_repo.clone()
    }
}

/// UnitOfWork over arbitrary repositories, for tests.
#[cfg(any(test, feature = "test-utils"))]
pub struct TestUnitOfWork {
    pub users: Arc<dyn UserRepository>,
    pub fleet: Arc<dyn FleetRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub tokens: Arc<dyn TokenRepository>,
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for TestUnitOfWork {
    /// Every repository is a mock without expectations
    fn default() -> Self {
        use super::repositories::{
            MockDocumentRepository, MockFleetRepository, MockOrderRepository,
            MockTokenRepository, MockUserRepository,
        };

        Self {
            users: Arc::new(MockUserRepository::new()),
            fleet: Arc::new(MockFleetRepository::new()),
            orders: Arc::new(MockOrderRepository::new()),
            documents: Arc::new(MockDocumentRepository::new()),
            tokens: Arc::new(MockTokenRepository::new()),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn fleet(&self) -> Arc<dyn FleetRepository> {
        self.fleet.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    fn documents(&self) -> Arc<dyn DocumentRepository> {
        self.documents.clone()
    }

    fn tokens(&self) -> Arc<dyn TokenRepository> {
        self.tokens.clone()
    }
}
