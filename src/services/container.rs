//! Service Container - Centralized service access.
//!
//! Wires every service to one shared Unit of Work built from the
//! database connection.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, DocumentManager, DocumentService, OrderManager, OrderService,
};
use crate::config::Config;
use crate::infra::{FileStorage, Persistence};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn orders(&self) -> Arc<dyn OrderService>;

    fn documents(&self) -> Arc<dyn DocumentService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    order_service: Arc<dyn OrderService>,
    document_service: Arc<dyn DocumentService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let storage = FileStorage::new(config.public_path.clone());

        Self {
            order_service: Arc::new(OrderManager::new(uow.clone(), config.order_timeout)),
            document_service: Arc::new(DocumentManager::new(uow.clone(), storage)),
            auth_service: Arc::new(Authenticator::new(uow, config)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }

    fn documents(&self) -> Arc<dyn DocumentService> {
        self.document_service.clone()
    }
}
