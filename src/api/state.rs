//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database, SessionBackend};
use crate::services::{AuthService, DocumentService, OrderService, ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub order_service: Arc<dyn OrderService>,
    pub document_service: Arc<dyn DocumentService>,
    /// Admin web sessions
    pub sessions: SessionBackend,
    pub config: Arc<Config>,
    /// Database handle for health checks; absent when services are injected
    pub database: Option<Arc<Database>>,
    /// Redis cache, present when sessions are stored in Redis
    pub cache: Option<Arc<Cache>>,
}

impl AppState {
    /// Create application state from a database connection and config.
    pub fn from_config(
        database: Arc<Database>,
        cache: Option<Arc<Cache>>,
        sessions: SessionBackend,
        config: Config,
    ) -> Self {
        let container = Services::from_connection(database.connection().clone(), config.clone());

        Self {
            auth_service: container.auth(),
            order_service: container.orders(),
            document_service: container.documents(),
            sessions,
            config: Arc::new(config),
            database: Some(database),
            cache,
        }
    }

    /// Create application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        order_service: Arc<dyn OrderService>,
        document_service: Arc<dyn DocumentService>,
        sessions: SessionBackend,
        config: Config,
    ) -> Self {
        Self {
            auth_service,
            order_service,
            document_service,
            sessions,
            config: Arc::new(config),
            database: None,
            cache: None,
        }
    }
}
