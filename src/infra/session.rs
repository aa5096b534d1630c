//! Session storage for the admin web surface.
//!
//! `tower-sessions` owns the cookie and the per-request `Session`; this
//! module only decides where records live: Redis through [`Cache`] in
//! deployments, process memory in development and tests.

use async_trait::async_trait;
use time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{Error as StoreError, Result as StoreResult};
use tower_sessions::{MemoryStore, SessionStore};

use super::cache::Cache;

/// Session records as JSON in Redis, expiring with the session.
#[derive(Clone)]
pub struct RedisSessionStore {
    cache: Cache,
}

impl RedisSessionStore {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore").finish_non_exhaustive()
    }
}

/// Seconds until `expiry`, at least one so Redis accepts the TTL
fn ttl_seconds(expiry: OffsetDateTime, now: OffsetDateTime) -> u64 {
    (expiry - now).whole_seconds().max(1) as u64
}

fn backend_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, record: &Record) -> StoreResult<()> {
        let ttl = ttl_seconds(record.expiry_date, OffsetDateTime::now_utc());
        self.cache
            .set_session(&record.id.to_string(), record, ttl)
            .await
            .map_err(backend_error)
    }

    async fn load(&self, session_id: &Id) -> StoreResult<Option<Record>> {
        self.cache
            .get_session(&session_id.to_string())
            .await
            .map_err(backend_error)
    }

    async fn delete(&self, session_id: &Id) -> StoreResult<()> {
        self.cache
            .delete_session(&session_id.to_string())
            .await
            .map_err(backend_error)
    }
}

/// The store picked by `SESSION_DRIVER`.
#[derive(Debug, Clone)]
pub enum SessionBackend {
    Memory(MemoryStore),
    Redis(RedisSessionStore),
}

impl SessionBackend {
    /// In-process store; sessions are lost on restart.
    pub fn memory() -> Self {
        SessionBackend::Memory(MemoryStore::default())
    }
}

#[async_trait]
impl SessionStore for SessionBackend {
    async fn create(&self, record: &mut Record) -> StoreResult<()> {
        match self {
            SessionBackend::Memory(store) => store.create(record).await,
            SessionBackend::Redis(store) => store.create(record).await,
        }
    }

    async fn save(&self, record: &Record) -> StoreResult<()> {
        match self {
            SessionBackend::Memory(store) => store.save(record).await,
            SessionBackend::Redis(store) => store.save(record).await,
        }
    }

    async fn load(&self, session_id: &Id) -> StoreResult<Option<Record>> {
        match self {
            SessionBackend::Memory(store) => store.load(session_id).await,
            SessionBackend::Redis(store) => store.load(session_id).await,
        }
    }

    async fn delete(&self, session_id: &Id) -> StoreResult<()> {
        match self {
            SessionBackend::Memory(store) => store.delete(session_id).await,
            SessionBackend::Redis(store) => store.delete(session_id).await,
        }
    }
}
