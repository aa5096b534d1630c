//! Postgres pool, migrations and seeding.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr,
    EntityTrait, QueryOrder, Statement,
};
use sea_orm_migration::{seaql_migrations, MigratorTrait};

use crate::config::Config;

pub mod migrations;
pub mod seeder;

pub use migrations::Migrator;
pub use seeder::Seeder;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_CONNECTIONS: u32 = 10;

/// Schema changes the `migrate` command can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaChange {
    /// Apply every pending migration
    Upgrade,
    /// Revert the most recent migration
    RevertLast,
    /// Drop all tables, then apply every migration
    Rebuild,
}

/// One defined migration and whether the database has applied it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationState {
    pub name: String,
    pub applied: bool,
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.applied { "applied" } else { "pending" };
        write!(f, "{}: {}", self.name, state)
    }
}

/// Pair migrations in definition order with the versions recorded as applied.
fn migration_states<I>(defined: I, applied: &HashSet<String>) -> Vec<MigrationState>
where
    I: IntoIterator<Item = String>,
{
    defined
        .into_iter()
        .map(|name| MigrationState {
            applied: applied.contains(&name),
            name,
        })
        .collect()
}

/// Shared SeaORM connection pool
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the pool without touching the schema.
    pub async fn open(config: &Config) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(MAX_CONNECTIONS)
            .connect_timeout(CONNECT_TIMEOUT)
            .sqlx_logging(!config.is_production());

        let connection = SeaDatabase::connect(options).await?;
        Ok(Self { connection })
    }

    /// Open the pool and bring the schema up to date, as the server and
    /// seeder need it.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let db = Self::open(config).await?;
        db.apply(SchemaChange::Upgrade).await.inspect_err(|e| {
            tracing::error!("Failed to run migrations: {}", e);
        })?;

        tracing::info!("Database connected and migrations applied");
        Ok(db)
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    pub async fn apply(&self, change: SchemaChange) -> Result<(), DbErr> {
        match change {
            SchemaChange::Upgrade => Migrator::up(&self.connection, None).await,
            SchemaChange::RevertLast => Migrator::down(&self.connection, Some(1)).await,
            SchemaChange::Rebuild => Migrator::fresh(&self.connection).await,
        }
    }

    /// Every defined migration, oldest first, with its applied flag.
    pub async fn migration_states(&self) -> Result<Vec<MigrationState>, DbErr> {
        let applied: HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        let defined = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect::<Vec<_>>();

        Ok(migration_states(defined, &applied))
    }

    /// `SELECT 1`, used by the health check.
    pub async fn ping(&self) -> Result<(), DbErr> {
        let backend = self.connection.get_database_backend();
        self.connection
            .execute(Statement::from_string(backend, "SELECT 1"))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_states_keep_definition_order() {
        let applied: HashSet<String> = ["m20240101_000001_create_users".to_string()].into();
        let states = migration_states(
            vec![
                "m20240101_000001_create_users".to_string(),
                "m20240101_000002_create_fleet".to_string(),
            ],
            &applied,
        );

        assert_eq!(states.len(), 2);
        assert!(states[0].applied);
        assert!(!states[1].applied);
        assert_eq!(states[1].to_string(), "m20240101_000002_create_fleet: pending");
    }

    #[test]
    fn test_migration_names_match_definitions() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        let states = migration_states(names.clone(), &HashSet::new());

        assert_eq!(states.len(), names.len());
        assert!(states.iter().all(|state| !state.applied));
    }
}
