//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, SchemaChange, Seeder};

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    tracing::info!("Running migration command...");

    if args.action == MigrateAction::Refresh && config.is_production() {
        return Err(AppError::bad_request(
            "Refusing to refresh the database in production",
        ));
    }

    // The schema is left alone until the chosen action runs
    let db = Database::open(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let change = match args.action {
        MigrateAction::Status => {
            for state in db.migration_states().await? {
                println!("{}", state);
            }
            return Ok(());
        }
        MigrateAction::Up => SchemaChange::Upgrade,
        MigrateAction::Down => SchemaChange::RevertLast,
        MigrateAction::Fresh | MigrateAction::Refresh => {
            tracing::warn!("Dropping every table before migrating");
            SchemaChange::Rebuild
        }
    };

    db.apply(change).await?;
    tracing::info!(?change, "Migrations completed");

    if args.action == MigrateAction::Refresh {
        let seeded = Seeder::new(db.connection()).run(None).await?;
        tracing::info!(modules = ?seeded, "Database refreshed");
    }

    Ok(())
}
