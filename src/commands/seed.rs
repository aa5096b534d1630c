//! Seed command - Fixture data for development.

use crate::cli::args::SeedArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Seeder};

/// Execute the seed command
pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    if config.is_production() {
        return Err(AppError::bad_request("Refusing to seed in production"));
    }

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let seeded = Seeder::new(db.connection())
        .run(args.module.as_deref())
        .await?;

    for module in seeded {
        println!("seeded: {}", module);
    }

    Ok(())
}
