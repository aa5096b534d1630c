//! Development fixtures.
//!
//! Seeding is grouped in modules so a single one can be re-run with
//! `seed <module>`. Every module is idempotent.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use crate::config::{SEED_ADMIN_EMAIL, SEED_ADMIN_NAME, SEED_ADMIN_PASSWORD};
use crate::domain::{hash_password, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::entities::{car, driver, tour, user};

/// Seed modules in the order they run
pub const SEED_MODULES: &[&str] = &["user", "fleet"];

#[derive(Debug, Clone, Copy)]
enum SeedModule {
    User,
    Fleet,
}

impl SeedModule {
    const ALL: [SeedModule; 2] = [SeedModule::User, SeedModule::Fleet];

    fn name(self) -> &'static str {
        match self {
            SeedModule::User => "user",
            SeedModule::Fleet => "fleet",
        }
    }
}

/// Whether `module` runs for the requested selection (`None` runs all).
pub fn selects(requested: Option<&str>, module: &str) -> bool {
    requested.map_or(true, |r| r == module)
}

/// Populates the database with fixture data
pub struct Seeder<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> Seeder<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Run the requested module, or all of them. Returns the modules that ran.
    pub async fn run(&self, module: Option<&str>) -> AppResult<Vec<&'static str>> {
        if let Some(requested) = module {
            if !SEED_MODULES.contains(&requested) {
                return Err(AppError::validation(format!(
                    "Unknown seed module '{}', expected one of: {}",
                    requested,
                    SEED_MODULES.join(", ")
                )));
            }
        }

        let mut seeded = Vec::new();
        for step in SeedModule::ALL {
            if !selects(module, step.name()) {
                continue;
            }
            match step {
                SeedModule::User => self.seed_users().await?,
                SeedModule::Fleet => self.seed_fleet().await?,
            }
            tracing::info!(module = step.name(), "Seeded");
            seeded.push(step.name());
        }

        Ok(seeded)
    }

    async fn seed_users(&self) -> AppResult<()> {
        let exists = user::Entity::find()
            .filter(user::Column::Email.eq(SEED_ADMIN_EMAIL))
            .one(self.db)
            .await?
            .is_some();
        if exists {
            tracing::debug!("Admin user already present");
            return Ok(());
        }

        let now = Utc::now();
        user::ActiveModel {
            name: Set(SEED_ADMIN_NAME.to_string()),
            email: Set(SEED_ADMIN_EMAIL.to_string()),
            password_hash: Set(hash_password(SEED_ADMIN_PASSWORD)?),
            role: Set(UserRole::Admin.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    async fn seed_fleet(&self) -> AppResult<()> {
        let now = Utc::now();

        if car::Entity::find().count(self.db).await? == 0 {
            let cars = [
                ("Avanza", "Toyota", 7, 350_000, 3),
                ("Brio", "Honda", 5, 250_000, 4),
                ("Xpander", "Mitsubishi", 7, 400_000, 2),
            ];
            for (name, brand, seats, price_per_day, stock) in cars {
                car::ActiveModel {
                    name: Set(name.to_string()),
                    brand: Set(brand.to_string()),
                    seats: Set(seats),
                    price_per_day: Set(price_per_day),
                    stock: Set(stock),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(self.db)
                .await?;
            }
        }

        if driver::Entity::find().count(self.db).await? == 0 {
            let drivers = [
                ("Joko", "+62811000111", 200_000),
                ("Slamet", "+62811000222", 225_000),
            ];
            for (name, phone, price_per_day) in drivers {
                driver::ActiveModel {
                    name: Set(name.to_string()),
                    phone: Set(phone.to_string()),
                    price_per_day: Set(price_per_day),
                    is_available: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(self.db)
                .await?;
            }
        }

        if tour::Entity::find().count(self.db).await? == 0 {
            let tours = [
                ("Bromo Sunrise", "Probolinggo", 1_500_000),
                ("Kawah Ijen Blue Fire", "Banyuwangi", 1_750_000),
            ];
            for (name, destination, price) in tours {
                tour::ActiveModel {
                    name: Set(name.to_string()),
                    destination: Set(destination.to_string()),
                    price: Set(price),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(self.db)
                .await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_selection_runs_every_module() {
        assert!(SEED_MODULES.iter().all(|m| selects(None, m)));
    }

    #[test]
    fn test_module_names_match_public_list() {
        let names: Vec<&str> = SeedModule::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names, SEED_MODULES);
    }

    #[test]
    fn test_selection_runs_only_that_module() {
        assert!(selects(Some("user"), "user"));
        assert!(!selects(Some("user"), "fleet"));
    }
}
