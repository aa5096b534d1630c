//! Read access to cars, drivers and tour packages.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};

use super::entities::{car, driver, tour};
use crate::domain::{Car, Driver, Tour};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FleetRepository: Send + Sync {
    async fn find_car(&self, id: i32) -> AppResult<Option<Car>>;

    async fn find_driver(&self, id: i32) -> AppResult<Option<Driver>>;

    async fn find_tour(&self, id: i32) -> AppResult<Option<Tour>>;
}

pub struct FleetStore {
    db: DatabaseConnection,
}

impl FleetStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FleetRepository for FleetStore {
    async fn find_car(&self, id: i32) -> AppResult<Option<Car>> {
        let model = car::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Car::from))
    }

    async fn find_driver(&self, id: i32) -> AppResult<Option<Driver>> {
        let model = driver::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Driver::from))
    }

    async fn find_tour(&self, id: i32) -> AppResult<Option<Tour>> {
        let model = tour::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Tour::from))
    }
}
