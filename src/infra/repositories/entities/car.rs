//! Car database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Car;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub brand: String,
    pub seats: i32,
    pub price_per_day: i64,
    pub stock: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Car {
    fn from(model: Model) -> Self {
        Car {
            id: model.id,
            name: model.name,
            brand: model.brand,
            seats: model.seats,
            price_per_day: model.price_per_day,
            stock: model.stock,
        }
    }
}
