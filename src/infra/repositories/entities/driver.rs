//! Driver database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Driver;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "drivers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub price_per_day: i64,
    pub is_available: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Driver {
    fn from(model: Model) -> Self {
        Driver {
            id: model.id,
            name: model.name,
            phone: model.phone,
            price_per_day: model.price_per_day,
            is_available: model.is_available,
        }
    }
}
