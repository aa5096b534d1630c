//! Tour package database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Tour;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tours")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub destination: String,
    pub price: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Tour {
    fn from(model: Model) -> Self {
        Tour {
            id: model.id,
            name: model.name,
            destination: model.destination,
            price: model.price,
        }
    }
}
