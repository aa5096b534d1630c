//! Order database entity for SeaORM.
//!
//! Car, driver and tour are nullable foreign keys; which of them is set
//! depends on the rental kind the order was placed with.

use sea_orm::entity::prelude::*;

use crate::domain::{Order, OrderStatus, PaymentMethod};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub car_id: Option<i32>,
    pub driver_id: Option<i32>,
    pub tour_id: Option<i32>,
    pub total_amount: i64,
    pub status: String,
    pub start_period: Date,
    pub end_period: Date,
    pub payment_method: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Order {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = OrderStatus::parse(&model.status).ok_or_else(|| {
            AppError::internal(format!(
                "order {} has unknown status '{}'",
                model.id, model.status
            ))
        })?;
        let payment_method = PaymentMethod::parse(&model.payment_method).ok_or_else(|| {
            AppError::internal(format!(
                "order {} has unknown payment method '{}'",
                model.id, model.payment_method
            ))
        })?;

        Ok(Order {
            id: model.id,
            user_id: model.user_id,
            car_id: model.car_id,
            driver_id: model.driver_id,
            tour_id: model.tour_id,
            total_amount: model.total_amount,
            status,
            start_period: model.start_period,
            end_period: model.end_period,
            payment_method,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
