//! Order repository: history lookups and atomic placement.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::entities::{car, driver, order, tour};
use crate::domain::{
    Car, Driver, NewOrder, Order, OrderDetails, OrderStatus, Reservation, Tour, CAR_UNAVAILABLE,
    DRIVER_UNAVAILABLE,
};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Whether the user holds an order in an active status
    async fn has_active_order(&self, user_id: i32) -> AppResult<bool>;

    /// All orders of a user, newest first, with their fleet items
    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<OrderDetails>>;

    /// Apply the reservation and insert the order in one transaction.
    ///
    /// Fails with a bad request when the reserved item is no longer available.
    async fn place(&self, order: NewOrder) -> AppResult<Order>;
}

pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn has_active_order(&self, user_id: i32) -> AppResult<bool> {
        let active = OrderStatus::ACTIVE.iter().map(|s| s.as_str());
        let count = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .filter(order::Column::Status.is_in(active))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<OrderDetails>> {
        let models = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let car_ids: Vec<i32> = models.iter().filter_map(|m| m.car_id).collect();
        let driver_ids: Vec<i32> = models.iter().filter_map(|m| m.driver_id).collect();
        let tour_ids: Vec<i32> = models.iter().filter_map(|m| m.tour_id).collect();

        let (cars, drivers, tours) = tokio::try_join!(
            load_cars(&self.db, car_ids),
            load_drivers(&self.db, driver_ids),
            load_tours(&self.db, tour_ids),
        )?;

        models
            .into_iter()
            .map(|model| {
                let car = model.car_id.and_then(|id| cars.get(&id).cloned());
                let driver = model.driver_id.and_then(|id| drivers.get(&id).cloned());
                let tour = model.tour_id.and_then(|id| tours.get(&id).cloned());
                Ok(OrderDetails {
                    order: Order::try_from(model)?,
                    car,
                    driver,
                    tour,
                })
            })
            .collect()
    }

    async fn place(&self, new_order: NewOrder) -> AppResult<Order> {
        let txn = self.db.begin().await?;

        if let Err(e) = reserve(&txn, new_order.reservation).await {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            return Err(e);
        }

        let (car_id, driver_id) = match new_order.reservation {
            Reservation::Car { car_id } => (Some(car_id), None),
            Reservation::Driver { driver_id, car_id } => (car_id, Some(driver_id)),
        };

        let now = Utc::now();
        let model = order::ActiveModel {
            user_id: Set(new_order.user_id),
            car_id: Set(car_id),
            driver_id: Set(driver_id),
            tour_id: Set(None),
            total_amount: Set(new_order.total_amount),
            status: Set(OrderStatus::Pending.as_str().to_string()),
            start_period: Set(new_order.start_period),
            end_period: Set(new_order.end_period),
            payment_method: Set(new_order.payment_method.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Order::try_from(model)
    }
}

async fn reserve(txn: &DatabaseTransaction, reservation: Reservation) -> AppResult<()> {
    match reservation {
        Reservation::Car { car_id } => take_car(txn, car_id).await,
        Reservation::Driver { driver_id, car_id } => {
            book_driver(txn, driver_id).await?;
            if let Some(car_id) = car_id {
                take_car(txn, car_id).await?;
            }
            Ok(())
        }
    }
}

/// Decrement stock only while some is left.
async fn take_car(txn: &DatabaseTransaction, car_id: i32) -> AppResult<()> {
    let result = car::Entity::update_many()
        .col_expr(car::Column::Stock, Expr::col(car::Column::Stock).sub(1))
        .col_expr(car::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(car::Column::Id.eq(car_id))
        .filter(car::Column::Stock.gt(0))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::bad_request(CAR_UNAVAILABLE));
    }
    Ok(())
}

async fn book_driver(txn: &DatabaseTransaction, driver_id: i32) -> AppResult<()> {
    let result = driver::Entity::update_many()
        .col_expr(driver::Column::IsAvailable, Expr::value(false))
        .col_expr(driver::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(driver::Column::Id.eq(driver_id))
        .filter(driver::Column::IsAvailable.eq(true))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::bad_request(DRIVER_UNAVAILABLE));
    }
    Ok(())
}

async fn load_cars(db: &DatabaseConnection, ids: Vec<i32>) -> Result<HashMap<i32, Car>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = car::Entity::find()
        .filter(car::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| (m.id, Car::from(m))).collect())
}

async fn load_drivers(
    db: &DatabaseConnection,
    ids: Vec<i32>,
) -> Result<HashMap<i32, Driver>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = driver::Entity::find()
        .filter(driver::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| (m.id, Driver::from(m))).collect())
}

async fn load_tours(db: &DatabaseConnection, ids: Vec<i32>) -> Result<HashMap<i32, Tour>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = tour::Entity::find()
        .filter(tour::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| (m.id, Tour::from(m))).collect())
}
