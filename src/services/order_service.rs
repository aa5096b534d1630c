//! Order service - history and placement for the signed-in customer.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::dispatch::{OrderDispatcher, Placement};
use crate::domain::{OrderResponse, PlaceOrder};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

pub const ALREADY_HAS_ORDER: &str = "You already have an order!";
pub const NO_ORDERS: &str = "Ups, you seems like not having any order.";

#[async_trait]
pub trait OrderService: Send + Sync {
    /// Orders of the user, newest first. Fails with 404 when there are none.
    async fn history(&self, user_id: i32) -> AppResult<Vec<OrderResponse>>;

    /// Place an order unless the user already holds an active one.
    async fn place(&self, user_id: i32, request: PlaceOrder) -> AppResult<Placement>;
}

pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
    dispatcher: OrderDispatcher,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(uow: Arc<U>, timeout: Duration) -> Self {
        let dispatcher = OrderDispatcher::new(uow.as_ref(), timeout);
        Self { uow, dispatcher }
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn history(&self, user_id: i32) -> AppResult<Vec<OrderResponse>> {
        let orders = self.uow.orders().list_by_user(user_id).await?;
        if orders.is_empty() {
            return Err(AppError::missing(NO_ORDERS));
        }
        Ok(orders.into_iter().map(OrderResponse::from).collect())
    }

    async fn place(&self, user_id: i32, request: PlaceOrder) -> AppResult<Placement> {
        // Checked up front only; two racing requests can both pass
        if self.uow.orders().has_active_order(user_id).await? {
            return Err(AppError::bad_request(ALREADY_HAS_ORDER));
        }
        self.dispatcher.dispatch(user_id, request).await
    }
}
