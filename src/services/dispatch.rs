//! Order dispatch - routes a placement to its rental strategy.
//!
//! Each placement runs in its own task and is awaited under a timeout.
//! Strategies share one mutex around the availability check and the
//! reservation so concurrent placements cannot oversell a fleet item.

use async_trait::async_trait;
use axum::http::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::domain::{
    NewOrder, OrderDetails, OrderResponse, PlaceOrder, RentalKind, Reservation, CAR_UNAVAILABLE,
    DRIVER_UNAVAILABLE,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{FleetRepository, OrderRepository, UnitOfWork};

pub const ORDER_PLACED: &str = "Order placed successfully";
pub const ORDER_TIMED_OUT: &str = "Order placement timed out";
pub const TOUR_UNSUPPORTED: &str = "Tour booking is not supported yet";

/// Outcome of a strategy; the handler responds with `status` verbatim.
#[derive(Debug, Clone)]
pub struct Placement {
    pub status: StatusCode,
    pub message: String,
    pub order: OrderResponse,
}

#[async_trait]
pub trait RentalStrategy: Send + Sync {
    fn kind(&self) -> RentalKind;

    /// Place the order. `reservation_lock` must be held from the
    /// availability check until the reservation is stored.
    async fn place(
        &self,
        user_id: i32,
        request: PlaceOrder,
        reservation_lock: Arc<Mutex<()>>,
    ) -> AppResult<Placement>;
}

/// Rent a car without driver.
pub struct CarRental {
    fleet: Arc<dyn FleetRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl CarRental {
    pub fn new(fleet: Arc<dyn FleetRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { fleet, orders }
    }
}

#[async_trait]
impl RentalStrategy for CarRental {
    fn kind(&self) -> RentalKind {
        RentalKind::Car
    }

    async fn place(
        &self,
        user_id: i32,
        request: PlaceOrder,
        reservation_lock: Arc<Mutex<()>>,
    ) -> AppResult<Placement> {
        let car_id = request
            .car()
            .ok_or_else(|| AppError::validation("car_id is required to rent a car"))?;
        let days = request.rental_days();

        let _guard = reservation_lock.lock().await;

        let mut car = self
            .fleet
            .find_car(car_id)
            .await?
            .ok_or_missing("Car not found")?;
        if !car.is_available() {
            return Err(AppError::bad_request(CAR_UNAVAILABLE));
        }

        let order = self
            .orders
            .place(NewOrder {
                user_id,
                total_amount: car.price_per_day * days,
                start_period: request.start_period,
                end_period: request.end_period,
                payment_method: request.payment_method,
                reservation: Reservation::Car { car_id },
            })
            .await?;
        car.stock -= 1;

        tracing::info!(order_id = order.id, user_id, car_id, "Car rented");

        Ok(Placement {
            status: StatusCode::CREATED,
            message: ORDER_PLACED.to_string(),
            order: OrderDetails {
                order,
                car: Some(car),
                driver: None,
                tour: None,
            }
            .into(),
        })
    }
}

/// Hire a driver, optionally together with a car.
pub struct DriverRental {
    fleet: Arc<dyn FleetRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl DriverRental {
    pub fn new(fleet: Arc<dyn FleetRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { fleet, orders }
    }
}

#[async_trait]
impl RentalStrategy for DriverRental {
    fn kind(&self) -> RentalKind {
        RentalKind::Driver
    }

    async fn place(
        &self,
        user_id: i32,
        request: PlaceOrder,
        reservation_lock: Arc<Mutex<()>>,
    ) -> AppResult<Placement> {
        let driver_id = request.driver_id;
        let days = request.rental_days();

        let _guard = reservation_lock.lock().await;

        let mut driver = self
            .fleet
            .find_driver(driver_id)
            .await?
            .ok_or_missing("Driver not found")?;
        if !driver.is_available {
            return Err(AppError::bad_request(DRIVER_UNAVAILABLE));
        }

        let car = match request.car() {
            Some(car_id) => {
                let car = self
                    .fleet
                    .find_car(car_id)
                    .await?
                    .ok_or_missing("Car not found")?;
                if !car.is_available() {
                    return Err(AppError::bad_request(CAR_UNAVAILABLE));
                }
                Some(car)
            }
            None => None,
        };

        let daily = driver.price_per_day + car.as_ref().map_or(0, |c| c.price_per_day);
        let order = self
            .orders
            .place(NewOrder {
                user_id,
                total_amount: daily * days,
                start_period: request.start_period,
                end_period: request.end_period,
                payment_method: request.payment_method,
                reservation: Reservation::Driver {
                    driver_id,
                    car_id: car.as_ref().map(|c| c.id),
                },
            })
            .await?;
        driver.is_available = false;
        let car = car.map(|mut c| {
            c.stock -= 1;
            c
        });

        tracing::info!(order_id = order.id, user_id, driver_id, "Driver hired");

        Ok(Placement {
            status: StatusCode::CREATED,
            message: ORDER_PLACED.to_string(),
            order: OrderDetails {
                order,
                car,
                driver: Some(driver),
                tour: None,
            }
            .into(),
        })
    }
}

/// Tour packages can be browsed but not booked yet.
pub struct TourBooking;

#[async_trait]
impl RentalStrategy for TourBooking {
    fn kind(&self) -> RentalKind {
        RentalKind::Tour
    }

    async fn place(
        &self,
        user_id: i32,
        request: PlaceOrder,
        _reservation_lock: Arc<Mutex<()>>,
    ) -> AppResult<Placement> {
        tracing::info!(user_id, tour_id = request.tour_id, "Tour booking requested");
        Err(AppError::NotImplemented(TOUR_UNSUPPORTED.to_string()))
    }
}

/// Runs the strategy matching a placement request.
pub struct OrderDispatcher {
    car: Arc<dyn RentalStrategy>,
    driver: Arc<dyn RentalStrategy>,
    tour: Arc<dyn RentalStrategy>,
    reservation_lock: Arc<Mutex<()>>,
    timeout: Duration,
}

impl OrderDispatcher {
    /// Dispatcher with the standard strategies over the given repositories
    pub fn new<U: UnitOfWork>(uow: &U, timeout: Duration) -> Self {
        Self::with_strategies(
            Arc::new(CarRental::new(uow.fleet(), uow.orders())),
            Arc::new(DriverRental::new(uow.fleet(), uow.orders())),
            Arc::new(TourBooking),
            timeout,
        )
    }

    pub fn with_strategies(
        car: Arc<dyn RentalStrategy>,
        driver: Arc<dyn RentalStrategy>,
        tour: Arc<dyn RentalStrategy>,
        timeout: Duration,
    ) -> Self {
        Self {
            car,
            driver,
            tour,
            reservation_lock: Arc::new(Mutex::new(())),
            timeout,
        }
    }

    pub fn strategy(&self, kind: RentalKind) -> Arc<dyn RentalStrategy> {
        match kind {
            RentalKind::Car => self.car.clone(),
            RentalKind::Driver => self.driver.clone(),
            RentalKind::Tour => self.tour.clone(),
        }
    }

    /// Spawn the matching strategy and wait for it, at most `timeout`.
    ///
    /// On timeout the task is aborted, so a placement that has not stored
    /// its order yet never does. A placement whose order was already
    /// written stays placed: the client still gets 503, and retrying is
    /// answered with "You already have an order!".
    pub async fn dispatch(&self, user_id: i32, request: PlaceOrder) -> AppResult<Placement> {
        let strategy = self.strategy(request.kind());
        let kind = strategy.kind();
        let lock = self.reservation_lock.clone();

        tracing::debug!(user_id, %kind, "Dispatching order");
        let mut handle =
            tokio::spawn(async move { strategy.place(user_id, request, lock).await });

        match tokio::time::timeout(self.timeout, &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                if join_error.is_panic() {
                    tracing::error!(user_id, %kind, "Order strategy panicked");
                }
                Err(AppError::internal(format!(
                    "{} strategy did not complete: {}",
                    kind, join_error
                )))
            }
            Err(_) => {
                handle.abort();
                tracing::warn!(user_id, %kind, timeout = ?self.timeout, "Order placement timed out");
                Err(AppError::Timeout(ORDER_TIMED_OUT.to_string()))
            }
        }
    }
}
