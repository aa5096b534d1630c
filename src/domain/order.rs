//! Order domain entity, rental kinds and placement payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::fleet::{Car, Driver, Tour};

/// Lifecycle of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Ongoing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Statuses that block a user from placing another order.
    pub const ACTIVE: [OrderStatus; 2] = [OrderStatus::Pending, OrderStatus::Ongoing];

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Ongoing => "ongoing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse the storage representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "ongoing" => Some(OrderStatus::Ongoing),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// How the customer pays for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    EWallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::EWallet => "e_wallet",
        }
    }

    /// Parse the storage representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cash" => Some(PaymentMethod::Cash),
            "transfer" => Some(PaymentMethod::Transfer),
            "e_wallet" => Some(PaymentMethod::EWallet),
            _ => None,
        }
    }
}

/// The three mutually exclusive ways an order can be fulfilled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RentalKind {
    Car,
    Driver,
    Tour,
}

impl RentalKind {
    /// Pick the rental kind from the requested foreign keys.
    ///
    /// Zero means "not requested". The car id does not take part in the
    /// decision: a driver rental may carry a car as well.
    pub fn select(driver_id: i32, tour_id: i32) -> Self {
        if tour_id == 0 && driver_id == 0 {
            RentalKind::Car
        } else if tour_id == 0 {
            RentalKind::Driver
        } else {
            RentalKind::Tour
        }
    }
}

impl std::fmt::Display for RentalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RentalKind::Car => "car",
            RentalKind::Driver => "driver",
            RentalKind::Tour => "tour",
        };
        f.write_str(name)
    }
}

/// A validated order placement request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrder {
    pub car_id: i32,
    pub driver_id: i32,
    pub tour_id: i32,
    pub start_period: NaiveDate,
    pub end_period: NaiveDate,
    pub payment_method: PaymentMethod,
}

impl PlaceOrder {
    pub fn kind(&self) -> RentalKind {
        RentalKind::select(self.driver_id, self.tour_id)
    }

    /// Number of billed days, both ends inclusive.
    pub fn rental_days(&self) -> i64 {
        (self.end_period - self.start_period).num_days() + 1
    }

    /// The requested car, if any.
    pub fn car(&self) -> Option<i32> {
        (self.car_id != 0).then_some(self.car_id)
    }
}

/// Fleet stock claimed by an order, applied atomically with its insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// Take one unit of car stock
    Car { car_id: i32 },
    /// Mark the driver busy and optionally take one unit of car stock
    Driver { driver_id: i32, car_id: Option<i32> },
}

/// Data needed to persist a new order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: i32,
    pub total_amount: i64,
    pub start_period: NaiveDate,
    pub end_period: NaiveDate,
    pub payment_method: PaymentMethod,
    pub reservation: Reservation,
}

/// Order domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub car_id: Option<i32>,
    pub driver_id: Option<i32>,
    pub tour_id: Option<i32>,
    pub total_amount: i64,
    pub status: OrderStatus,
    pub start_period: NaiveDate,
    pub end_period: NaiveDate,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order together with the fleet items it refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub order: Order,
    pub car: Option<Car>,
    pub driver: Option<Driver>,
    pub tour: Option<Tour>,
}

/// Order as returned to the customer
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponse {
    #[schema(example = 12)]
    pub id: i32,
    #[schema(example = 1050000)]
    pub total_amount: i64,
    pub status: OrderStatus,
    pub start_period: NaiveDate,
    pub end_period: NaiveDate,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car: Option<Car>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<Driver>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tour: Option<Tour>,
}

impl From<OrderDetails> for OrderResponse {
    fn from(details: OrderDetails) -> Self {
        let OrderDetails {
            order,
            car,
            driver,
            tour,
        } = details;

        Self {
            id: order.id,
            total_amount: order.total_amount,
            status: order.status,
            start_period: order.start_period,
            end_period: order.end_period,
            payment_method: order.payment_method,
            car,
            driver,
            tour,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(car_id: i32, driver_id: i32, tour_id: i32) -> PlaceOrder {
        PlaceOrder {
            car_id,
            driver_id,
            tour_id,
            start_period: date(2026, 1, 10),
            end_period: date(2026, 1, 12),
            payment_method: PaymentMethod::Cash,
        }
    }

    #[test]
    fn test_car_selected_when_no_driver_and_no_tour() {
        assert_eq!(request(5, 0, 0).kind(), RentalKind::Car);
        assert_eq!(request(0, 0, 0).kind(), RentalKind::Car);
    }

    #[test]
    fn test_driver_selected_when_only_tour_is_zero() {
        assert_eq!(request(0, 3, 0).kind(), RentalKind::Driver);
        assert_eq!(request(5, 3, 0).kind(), RentalKind::Driver);
    }

    #[test]
    fn test_tour_selected_otherwise() {
        assert_eq!(request(0, 2, 7).kind(), RentalKind::Tour);
        assert_eq!(request(0, 0, 7).kind(), RentalKind::Tour);
    }

    #[test]
    fn test_rental_days_are_inclusive() {
        assert_eq!(request(5, 0, 0).rental_days(), 3);

        let mut same_day = request(5, 0, 0);
        same_day.end_period = same_day.start_period;
        assert_eq!(same_day.rental_days(), 1);
    }

    #[test]
    fn test_active_statuses() {
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::Ongoing.is_active());
        assert!(!OrderStatus::Completed.is_active());
        assert!(!OrderStatus::Cancelled.is_active());
    }

    #[test]
    fn test_storage_strings_parse_back() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Ongoing,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PaymentMethod::parse("e_wallet"), Some(PaymentMethod::EWallet));
        assert_eq!(PaymentMethod::parse("bitcoin"), None);
    }
}
