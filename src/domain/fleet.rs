//! Rentable fleet items: cars, drivers and tour packages.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reported when a car has no stock left
pub const CAR_UNAVAILABLE: &str = "Car is not available";

/// Reported when a driver is already booked
pub const DRIVER_UNAVAILABLE: &str = "Driver is not available";

/// A rentable car model; `stock` counts units that can still be rented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Car {
    #[schema(example = 5)]
    pub id: i32,
    #[schema(example = "Avanza")]
    pub name: String,
    #[schema(example = "Toyota")]
    pub brand: String,
    #[schema(example = 7)]
    pub seats: i32,
    #[schema(example = 350000)]
    pub price_per_day: i64,
    #[schema(example = 3)]
    pub stock: i32,
}

impl Car {
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }
}

/// A driver that can be hired, optionally together with a car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Driver {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Joko")]
    pub name: String,
    #[schema(example = "+62811000111")]
    pub phone: String,
    #[schema(example = 200000)]
    pub price_per_day: i64,
    pub is_available: bool,
}

/// A tour package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Tour {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Bromo Sunrise")]
    pub name: String,
    #[schema(example = "Probolinggo")]
    pub destination: String,
    #[schema(example = 1500000)]
    pub price: i64,
}
