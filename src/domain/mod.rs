//! Domain layer - Core business entities and logic
//!
//! Rental orders, fleet items, users and their identity documents,
//! independent of persistence and transport concerns.

pub mod document;
pub mod fleet;
pub mod order;
pub mod password;
pub mod user;

pub use document::{Document, DocumentKind, DocumentResponse, UploadedFile};
pub use fleet::{Car, Driver, Tour, CAR_UNAVAILABLE, DRIVER_UNAVAILABLE};
pub use order::{
    NewOrder, Order, OrderDetails, OrderResponse, OrderStatus, PaymentMethod, PlaceOrder,
    RentalKind, Reservation,
};
pub use password::{hash_password, verify_password};
pub use user::{NewUser, User, UserResponse, UserRole};
