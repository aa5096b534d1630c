//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They reach repositories through the Unit of
//! Work so tests can substitute mocks.

mod auth_service;
pub mod container;
pub mod dispatch;
mod document_service;
mod order_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use dispatch::{
    CarRental, DriverRental, OrderDispatcher, Placement, RentalStrategy, TourBooking,
};
pub use document_service::{DocumentManager, DocumentService};
pub use order_service::{OrderManager, OrderService, ALREADY_HAS_ORDER, NO_ORDERS};
