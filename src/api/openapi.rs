//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for the customer API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, document_handler, order_handler};
use crate::domain::{
    Car, DocumentKind, DocumentResponse, Driver, OrderResponse, OrderStatus, PaymentMethod, Tour,
};
use crate::errors::{ErrorResponse, FieldError};
use crate::services::TokenResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rent-N-Go API",
        version = "0.1.0",
        description = "Car, driver and tour rental booking backend",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::login,
        auth_handler::refresh,
        order_handler::history,
        order_handler::place,
        document_handler::show,
        document_handler::upload,
    ),
    components(
        schemas(
            auth_handler::LoginRequest,
            auth_handler::RefreshRequest,
            TokenResponse,
            order_handler::PlaceOrderRequest,
            OrderResponse,
            OrderStatus,
            PaymentMethod,
            Car,
            Driver,
            Tour,
            DocumentKind,
            DocumentResponse,
            ErrorResponse,
            FieldError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Customer login and token refresh"),
        (name = "Orders", description = "Order history and placement"),
        (name = "Documents", description = "SIM and NIK uploads")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
