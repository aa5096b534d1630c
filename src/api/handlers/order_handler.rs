//! Order history and placement handlers.

use axum::{extract::State, routing::get, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{OrderResponse, PaymentMethod, PlaceOrder};
use crate::errors::AppResult;
use crate::types::ApiResponse;

/// Order placement payload.
///
/// Zero ids mean "not requested": no driver and no tour rents a car,
/// a driver without tour hires the driver, anything with a tour books it.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_period"))]
pub struct PlaceOrderRequest {
    #[serde(default)]
    #[validate(range(min = 0, message = "car_id must not be negative"))]
    #[schema(example = 5)]
    pub car_id: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "driver_id must not be negative"))]
    #[schema(example = 0)]
    pub driver_id: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "tour_id must not be negative"))]
    #[schema(example = 0)]
    pub tour_id: i32,
    #[schema(example = "2026-01-10")]
    pub start_period: NaiveDate,
    #[schema(example = "2026-01-12")]
    pub end_period: NaiveDate,
    pub payment_method: PaymentMethod,
}

fn validate_period(request: &PlaceOrderRequest) -> Result<(), ValidationError> {
    if request.end_period < request.start_period {
        let mut error = ValidationError::new("period");
        error.message = Some("end_period must not be before start_period".into());
        return Err(error);
    }
    Ok(())
}

impl From<PlaceOrderRequest> for PlaceOrder {
    fn from(request: PlaceOrderRequest) -> Self {
        Self {
            car_id: request.car_id,
            driver_id: request.driver_id,
            tour_id: request.tour_id,
            start_period: request.start_period,
            end_period: request.end_period,
            payment_method: request.payment_method,
        }
    }
}

pub fn order_routes() -> Router<AppState> {
    Router::new().route("/", get(history).post(place))
}

/// Orders of the signed-in customer
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order history, newest first", body = [OrderResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "The customer has no orders")
    )
)]
pub async fn history(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<ApiResponse<Vec<OrderResponse>>> {
    let orders = state.order_service.history(current_user.id).await?;
    Ok(ApiResponse::ok("Order history", orders))
}

/// Place an order
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Invalid payload, existing order or unavailable item"),
        (status = 404, description = "Car or driver not found"),
        (status = 501, description = "Tour booking is not supported yet"),
        (status = 503, description = "Order placement timed out")
    )
)]
pub async fn place(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<PlaceOrderRequest>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let placement = state
        .order_service
        .place(current_user.id, payload.into())
        .await?;

    Ok(ApiResponse::new(
        placement.status,
        placement.message,
        placement.order,
    ))
}
