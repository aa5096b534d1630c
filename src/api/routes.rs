//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{admin_routes, auth_routes, document_routes, order_routes};
use super::middleware::{present_errors, require_bearer, session_layer};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::{APP_NAME, APP_SLOGAN, PUBLIC_URL_PREFIX};

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Admin web pages (cookie sessions)
        .merge(admin_routes().layer(session_layer(state.sessions.clone(), &state.config)))
        // Customer API
        .nest("/api", api_routes(state.clone()))
        // Uploaded assets
        .nest_service(PUBLIC_URL_PREFIX, ServeDir::new(&state.config.public_path))
        // Global middleware
        .layer(middleware::from_fn_with_state(state.clone(), present_errors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/orders", order_routes())
        .nest("/documents", document_routes())
        .route_layer(middleware::from_fn_with_state(state, require_bearer));

    Router::new().nest("/auth", auth_routes()).merge(protected)
}

#[derive(Serialize)]
struct Banner {
    name: &'static str,
    slogan: &'static str,
}

/// Root endpoint
async fn root() -> Json<Banner> {
    Json(Banner {
        name: APP_NAME,
        slogan: APP_SLOGAN,
    })
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<ServiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redis: Option<ServiceStatus>,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => ServiceStatus {
                status: "healthy",
                error: None,
            },
            Err(e) => ServiceStatus {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Health check endpoint with database and Redis connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match &state.database {
        Some(db) => Some(ServiceStatus::from_result(db.ping().await)),
        None => None,
    };
    let redis = match &state.cache {
        Some(cache) => Some(ServiceStatus::from_result(cache.ping().await)),
        None => None,
    };

    let all_healthy = [&database, &redis]
        .into_iter()
        .flatten()
        .all(ServiceStatus::is_healthy);

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth { database, redis },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
