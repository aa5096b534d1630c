//! Integration tests for API endpoints.
//!
//! The real services run against in-memory repositories, so no database
//! or Redis connection is required.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};

use common::{
    get, json_body, json_request, text_body, TestApp, ADMIN_EMAIL, CUSTOMER_EMAIL,
    OTHER_CUSTOMER_EMAIL, PASSWORD,
};
use rent_n_go::api::handlers::admin_auth_handler::WRONG_CREDENTIALS;
use rent_n_go::domain::{CAR_UNAVAILABLE, DRIVER_UNAVAILABLE};
use rent_n_go::errors::INVALID_PAYLOAD_MESSAGE;
use rent_n_go::services::{ALREADY_HAS_ORDER, NO_ORDERS};

fn car_order(car_id: i32) -> serde_json::Value {
    serde_json::json!({
        "car_id": car_id,
        "start_period": "2026-01-10",
        "end_period": "2026-01-12",
        "payment_method": "cash"
    })
}

fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn location(response: &axum::http::Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// `name=value` part of the Set-Cookie header
fn session_cookie(response: &axum::http::Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("session cookie");
    set_cookie.split(';').next().unwrap().to_string()
}

// =============================================================================
// Public Endpoints
// =============================================================================

#[tokio::test]
async fn test_root_returns_banner() {
    let app = TestApp::new();

    let response = app.send(get("/", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["name"], "Rent-N-Go Backend");
    assert!(body["slogan"].is_string());
}

#[tokio::test]
async fn test_health_without_backends_is_healthy() {
    let app = TestApp::new();

    let response = app.send(get("/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

// =============================================================================
// Customer Authentication
// =============================================================================

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = TestApp::new();

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({ "email": CUSTOMER_EMAIL, "password": "nope" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_invalid_email_lists_field_errors() {
    let app = TestApp::new();

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({ "email": "not-an-email", "password": PASSWORD }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], INVALID_PAYLOAD_MESSAGE);
    assert_eq!(body["errors"][0]["field"], "email");
}

#[tokio::test]
async fn test_refresh_token_is_single_use() {
    let app = TestApp::new();
    let response = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({ "email": CUSTOMER_EMAIL, "password": PASSWORD }),
        ))
        .await;
    let refresh_token = json_body(response).await["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();
    let payload = serde_json::json!({ "refresh_token": refresh_token });

    let first = app
        .send(json_request("POST", "/api/auth/refresh", None, payload.clone()))
        .await;
    assert_eq!(first.status(), StatusCode::OK);
    let rotated = json_body(first).await;
    assert_ne!(rotated["refresh_token"], payload["refresh_token"]);

    let replay = app
        .send(json_request("POST", "/api/auth/refresh", None, payload))
        .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_orders_require_a_token() {
    let app = TestApp::new();

    let response = app.send(get("/api/orders", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.send(get("/api/orders", Some("garbage"))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_history_is_not_found() {
    let app = TestApp::new();
    let token = app.access_token(CUSTOMER_EMAIL).await;

    let response = app.send(get("/api/orders", Some(&token))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], NO_ORDERS);
}

#[tokio::test]
async fn test_car_order_is_placed_and_listed() {
    let app = TestApp::new();
    let token = app.access_token(CUSTOMER_EMAIL).await;

    let response = app
        .send(json_request("POST", "/api/orders", Some(&token), car_order(5)))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["status"], 201);
    assert_eq!(body["error"], false);
    assert_eq!(body["message"], "Order placed successfully");
    assert_eq!(body["data"]["total_amount"], 1_050_000);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["car"]["stock"], 0);
    assert_eq!(app.store.car_stock(5), Some(0));

    let response = app.send(get("/api/orders", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["car"]["id"], 5);
}

#[tokio::test]
async fn test_active_order_blocks_every_further_order() {
    let app = TestApp::new();
    let token = app.access_token(CUSTOMER_EMAIL).await;
    let placed = app
        .send(json_request("POST", "/api/orders", Some(&token), car_order(5)))
        .await;
    assert_eq!(placed.status(), StatusCode::CREATED);

    for _ in 0..2 {
        let response = app
            .send(json_request("POST", "/api/orders", Some(&token), car_order(5)))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], ALREADY_HAS_ORDER);
    }
    assert_eq!(app.store.order_count(), 1);
}

#[tokio::test]
async fn test_out_of_stock_car_is_unavailable() {
    let app = TestApp::new();
    let first = app.access_token(CUSTOMER_EMAIL).await;
    let second = app.access_token(OTHER_CUSTOMER_EMAIL).await;
    app.send(json_request("POST", "/api/orders", Some(&first), car_order(5)))
        .await;

    let response = app
        .send(json_request("POST", "/api/orders", Some(&second), car_order(5)))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], CAR_UNAVAILABLE);
}

#[tokio::test]
async fn test_unknown_car_is_not_found() {
    let app = TestApp::new();
    let token = app.access_token(CUSTOMER_EMAIL).await;

    let response = app
        .send(json_request("POST", "/api/orders", Some(&token), car_order(99)))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Car not found");
}

#[tokio::test]
async fn test_driver_is_booked_once() {
    let app = TestApp::new();
    let first = app.access_token(CUSTOMER_EMAIL).await;
    let second = app.access_token(OTHER_CUSTOMER_EMAIL).await;
    let order = serde_json::json!({
        "driver_id": 3,
        "start_period": "2026-02-01",
        "end_period": "2026-02-01",
        "payment_method": "transfer"
    });

    let response = app
        .send(json_request("POST", "/api/orders", Some(&first), order.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["data"]["total_amount"], 200_000);
    assert_eq!(body["data"]["driver"]["is_available"], false);
    assert_eq!(app.store.driver_available(3), Some(false));

    let response = app
        .send(json_request("POST", "/api/orders", Some(&second), order))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], DRIVER_UNAVAILABLE);
}

#[tokio::test]
async fn test_tour_booking_is_not_implemented() {
    let app = TestApp::new();
    let token = app.access_token(CUSTOMER_EMAIL).await;

    let response = app
        .send(json_request(
            "POST",
            "/api/orders",
            Some(&token),
            serde_json::json!({
                "tour_id": 7,
                "start_period": "2026-03-01",
                "end_period": "2026-03-02",
                "payment_method": "e_wallet"
            }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    assert_eq!(app.store.order_count(), 0);
}

#[tokio::test]
async fn test_reversed_period_is_rejected() {
    let app = TestApp::new();
    let token = app.access_token(CUSTOMER_EMAIL).await;

    let response = app
        .send(json_request(
            "POST",
            "/api/orders",
            Some(&token),
            serde_json::json!({
                "car_id": 5,
                "start_period": "2026-01-12",
                "end_period": "2026-01-10",
                "payment_method": "cash"
            }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["errors"][0]["field"], "__all__");
    assert_eq!(app.store.car_stock(5), Some(1));
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let app = TestApp::new();
    let token = app.access_token(CUSTOMER_EMAIL).await;

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/orders")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from("{\"car_id\": "))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["errors"][0]["field"], "body");
}

// =============================================================================
// Documents
// =============================================================================

const BOUNDARY: &str = "rent-n-go-boundary";

fn upload_request(uri: &str, token: &str, file_name: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap()
}

fn png() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 32]);
    bytes
}

#[tokio::test]
async fn test_document_upload_is_served_and_replaced() {
    let app = TestApp::new();
    let token = app.access_token(CUSTOMER_EMAIL).await;

    let missing = app.send(get("/api/documents/sim", Some(&token))).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let response = app
        .send(upload_request("/api/documents/sim", &token, "license.png", &png()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "SIM uploaded");
    let first_url = body["data"]["url"].as_str().unwrap().to_string();
    assert!(first_url.starts_with("/public/assets/sim/"));

    let served = app.send(get(&first_url, None)).await;
    assert_eq!(served.status(), StatusCode::OK);

    let response = app
        .send(upload_request("/api/documents/sim", &token, "new.png", &png()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let second_url = json_body(response).await["data"]["url"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(first_url, second_url);

    let stale = app.send(get(&first_url, None)).await;
    assert_eq!(stale.status(), StatusCode::NOT_FOUND);

    let shown = app.send(get("/api/documents/sim", Some(&token))).await;
    assert_eq!(json_body(shown).await["data"]["url"], second_url.as_str());
}

#[tokio::test]
async fn test_non_image_upload_is_rejected() {
    let app = TestApp::new();
    let token = app.access_token(CUSTOMER_EMAIL).await;

    let response = app
        .send(upload_request("/api/documents/nik", &token, "id.txt", b"plain text"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_document_kind_is_not_found() {
    let app = TestApp::new();
    let token = app.access_token(CUSTOMER_EMAIL).await;

    let response = app.send(get("/api/documents/passport", Some(&token))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Admin Web Pages
// =============================================================================

#[tokio::test]
async fn test_dashboard_redirects_without_session() {
    let app = TestApp::new();

    let response = app.send(get("/dashboard", None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn test_admin_login_opens_dashboard_until_logout() {
    let app = TestApp::new();

    let response = app
        .send(form_request(
            "/auth/login",
            &format!("email=admin%40mail.com&password={}", PASSWORD),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("rng_session="));

    let dashboard = app.send(with_cookie("/dashboard", &cookie)).await;
    assert_eq!(dashboard.status(), StatusCode::OK);

    let logout = app.send(with_cookie("/auth/logout", &cookie)).await;
    assert_eq!(logout.status(), StatusCode::SEE_OTHER);

    let dashboard = app.send(with_cookie("/dashboard", &cookie)).await;
    assert_eq!(dashboard.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&dashboard), "/auth/login");
}

#[tokio::test]
async fn test_customer_cannot_sign_in_to_dashboard() {
    let app = TestApp::new();

    let response = app
        .send(form_request(
            "/auth/login",
            &format!("email=budi%40mail.com&password={}", PASSWORD),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");
    let cookie = session_cookie(&response);

    let page = app.send(with_cookie("/auth/login", &cookie)).await;
    assert!(text_body(page).await.contains(WRONG_CREDENTIALS));

    let dashboard = app.send(with_cookie("/dashboard", &cookie)).await;
    assert_eq!(dashboard.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_flash_message_is_shown_once() {
    let app = TestApp::new();
    let response = app
        .send(form_request(
            "/auth/login",
            &format!("email={}&password=wrong", ADMIN_EMAIL.replace('@', "%40")),
            None,
        ))
        .await;
    let cookie = session_cookie(&response);

    let first = app.send(with_cookie("/auth/login", &cookie)).await;
    assert!(text_body(first).await.contains(WRONG_CREDENTIALS));

    let second = app.send(with_cookie("/auth/login", &cookie)).await;
    assert!(!text_body(second).await.contains(WRONG_CREDENTIALS));
}

#[tokio::test]
async fn test_invalid_admin_form_flashes_field_errors() {
    let app = TestApp::new();
    let response = app
        .send(form_request("/auth/login", "email=nope&password=", None))
        .await;
    assert_eq!(location(&response), "/auth/login");
    let cookie = session_cookie(&response);

    let page = text_body(app.send(with_cookie("/auth/login", &cookie)).await).await;

    assert!(page.contains("data-field=\"email\""));
    assert!(page.contains("data-field=\"password\""));
}

// =============================================================================
// Error Presentation
// =============================================================================

#[tokio::test]
async fn test_browsers_get_html_errors() {
    let app = TestApp::new();

    let response = app
        .send(
            Request::builder()
                .uri("/api/orders")
                .header(header::ACCEPT, "text/html,application/xhtml+xml")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    assert!(text_body(response).await.contains("<h1>401</h1>"));
}
