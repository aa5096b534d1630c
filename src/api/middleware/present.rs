//! Error presentation.
//!
//! Error responses carry an [`ErrorReport`] extension. Browsers get an HTML
//! page; outside production the JSON body also gains the internal detail.

use axum::{
    extract::{Request, State},
    http::{header::ACCEPT, HeaderMap},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::api::views;
use crate::api::AppState;
use crate::errors::ErrorReport;

/// Whether the client prefers HTML over JSON
pub fn wants_html(headers: &HeaderMap) -> bool {
    let accept = headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    accept.contains("text/html") && !accept.contains("application/json")
}

pub async fn present_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let html = wants_html(request.headers());
    let response = next.run(request).await;

    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };
    let expose_detail = !state.config.is_production();

    if html {
        (report.status, Html(views::error_page(&report, expose_detail))).into_response()
    } else if expose_detail && report.detail.is_some() {
        (report.status, Json(report.body(true))).into_response()
    } else {
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_browser_accept_header_wants_html() {
        assert!(wants_html(&accept(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
        )));
    }

    #[test]
    fn test_json_clients_do_not_want_html() {
        assert!(!wants_html(&accept("application/json")));
        assert!(!wants_html(&accept("text/html, application/json")));
        assert!(!wants_html(&HeaderMap::new()));
    }
}
