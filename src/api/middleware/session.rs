//! Cookie sessions for the admin web pages.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use time::Duration;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, Session, SessionManagerLayer};

use crate::config::{Config, SESSION_COOKIE_NAME, SESSION_KEY_AUTHED};
use crate::infra::SessionBackend;

/// Session layer: `rng_session` cookie, HttpOnly, SameSite=Lax, Secure in
/// production, expiring after `SESSION_TTL_SECONDS` of inactivity.
pub fn session_layer(
    store: SessionBackend,
    config: &Config,
) -> SessionManagerLayer<SessionBackend> {
    // Keeps `now + ttl` inside the representable date range.
    let ttl = config.session_ttl_seconds.min(u64::from(u32::MAX)) as i64;

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_path("/")
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.is_production())
        .with_expiry(Expiry::OnInactivity(Duration::seconds(ttl)))
}

/// Only lets requests through whose session carries the admin flag.
pub async fn require_admin_session(session: Session, request: Request, next: Next) -> Response {
    let authed = match session.get::<bool>(SESSION_KEY_AUTHED).await {
        Ok(flag) => flag.unwrap_or(false),
        Err(e) => {
            tracing::warn!("Unreadable session: {}", e);
            false
        }
    };

    if authed {
        next.run(request).await
    } else {
        Redirect::to("/auth/login").into_response()
    }
}
