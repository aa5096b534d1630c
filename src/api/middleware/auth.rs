//! Bearer tokens for the customer API.
//!
//! `require_bearer` guards the `/api/orders` and `/api/documents` routers;
//! handlers behind it take [`CurrentUser`] as an extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::UserRole;
use crate::errors::AppError;
use crate::services::Claims;

/// The customer a verified access token belongs to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub role: UserRole,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: UserRole::from(claims.role.as_str()),
        }
    }
}

/// Token part of `Authorization: Bearer <token>`, if present and non-empty
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Rejects the request with 401 unless it carries a valid access token.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let user = CurrentUser::from(state.auth_service.verify_token(token)?);

    tracing::debug!(user_id = user.id, role = %user.role, "Access token accepted");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    /// Only succeeds behind [`require_bearer`].
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(authorization).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_claims_map_to_current_user() {
        let claims = Claims {
            sub: 7,
            email: "budi@mail.com".into(),
            role: "superuser".into(),
            exp: 0,
            iat: 0,
        };

        assert_eq!(
            CurrentUser::from(claims),
            CurrentUser {
                id: 7,
                role: UserRole::Customer,
            }
        );
    }

    #[tokio::test]
    async fn test_extractor_without_guard_is_unauthorized() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();

        let err = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
