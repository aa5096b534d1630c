//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::{AppError, FieldError};

/// Validated JSON extractor that automatically validates requests.
///
/// Malformed bodies and failed rules both become
/// [`AppError::InvalidPayload`] with one entry per failed field.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use rent_n_go::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct LoginRequest {
///     #[validate(email)]
///     email: String,
/// }
///
/// async fn login(ValidatedJson(payload): ValidatedJson<LoginRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| {
                AppError::InvalidPayload(vec![FieldError {
                    field: "body".to_string(),
                    code: "malformed".to_string(),
                    message: Some(e.body_text()),
                }])
            })?;

        value
            .validate()
            .map_err(|e| AppError::InvalidPayload(FieldError::from_validation(&e)))?;

        Ok(ValidatedJson(value))
    }
}
