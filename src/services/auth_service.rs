//! Authentication service - customer API tokens and admin web login.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use utoipa::ToSchema;

use crate::config::{Config, REFRESH_TOKEN_LENGTH, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{verify_password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token pair returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Single-use token exchanged for a new pair at `/api/auth/refresh`
    #[schema(example = "q3V0Zk9pR1hX...")]
    pub refresh_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue an access/refresh token pair
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Consume a refresh token and issue a new pair
    async fn refresh(&self, refresh_token: String) -> AppResult<TokenResponse>;

    /// Check credentials for the admin dashboard.
    ///
    /// Non-admin accounts fail exactly like a wrong password.
    async fn admin_login(&self, email: String, password: String) -> AppResult<User>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Verify JWT token and extract claims (shared helper)
fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
    rng: Mutex<StdRng>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self::with_rng(uow, config, StdRng::from_entropy())
    }

    /// Use a caller-provided generator for refresh tokens.
    pub fn with_rng(uow: Arc<U>, config: Config, rng: StdRng) -> Self {
        Self {
            uow,
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Look the user up and verify the password.
    async fn check_credentials(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self.uow.users().find_by_email(email).await?;

        let password_valid = verify_password(
            password,
            user.as_ref().map(|user| user.password_hash.as_str()),
        );

        match user {
            Some(user) if password_valid => Ok(user),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn random_token(&self) -> AppResult<String> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AppError::internal("refresh token generator lock poisoned"))?;
        Ok((&mut *rng)
            .sample_iter(&Alphanumeric)
            .take(REFRESH_TOKEN_LENGTH)
            .map(char::from)
            .collect())
    }

    async fn issue_tokens(&self, user: &User) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.config.jwt_expiration_hours);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret_bytes()),
        )?;

        let refresh_token = self.random_token()?;
        self.uow
            .tokens()
            .store(
                user.id,
                refresh_token.clone(),
                now + Duration::days(self.config.refresh_token_days),
            )
            .await?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.config.jwt_expiration_hours * SECONDS_PER_HOUR,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.check_credentials(&email, &password).await?;
        tracing::info!(user_id = user.id, "Customer logged in");
        self.issue_tokens(&user).await
    }

    async fn refresh(&self, refresh_token: String) -> AppResult<TokenResponse> {
        let grant = self
            .uow
            .tokens()
            .consume(&refresh_token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if grant.is_expired(Utc::now()) {
            tracing::debug!(user_id = grant.user_id, "Expired refresh token presented");
            return Err(AppError::Unauthorized);
        }

        let user = self
            .uow
            .users()
            .find_by_id(grant.user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        self.issue_tokens(&user).await
    }

    async fn admin_login(&self, email: String, password: String) -> AppResult<User> {
        let user = self.check_credentials(&email, &password).await?;
        if !user.is_admin() {
            tracing::warn!(user_id = user.id, "Non-admin attempted dashboard login");
            return Err(AppError::InvalidCredentials);
        }
        Ok(user)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}
