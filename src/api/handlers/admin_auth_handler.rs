//! Admin web login, logout and dashboard.

use axum::{
    extract::State,
    middleware,
    response::{Html, Redirect},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tower_sessions::Session;
use validator::Validate;

use crate::api::middleware::require_admin_session;
use crate::api::views;
use crate::api::AppState;
use crate::config::{FLASH_KEY_MESSAGE, FLASH_KEY_VALIDATION, SESSION_KEY_AUTHED};
use crate::errors::{AppError, AppResult, FieldError};

pub const WRONG_CREDENTIALS: &str = "Wrong credential being passed";

const LOGIN_PATH: &str = "/auth/login";
const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Deserialize, Validate)]
pub struct AdminLoginForm {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Routes served with cookie sessions; the dashboard requires the admin flag.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_view).post(login))
        .route("/auth/logout", get(logout))
        .route(
            DASHBOARD_PATH,
            get(dashboard).route_layer(middleware::from_fn(require_admin_session)),
        )
}

/// Flash values are plain session keys removed on first read.
pub async fn login_view(session: Session) -> AppResult<Html<String>> {
    let message: Option<String> = session.remove(FLASH_KEY_MESSAGE).await?;
    let errors: Vec<FieldError> = session
        .remove(FLASH_KEY_VALIDATION)
        .await?
        .unwrap_or_default();

    Ok(Html(views::login_page(message.as_deref(), &errors)))
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AdminLoginForm>,
) -> AppResult<Redirect> {
    if let Err(errors) = form.validate() {
        session
            .insert(FLASH_KEY_VALIDATION, FieldError::from_validation(&errors))
            .await?;
        return Ok(Redirect::to(LOGIN_PATH));
    }

    match state.auth_service.admin_login(form.email, form.password).await {
        Ok(admin) => {
            session.cycle_id().await?;
            session.insert(SESSION_KEY_AUTHED, true).await?;
            tracing::info!(user_id = admin.id, "Admin signed in");
            Ok(Redirect::to(DASHBOARD_PATH))
        }
        Err(AppError::InvalidCredentials) => {
            session.insert(FLASH_KEY_MESSAGE, WRONG_CREDENTIALS).await?;
            Ok(Redirect::to(LOGIN_PATH))
        }
        Err(e) => Err(e),
    }
}

pub async fn logout(session: Session) -> AppResult<Redirect> {
    session.remove::<bool>(SESSION_KEY_AUTHED).await?;
    Ok(Redirect::to(LOGIN_PATH))
}

pub async fn dashboard() -> Html<String> {
    Html(views::dashboard_page())
}
