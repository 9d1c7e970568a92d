//! Admin login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;
use crate::web::error::PageError;
use crate::web::middleware::web_auth::{AUTH_COOKIE, LOGIN_PATH};

/// Template for the login page.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub token: String,
}

/// Renders the login page.
///
/// `GET /admin/login`
pub async fn login_handler() -> LoginTemplate {
    LoginTemplate { error: None }
}

/// `Set-Cookie` value for a signed-in session.
fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!("{AUTH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Checks the submitted token and stores it in the `auth_token` cookie.
///
/// # Endpoint
///
/// `POST /admin/login`
///
/// Redirects to the dashboard on success. An unknown or revoked token
/// re-renders the form with `401 Unauthorized`.
pub async fn login_submit_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    let token = form.token.trim();

    match state.auth_service.authenticate(token).await {
        Ok(()) => (
            [(SET_COOKIE, session_cookie(token, state.cookie_secure))],
            Redirect::to("/admin"),
        )
            .into_response(),
        Err(AppError::Unauthorized { .. }) => (
            StatusCode::UNAUTHORIZED,
            LoginTemplate {
                error: Some("Invalid or revoked token".to_string()),
            },
        )
            .into_response(),
        Err(e) => PageError(e).into_response(),
    }
}

/// Clears the session cookie.
///
/// `POST /admin/logout`
pub async fn logout_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut cookie = format!("{AUTH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if state.cookie_secure {
        cookie.push_str("; Secure");
    }

    ([(SET_COOKIE, cookie)], Redirect::to(LOGIN_PATH))
}
