//! Cookie-based authentication middleware for the admin panel.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::{Redirect, Response},
};

use crate::state::AppState;

/// Name of the cookie carrying the admin token.
pub const AUTH_COOKIE: &str = "auth_token";

pub const LOGIN_PATH: &str = "/admin/login";

/// Reads the `auth_token` value from the `Cookie` header, if any.
///
/// Handles several cookies in one header and ignores the others.
pub fn auth_token_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(COOKIE)
        .and_then(|cookie_header| cookie_header.to_str().ok())
        .and_then(|cookie_str| {
            cookie_str.split(';').find_map(|cookie| {
                let mut parts = cookie.trim().splitn(2, '=');
                match (parts.next(), parts.next()) {
                    (Some(AUTH_COOKIE), Some(value)) if !value.is_empty() => {
                        Some(value.to_string())
                    }
                    _ => None,
                }
            })
        })
}

/// Authenticates admin panel requests using the `auth_token` cookie.
///
/// # Cookie Format
///
/// ```text
/// Cookie: auth_token=<token>
/// ```
///
/// Unlike the API auth middleware which returns `401 Unauthorized`, this
/// middleware redirects to the login page.
///
/// # Errors
///
/// Returns `Redirect` to `/admin/login` if the cookie is missing or the
/// token is invalid or revoked.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    match auth_token_from(req.headers()) {
        Some(token) => match st.auth_service.authenticate(&token).await {
            Ok(_) => Ok(next.run(req).await),
            Err(_) => Err(Redirect::to(LOGIN_PATH)),
        },
        None => Err(Redirect::to(LOGIN_PATH)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_auth_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; auth_token=abc123; lang=en"),
        );

        assert_eq!(auth_token_from(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_missing_or_empty_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(auth_token_from(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("auth_token="));
        assert_eq!(auth_token_from(&headers), None);
    }
}
