//! Bearer token authentication for the JSON API.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Challenge sent with every `401` from the API.
const BEARER_CHALLENGE: &str = r#"Bearer realm="folio""#;

/// Authenticates API requests with an admin token.
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// The token is the same one accepted by the admin panel login form.
/// Missing, malformed, unknown and revoked tokens get `401 Unauthorized`
/// with a JSON error body and a `WWW-Authenticate: Bearer` challenge.
///
/// # Example
///
/// ```rust,ignore
/// let protected = api::routes::protected_routes()
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    match authorize(&state, &mut parts).await {
        Ok(()) => next.run(Request::from_parts(parts, body)).await,
        Err(e) => with_challenge(e.into_response()),
    }
}

async fn authorize(state: &AppState, parts: &mut Parts) -> Result<(), AppError> {
    let AuthBearer(token) = AuthBearer::from_request_parts(parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    state.auth_service.authenticate(&token).await
}

fn with_challenge(mut response: Response) -> Response {
    if response.status() == StatusCode::UNAUTHORIZED {
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static(BEARER_CHALLENGE));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_challenge_only_on_unauthorized() {
        let response = with_challenge(AppError::unauthorized("Unauthorized", json!({})).into_response());
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            BEARER_CHALLENGE
        );

        let response = with_challenge(AppError::internal("Database error", json!({})).into_response());
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
    }
}
