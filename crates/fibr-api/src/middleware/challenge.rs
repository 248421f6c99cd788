//! Basic authentication challenge.

use axum::extract::{Request, State};
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use crate::state::AppState;

/// Adds `WWW-Authenticate` to every 401 response, so clients prompt for
/// credentials and retry.
pub async fn basic_challenge(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    if response.status() == StatusCode::UNAUTHORIZED {
        match HeaderValue::from_str(&state.challenge()) {
            Ok(value) => {
                response.headers_mut().insert(WWW_AUTHENTICATE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Invalid authentication realm"),
        }
    }

    response
}
