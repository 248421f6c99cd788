//! Route definitions for the served tree.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::get;

use crate::handlers::{browse, mutate};
use crate::middleware::challenge::basic_challenge;
use crate::middleware::logging::request_logging;
use crate::state::AppState;

/// Room left in the body limit for multipart boundaries and part headers,
/// so the upload ceiling is enforced on file content.
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Builds the router: every path of the tree shares one method router.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .storage
        .max_upload_size_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    let tree = get(browse::browse)
        .post(mutate::post)
        .put(mutate::put)
        .patch(mutate::patch)
        .delete(mutate::delete);

    Router::new()
        .route("/", tree.clone())
        .route("/{*path}", tree)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            basic_challenge,
        ))
        .layer(middleware::from_fn(request_logging))
        .with_state(state)
}
