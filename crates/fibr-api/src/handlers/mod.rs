//! HTTP request handlers.

pub mod browse;
pub mod mutate;
pub mod seo;

use axum::Json;
use axum::response::{IntoResponse, Redirect, Response};

use fibr_core::error::AppError;
use fibr_service::{Access, Outcome, RequestContext};

/// Render the outcome of an operation.
pub fn render(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Listing(listing) => Json(listing).into_response(),
        Outcome::Redirect(location) => Redirect::to(&location).into_response(),
    }
}

/// Context of a granted request; public assets accept no mutation.
pub fn granted(access: Access) -> Result<RequestContext, AppError> {
    match access {
        Access::Granted(ctx) => Ok(ctx),
        Access::Public(_) => Err(AppError::not_authorized()),
    }
}
