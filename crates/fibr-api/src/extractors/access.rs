//! Access extractor: decides what the request may do.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use percent_encoding::percent_decode_str;

use fibr_core::error::AppError;
use fibr_service::Access;
use fibr_storage::path::has_traversal;

use crate::error::ApiError;
use crate::state::AppState;

/// Access decision of the current request.
///
/// The URI path is checked for traversal both raw and decoded, then handed
/// to the access service together with the `Authorization` header.
#[derive(Debug, Clone)]
pub struct RequestAccess(pub Access);

impl FromRequestParts<AppState> for RequestAccess {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let raw_path = parts.uri.path();
        if has_traversal(raw_path) {
            return Err(AppError::not_authorized().into());
        }

        let path = percent_decode_str(raw_path)
            .decode_utf8()
            .map_err(|_| AppError::validation("Invalid path encoding"))?;

        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let access = state.access.authorize(&path, authorization).await?;
        Ok(RequestAccess(access))
    }
}
