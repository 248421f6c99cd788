//! Read handlers: listings, file content and thumbnails.

use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};

use fibr_core::error::AppError;
use fibr_core::types::StorageItem;
use fibr_core::types::media::mime_type;
use fibr_service::Access;

use crate::dto::BrowseQuery;
use crate::error::ApiError;
use crate::extractors::RequestAccess;
use crate::handlers::seo;
use crate::state::AppState;

/// GET on any path.
///
/// Directories answer with their listing, files with their content.
/// `?thumbnail` switches to the thumbnail of a file, or to the base64
/// thumbnails of a directory's children.
pub async fn browse(
    State(state): State<AppState>,
    RequestAccess(access): RequestAccess,
    Query(query): Query<BrowseQuery>,
) -> Result<Response, ApiError> {
    let ctx = match access {
        Access::Public(asset) => return Ok(seo::serve(&state, asset)),
        Access::Granted(ctx) => ctx,
    };

    let item = state.crud.lookup(&ctx).await?;

    if query.wants_thumbnail() {
        if item.is_dir {
            let thumbnails = state.thumbnailer.list_base64(&item.pathname).await?;
            return Ok(Json(thumbnails).into_response());
        }

        let content = state.thumbnailer.read(&item.pathname).await?;
        return stream(&item, None, Body::from_stream(content));
    }

    if item.is_dir {
        let listing = state
            .crud
            .listing_at(&ctx, &item.pathname, query.layout(), query.message())
            .await?;
        return Ok(Json(listing).into_response());
    }

    let content = state.crud.content(&item).await?;
    stream(&item, Some(item.size), Body::from_stream(content))
}

/// Response streaming `body` as the content of `item`.
fn stream(item: &StorageItem, length: Option<u64>, body: Body) -> Result<Response, ApiError> {
    let mut builder = Response::builder().header(CONTENT_TYPE, mime_type(&item.name));
    if let Some(length) = length {
        builder = builder.header(CONTENT_LENGTH, length);
    }

    builder
        .body(body)
        .map_err(|e| AppError::internal(format!("Failed to build response: {e}")).into())
}
