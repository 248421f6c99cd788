//! Mutation handlers: upload, create directory, rename, delete and shares.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, FromRequest, Multipart, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use futures::TryStreamExt;

use fibr_core::error::AppError;
use fibr_core::result::AppResult;
use fibr_core::traits::storage::ByteStream;
use fibr_service::{Access, Layout, Outcome, RequestContext};

use crate::dto::{BrowseQuery, MutationForm};
use crate::error::ApiError;
use crate::extractors::RequestAccess;
use crate::handlers::{granted, render};
use crate::state::AppState;

/// Multipart field names carrying uploaded files.
const FILE_FIELDS: [&str; 2] = ["file", "files[]"];

/// A mutation selected by the HTTP method or a `method` form override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    CreateDir,
    Rename,
    Delete,
    Share,
    Unshare,
}

impl Mutation {
    fn from_override(method: &str) -> Option<Self> {
        match method.trim().to_ascii_uppercase().as_str() {
            "PUT" => Some(Self::CreateDir),
            "PATCH" => Some(Self::Rename),
            "DELETE" => Some(Self::Delete),
            "SHARE" => Some(Self::Share),
            "UNSHARE" => Some(Self::Unshare),
            _ => None,
        }
    }
}

/// POST on any path: a multipart upload, or a form whose `method` field
/// selects the mutation.
pub async fn post(
    State(state): State<AppState>,
    RequestAccess(access): RequestAccess,
    Query(query): Query<BrowseQuery>,
    request: Request,
) -> Result<Response, ApiError> {
    let ctx = granted(access)?;

    if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        return upload(&state, &ctx, multipart, query.layout()).await;
    }

    let form = read_form(request, &state).await?;
    let method = form.method.clone().unwrap_or_default();
    let mutation = Mutation::from_override(&method)
        .ok_or_else(|| AppError::validation(format!("Unknown method: {method}")))?;

    let outcome = apply(&state, &ctx, mutation, &form, query.layout()).await?;
    Ok(render(outcome))
}

/// PUT: create a directory.
pub async fn put(
    State(state): State<AppState>,
    RequestAccess(access): RequestAccess,
    Query(query): Query<BrowseQuery>,
    request: Request,
) -> Result<Response, ApiError> {
    handle(state, access, query, request, Mutation::CreateDir).await
}

/// PATCH: rename the requested entry.
pub async fn patch(
    State(state): State<AppState>,
    RequestAccess(access): RequestAccess,
    Query(query): Query<BrowseQuery>,
    request: Request,
) -> Result<Response, ApiError> {
    handle(state, access, query, request, Mutation::Rename).await
}

/// DELETE: delete the requested entry, or its child `name`.
pub async fn delete(
    State(state): State<AppState>,
    RequestAccess(access): RequestAccess,
    Query(query): Query<BrowseQuery>,
    request: Request,
) -> Result<Response, ApiError> {
    handle(state, access, query, request, Mutation::Delete).await
}

async fn handle(
    state: AppState,
    access: Access,
    query: BrowseQuery,
    request: Request,
    mutation: Mutation,
) -> Result<Response, ApiError> {
    let ctx = granted(access)?;
    let form = read_form(request, &state).await?;
    let outcome = apply(&state, &ctx, mutation, &form, query.layout()).await?;
    Ok(render(outcome))
}

async fn apply(
    state: &AppState,
    ctx: &RequestContext,
    mutation: Mutation,
    form: &MutationForm,
    layout: Layout,
) -> AppResult<Outcome> {
    match mutation {
        Mutation::CreateDir => state.crud.create_dir(ctx, form.name.as_deref(), layout).await,
        Mutation::Rename => {
            let new_name = form.new_name.as_deref().unwrap_or_default();
            state.crud.rename(ctx, new_name, layout).await
        }
        Mutation::Delete => state.crud.delete(ctx, form.name.as_deref()).await,
        Mutation::Share => state.crud.create_share(ctx, &form.share(), layout).await,
        Mutation::Unshare => {
            let id = form
                .id
                .as_deref()
                .filter(|id| !id.trim().is_empty())
                .ok_or_else(|| AppError::validation("Share id is required"))?;
            state.crud.delete_share(ctx, id, layout).await
        }
    }
}

/// Stream every uploaded file of the request into the requested directory.
async fn upload(
    state: &AppState,
    ctx: &RequestContext,
    mut multipart: Multipart,
    layout: Layout,
) -> Result<Response, ApiError> {
    let mut batch = state.crud.begin_upload(ctx)?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if !field.name().is_some_and(|name| FILE_FIELDS.contains(&name)) {
            continue;
        }
        let Some(filename) = field
            .file_name()
            .filter(|filename| !filename.is_empty())
            .map(str::to_string)
        else {
            continue;
        };

        let content: ByteStream<'_> = Box::pin(field.map_err(std::io::Error::other));
        batch.save(&filename, content).await?;
    }

    let outcome = batch.finish(layout).await?;
    Ok(render(outcome))
}

/// Decode the URL-encoded form of a mutation; a body without form content
/// type is an empty form.
async fn read_form(request: Request, state: &AppState) -> Result<MutationForm, ApiError> {
    match Form::<MutationForm>::from_request(request, state).await {
        Ok(Form(form)) => Ok(form),
        Err(FormRejection::InvalidFormContentType(_)) => Ok(MutationForm::default()),
        Err(e) => Err(AppError::validation(e.body_text()).into()),
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large("Upload exceeds the size limit")
    } else {
        AppError::validation(err.body_text())
    }
}
