//! Upload of one or more files into the requested directory.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::StreamExt;
use tracing::{info, warn};

use fibr_core::error::AppError;
use fibr_core::result::AppResult;
use fibr_core::traits::storage::ByteStream;
use fibr_core::types::ThumbnailJob;
use fibr_core::types::media::is_image;
use fibr_storage::path::sanitize_name;

use super::CrudService;
use crate::context::RequestContext;
use crate::view::{Layout, Message, Outcome};

/// An upload request in progress.
///
/// Files are saved one by one as they arrive. All of them share the byte
/// ceiling of the request.
#[derive(Debug)]
pub struct UploadBatch<'a> {
    service: &'a CrudService,
    ctx: RequestContext,
    directory: String,
    remaining: u64,
    saved: Vec<String>,
}

impl CrudService {
    /// Start an upload into the requested directory.
    pub fn begin_upload(&self, ctx: &RequestContext) -> AppResult<UploadBatch<'_>> {
        Self::require_edit(ctx)?;

        Ok(UploadBatch {
            service: self,
            directory: ctx.pathname()?,
            ctx: ctx.clone(),
            remaining: self.max_upload_size,
            saved: Vec::new(),
        })
    }
}

impl UploadBatch<'_> {
    /// Stream one file into place, creating or truncating it.
    ///
    /// Returns the sanitized name. Exceeding the ceiling removes the partial
    /// file and fails with a payload-too-large error.
    pub async fn save(&mut self, filename: &str, content: ByteStream<'_>) -> AppResult<String> {
        let name = sanitize_name(filename.trim(), true);
        if name.is_empty() {
            return Err(AppError::validation("File name is required"));
        }

        let resolved = self
            .service
            .resolver
            .resolve(&self.ctx.root, &self.ctx.path, Some(&name))
            .await?;
        let existed = resolved.exists();
        let pathname = resolved.pathname;
        let storage = &self.service.storage;

        let limit = self.remaining;
        let received = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&received);
        let limited: ByteStream<'_> = Box::pin(content.map(move |chunk| {
            let chunk = chunk?;
            let total = counter.fetch_add(chunk.len() as u64, Ordering::SeqCst) + chunk.len() as u64;
            if total > limit {
                return Err(std::io::Error::other("upload size limit exceeded"));
            }
            Ok(chunk)
        }));

        let written = match storage.write(&pathname, limited).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = storage.remove(&pathname).await {
                    if !cleanup.is_not_found() {
                        warn!(pathname, error = %cleanup, "Failed to remove partial upload");
                    }
                }
                if received.load(Ordering::SeqCst) > limit {
                    return Err(AppError::payload_too_large(format!(
                        "Upload exceeds the maximum size of {} bytes",
                        self.service.max_upload_size
                    )));
                }
                return Err(e);
            }
        };

        self.remaining -= written;
        info!(pathname, bytes = written, "File uploaded");

        if is_image(&name) {
            if existed {
                self.service.schedule(ThumbnailJob::Delete {
                    pathname: pathname.clone(),
                });
            }
            self.service.schedule(ThumbnailJob::Generate { pathname });
        }

        self.saved.push(name.clone());
        Ok(name)
    }

    /// Close the batch and render the refreshed directory.
    pub async fn finish(self, layout: Layout) -> AppResult<Outcome> {
        let content = match self.saved.as_slice() {
            [] => return Err(AppError::validation("No file provided for save")),
            [single] => format!("File {single} successfully uploaded"),
            many => format!("Files {} successfully uploaded", many.join(", ")),
        };

        let listing = self
            .service
            .listing_at(&self.ctx, &self.directory, layout, Some(Message::success(content)))
            .await?;
        Ok(Outcome::Listing(Box::new(listing)))
    }
}
