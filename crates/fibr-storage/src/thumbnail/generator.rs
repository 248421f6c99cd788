//! Thumbnail generation into the shadow tree.
//!
//! A thumbnail for `/albums/photo.jpg` lives at `/.metadata/albums/photo.jpg`.
//! Its presence is the only state: absence means "not generated yet".

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dashmap::DashMap;
use image::ImageFormat;
use tracing::{debug, info, warn};

use fibr_core::METADATA_DIRECTORY_NAME;
use fibr_core::error::{AppError, ErrorKind};
use fibr_core::result::AppResult;
use fibr_core::traits::storage::{ByteStream, Storage};
use fibr_core::types::StorageItem;
use fibr_core::types::media::{IGNORED_WALK_DIRECTORIES, can_have_thumbnail};

use super::fingerprint;
use super::render::PreviewRenderer;
use crate::path::{clean, join, parent};

/// Generates, serves and maintains thumbnails of image files.
#[derive(Debug, Clone)]
pub struct Thumbnailer {
    /// Store holding both originals and the shadow tree.
    storage: Arc<dyn Storage>,
    /// Decoder/encoder used for previews.
    renderer: Arc<dyn PreviewRenderer>,
    /// Edge length of the square preview.
    size: u32,
    /// Shadow paths currently being generated.
    in_flight: Arc<DashMap<String, ()>>,
}

/// Releases an in-flight claim when generation ends, whatever the outcome.
struct Claim<'a> {
    in_flight: &'a DashMap<String, ()>,
    key: String,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.key);
    }
}

impl Thumbnailer {
    /// Create a new thumbnailer.
    pub fn new(storage: Arc<dyn Storage>, renderer: Arc<dyn PreviewRenderer>, size: u32) -> Self {
        Self {
            storage,
            renderer,
            size,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Deterministic location of the thumbnail of `pathname`.
    pub fn shadow_path(pathname: &str) -> String {
        join(&["/", METADATA_DIRECTORY_NAME, pathname])
    }

    /// Whether a thumbnail exists for the item. Lookup failures count as absent.
    pub async fn has_thumbnail(&self, item: &StorageItem) -> bool {
        if item.is_dir || !can_have_thumbnail(&item.name) {
            return false;
        }

        matches!(
            self.storage.try_info(&Self::shadow_path(&item.pathname)).await,
            Ok(Some(_))
        )
    }

    /// Open the thumbnail of `pathname` for serving.
    pub async fn read(&self, pathname: &str) -> AppResult<ByteStream<'static>> {
        self.storage
            .read(&Self::shadow_path(pathname))
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    AppError::not_found("Thumbnail not found")
                } else {
                    e
                }
            })
    }

    /// Generate the thumbnail of `pathname` if it is missing.
    ///
    /// Never fails: errors are logged and the file is skipped.
    pub async fn generate(&self, pathname: &str) {
        match self.try_generate(pathname).await {
            Ok(true) => debug!(pathname, "Generated thumbnail"),
            Ok(false) => {}
            Err(e) => warn!(pathname, error = %e, "Thumbnail generation failed"),
        }
    }

    /// Generate the thumbnail, returning whether a new one was written.
    pub async fn try_generate(&self, pathname: &str) -> AppResult<bool> {
        let pathname = clean(pathname);
        let source = match self.storage.try_info(&pathname).await? {
            Some(item) if !item.is_dir && can_have_thumbnail(&item.name) => item,
            _ => return Ok(false),
        };

        let destination = Self::shadow_path(&source.pathname);
        if self.storage.try_info(&destination).await?.is_some() {
            return Ok(false);
        }

        if self.in_flight.insert(destination.clone(), ()).is_some() {
            return Ok(false);
        }
        let _claim = Claim {
            in_flight: &self.in_flight,
            key: destination.clone(),
        };

        let format = ImageFormat::from_path(&destination).map_err(|e| {
            AppError::with_source(ErrorKind::Validation, "Unsupported thumbnail format", e)
        })?;

        let data = self.storage.read_bytes(&source.pathname).await?;
        let renderer = Arc::clone(&self.renderer);
        let size = self.size;
        let thumbnail = tokio::task::spawn_blocking(move || renderer.render(&data, format, size))
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Thumbnail task panicked", e)
            })??;

        self.storage.create_dir(&parent(&destination)).await?;
        self.storage.write_new(&destination, thumbnail.into()).await
    }

    /// Remove the thumbnail (or shadow directory) of `pathname`. Best effort.
    pub async fn delete(&self, pathname: &str) {
        let shadow = Self::shadow_path(pathname);
        if let Err(e) = self.storage.remove(&shadow).await {
            if !e.is_not_found() {
                warn!(pathname, error = %e, "Thumbnail deletion failed");
            }
        }
    }

    /// Move the shadow entry of `from` to the shadow location of `to`. Best effort.
    pub async fn rename(&self, from: &str, to: &str) {
        let from_shadow = Self::shadow_path(from);
        match self.storage.try_info(&from_shadow).await {
            Ok(Some(_)) => {
                if let Err(e) = self.storage.rename(&from_shadow, &Self::shadow_path(to)).await {
                    warn!(from, to, error = %e, "Thumbnail move failed");
                }
            }
            Ok(None) => {}
            Err(e) => warn!(from, to, error = %e, "Thumbnail move failed"),
        }
    }

    /// Reconcile the whole tree: prune thumbnails whose original is gone or
    /// newer, then generate every missing one.
    ///
    /// Files are handled one at a time. Returns the number generated.
    pub async fn walk(&self) -> AppResult<usize> {
        let pruned = match self.prune().await {
            Ok(pruned) => pruned,
            Err(e) => {
                warn!(error = %e, "Thumbnail pruning failed");
                0
            }
        };

        let files = self.storage.walk("/", &skip_walk_directory).await?;

        let mut generated = 0;
        for item in files.iter().filter(|item| can_have_thumbnail(&item.name)) {
            match self.try_generate(&item.pathname).await {
                Ok(true) => generated += 1,
                Ok(false) => {}
                Err(e) => warn!(pathname = %item.pathname, error = %e, "Thumbnail generation failed"),
            }
        }

        info!(files = files.len(), pruned, generated, "Thumbnail walk completed");
        Ok(generated)
    }

    /// Remove every thumbnail whose original no longer exists as a file or
    /// was modified after the thumbnail was written. Returns the number removed.
    async fn prune(&self) -> AppResult<usize> {
        let shadow_root = join(&["/", METADATA_DIRECTORY_NAME]);
        if self.storage.try_info(&shadow_root).await?.is_none() {
            return Ok(0);
        }

        let shadows = self
            .storage
            .walk(&shadow_root, &|_: &StorageItem| false)
            .await?;

        let mut removed = 0;
        for shadow in shadows.iter().filter(|item| can_have_thumbnail(&item.name)) {
            let Some(source) = shadow.pathname.strip_prefix(&shadow_root) else {
                continue;
            };

            let stale = match self.storage.try_info(&clean(source)).await {
                Ok(Some(original)) => original.is_dir || original.mod_time > shadow.mod_time,
                Ok(None) => true,
                Err(e) => {
                    warn!(pathname = %shadow.pathname, error = %e, "Thumbnail check failed");
                    false
                }
            };
            if !stale {
                continue;
            }

            match self.storage.remove(&shadow.pathname).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(pathname = %shadow.pathname, error = %e, "Thumbnail pruning failed"),
            }
        }

        Ok(removed)
    }

    /// Base64 thumbnails of every image in a directory, keyed by [`fingerprint`]
    /// of the image name. Images without a thumbnail are left out.
    pub async fn list_base64(&self, pathname: &str) -> AppResult<BTreeMap<String, String>> {
        let mut thumbnails = BTreeMap::new();

        for item in self.storage.list(pathname).await? {
            if item.is_dir || !can_have_thumbnail(&item.name) {
                continue;
            }

            match self.storage.read_bytes(&Self::shadow_path(&item.pathname)).await {
                Ok(data) => {
                    thumbnails.insert(fingerprint(&item.name), STANDARD.encode(&data));
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => warn!(pathname = %item.pathname, error = %e, "Thumbnail read failed"),
            }
        }

        Ok(thumbnails)
    }
}

/// Directories a walk never descends into: the metadata area, hidden
/// directories and dependency caches.
fn skip_walk_directory(item: &StorageItem) -> bool {
    item.name == METADATA_DIRECTORY_NAME
        || item.name.starts_with('.')
        || IGNORED_WALK_DIRECTORIES.contains(&item.name.as_str())
}
