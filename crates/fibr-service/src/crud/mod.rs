//! CRUD operations on the served tree.
//!
//! Every operation re-checks the permission flag it needs on the
//! [`RequestContext`], even when the HTTP layer already gated the route.

mod delete;
mod dir;
mod rename;
mod share;
mod upload;

use std::sync::Arc;

use fibr_core::METADATA_DIRECTORY_NAME;
use fibr_core::config::UiConfig;
use fibr_core::error::AppError;
use fibr_core::result::AppResult;
use fibr_core::traits::jobs::JobSubmitter;
use fibr_core::traits::storage::{ByteStream, Storage};
use fibr_core::types::{StorageItem, ThumbnailJob};
use fibr_storage::path::{PathResolver, clean, parent};
use fibr_storage::thumbnail::{Thumbnailer, fingerprint};

use crate::context::RequestContext;
use crate::share::ShareRegistry;
use crate::view::{Layout, Listing, ListingItem, Message, PageMeta};

pub use share::ShareForm;
pub use upload::UploadBatch;

/// Performs reads and mutations of the served tree.
#[derive(Debug, Clone)]
pub struct CrudService {
    /// Served store.
    storage: Arc<dyn Storage>,
    /// Turns request inputs into validated pathnames of `storage`.
    resolver: PathResolver,
    /// Share registry, for share creation and removal.
    registry: Arc<ShareRegistry>,
    /// Thumbnail lookups for listings.
    thumbnailer: Thumbnailer,
    /// Background thumbnail work.
    jobs: Arc<dyn JobSubmitter>,
    /// Page metadata settings.
    ui: UiConfig,
    /// Byte ceiling of one upload request.
    max_upload_size: u64,
}

impl CrudService {
    /// Creates a new CRUD service.
    pub fn new(
        storage: Arc<dyn Storage>,
        registry: Arc<ShareRegistry>,
        thumbnailer: Thumbnailer,
        jobs: Arc<dyn JobSubmitter>,
        ui: UiConfig,
        max_upload_size: u64,
    ) -> Self {
        Self {
            resolver: PathResolver::new(Arc::clone(&storage)),
            storage,
            registry,
            thumbnailer,
            jobs,
            ui,
            max_upload_size,
        }
    }

    /// Entry targeted by a read request.
    pub async fn lookup(&self, ctx: &RequestContext) -> AppResult<StorageItem> {
        if !ctx.can_read {
            return Err(AppError::not_authorized());
        }
        self.resolver
            .resolve(&ctx.root, &ctx.path, None)
            .await?
            .require()
    }

    /// Content of a file returned by [`lookup`](Self::lookup).
    pub async fn content(&self, item: &StorageItem) -> AppResult<ByteStream<'static>> {
        if item.is_dir {
            return Err(AppError::validation(format!("{} is a directory", item.name)));
        }
        self.storage.read(&item.pathname).await
    }

    /// Listing of the requested directory, or of the parent of a requested file.
    pub async fn listing(
        &self,
        ctx: &RequestContext,
        layout: Layout,
        message: Option<Message>,
    ) -> AppResult<Listing> {
        let item = self.lookup(ctx).await?;
        let directory = if item.is_dir {
            item.pathname
        } else {
            self.parent_within_root(ctx, &item.pathname)
        };
        self.listing_at(ctx, &directory, layout, message).await
    }

    /// Listing of the directory at `pathname`.
    pub async fn listing_at(
        &self,
        ctx: &RequestContext,
        pathname: &str,
        layout: Layout,
        message: Option<Message>,
    ) -> AppResult<Listing> {
        let current = self.storage.info(pathname).await?;
        if !current.is_dir {
            return Err(AppError::validation(format!("{pathname} is not a directory")));
        }

        let metadata_pathname = format!("/{METADATA_DIRECTORY_NAME}");
        let mut items = Vec::new();
        for item in self.storage.list(pathname).await? {
            if item.pathname == metadata_pathname {
                continue;
            }

            items.push(ListingItem {
                uri: ctx.uri(&item.pathname),
                has_thumbnail: self.thumbnailer.has_thumbnail(&item).await,
                fingerprint: fingerprint(&item.name),
                item,
            });
        }

        let relative = ctx.relative(pathname);
        let path_parts: Vec<String> = relative
            .split('/')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Listing {
            meta: self.page_meta(ctx, &relative, &path_parts),
            current,
            items,
            path_parts,
            layout,
            message,
            can_edit: ctx.can_edit,
            can_share: ctx.can_share,
        })
    }

    /// Page title, description and public URL of a request-relative path.
    fn page_meta(&self, ctx: &RequestContext, relative: &str, path_parts: &[String]) -> PageMeta {
        let root_label = match &ctx.share {
            Some(share) => share.id.clone(),
            None => self.storage.root_name(),
        };

        let mut title = format!("{} - {}", self.ui.title, root_label);
        if let Some(last) = path_parts.last() {
            title.push_str(" - ");
            title.push_str(last);
        }

        PageMeta {
            description: title.clone(),
            title,
            public_url: format!(
                "{}{}{}",
                self.ui.public_url.trim_end_matches('/'),
                ctx.share_prefix,
                relative
            ),
        }
    }

    /// Parent of `pathname`, clamped to the request root.
    fn parent_within_root(&self, ctx: &RequestContext, pathname: &str) -> String {
        let root = clean(&ctx.root);
        if clean(pathname) == root {
            root
        } else {
            parent(pathname)
        }
    }

    /// Fail unless the context allows mutations.
    fn require_edit(ctx: &RequestContext) -> AppResult<()> {
        if ctx.can_edit {
            Ok(())
        } else {
            Err(AppError::not_authorized())
        }
    }

    /// Hand a job to the thumbnail pipeline.
    fn schedule(&self, job: ThumbnailJob) {
        self.jobs.submit(job);
    }
}
