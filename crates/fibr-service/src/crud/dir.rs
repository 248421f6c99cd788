use tracing::info;

use fibr_core::error::AppError;
use fibr_core::result::AppResult;
use fibr_storage::path::{base, sanitize_name};

use super::CrudService;
use crate::context::RequestContext;
use crate::view::{Layout, Message, Outcome};

impl CrudService {
    /// Create a directory, named by `name` or by the request path itself when
    /// it ends with a separator. Missing parents are created too.
    pub async fn create_dir(
        &self,
        ctx: &RequestContext,
        name: Option<&str>,
        layout: Layout,
    ) -> AppResult<Outcome> {
        Self::require_edit(ctx)?;

        let pathname = match name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => {
                let name = sanitize_name(name, true);
                if name.is_empty() {
                    return Err(AppError::validation("Name for directory is invalid"));
                }
                self.resolver
                    .resolve(&ctx.root, &ctx.path, Some(&name))
                    .await?
                    .pathname
            }
            None if ctx.is_directory_path() => {
                self.resolver.resolve(&ctx.root, &ctx.path, None).await?.pathname
            }
            None => return Err(AppError::validation("Name for directory is required")),
        };

        self.storage.create_dir(&pathname).await?;
        info!(pathname, "Directory created");

        let message = Message::success(format!("Directory {} successfully created", base(&pathname)));
        let directory = self.parent_within_root(ctx, &pathname);
        let listing = self.listing_at(ctx, &directory, layout, Some(message)).await?;
        Ok(Outcome::Listing(Box::new(listing)))
    }
}
