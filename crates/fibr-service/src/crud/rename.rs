use tracing::info;

use fibr_core::error::AppError;
use fibr_core::result::AppResult;
use fibr_core::types::ThumbnailJob;
use fibr_storage::path::{clean, sanitize_name};

use super::CrudService;
use crate::context::RequestContext;
use crate::view::{Layout, Message, Outcome};

impl CrudService {
    /// Rename the requested entry to `new_name`, a path relative to the
    /// request root. Never overwrites an existing entry.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        new_name: &str,
        layout: Layout,
    ) -> AppResult<Outcome> {
        Self::require_edit(ctx)?;

        let new_name = sanitize_name(new_name.trim(), false);
        if new_name.trim_matches('/').is_empty() {
            return Err(AppError::validation("New name is required"));
        }

        let target = self.resolver.resolve(&ctx.root, &new_name, None).await?;
        let source = self.resolver.resolve(&ctx.root, &ctx.path, None).await?;
        let root = clean(&ctx.root);
        if source.pathname == root || target.pathname == root {
            return Err(AppError::not_authorized());
        }

        if target.exists() {
            return Err(AppError::validation(format!("{} already exists", target.relative)));
        }

        let item = source.require()?;
        let (source, target) = (item.pathname.clone(), target.pathname);

        self.storage.rename(&source, &target).await?;
        info!(from = %source, to = %target, "Entry renamed");

        self.schedule(ThumbnailJob::Move {
            from: source,
            to: target.clone(),
        });

        let message = Message::success(format!(
            "{} successfully renamed to {}",
            item.name,
            ctx.relative(&target)
        ));
        let directory = self.parent_within_root(ctx, &target);
        let listing = self.listing_at(ctx, &directory, layout, Some(message)).await?;
        Ok(Outcome::Listing(Box::new(listing)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use fibr_core::error::ErrorKind;

    #[tokio::test]
    async fn test_rename() {
        let f = fixture(1024).await;
        write(&f, "/docs/old.txt", "content");
        let ctx = RequestContext::owner("/docs/old.txt");

        let Outcome::Listing(listing) = f
            .service
            .rename(&ctx, "/docs/New Name.txt", Layout::Grid)
            .await
            .unwrap()
        else {
            panic!("expected a listing");
        };

        assert_eq!(
            listing.message.unwrap().content,
            "old.txt successfully renamed to /docs/new_name.txt"
        );
        assert!(!f.dir.path().join("docs/old.txt").exists());
        assert!(f.dir.path().join("docs/new_name.txt").exists());
        assert_eq!(
            f.jobs.taken(),
            vec![ThumbnailJob::Move {
                from: "/docs/old.txt".to_string(),
                to: "/docs/new_name.txt".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_rename_never_clobbers() {
        let f = fixture(1024).await;
        write(&f, "/docs/old.txt", "old");
        write(&f, "/docs/new.txt", "new");
        let ctx = RequestContext::owner("/docs/old.txt");

        let err = f
            .service
            .rename(&ctx, "/docs/new.txt", Layout::Grid)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(
            std::fs::read_to_string(f.dir.path().join("docs/old.txt")).unwrap(),
            "old"
        );
        assert_eq!(
            std::fs::read_to_string(f.dir.path().join("docs/new.txt")).unwrap(),
            "new"
        );
        assert!(f.jobs.taken().is_empty());
    }

    #[tokio::test]
    async fn test_rename_missing_source_and_shared_root() {
        let f = fixture(1024).await;
        let ctx = RequestContext::owner("/ghost.txt");
        let err = f
            .service
            .rename(&ctx, "/other.txt", Layout::Grid)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let share = fibr_core::types::Share {
            id: "s".to_string(),
            path: "/shared".to_string(),
            edit: true,
            password: String::new(),
            expiration: None,
        };
        write(&f, "/shared/a.txt", "a");
        let ctx = RequestContext::shared(&share, "/a.txt", false);
        f.service.rename(&ctx, "/b.txt", Layout::Grid).await.unwrap();
        assert!(f.dir.path().join("shared/b.txt").exists());

        let ctx = RequestContext::shared(&share, "/", false);
        let err = f.service.rename(&ctx, "/moved", Layout::Grid).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }
}
