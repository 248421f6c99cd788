use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::info;

use fibr_core::error::AppError;
use fibr_core::result::AppResult;
use fibr_core::types::ThumbnailJob;
use fibr_storage::path::{base, clean};

use super::CrudService;
use crate::context::RequestContext;
use crate::view::Outcome;

impl CrudService {
    /// Delete the requested entry, or its child `name`. Directories are
    /// removed recursively. Answers with a redirect to the parent directory.
    pub async fn delete(&self, ctx: &RequestContext, name: Option<&str>) -> AppResult<Outcome> {
        Self::require_edit(ctx)?;

        let name = name.map(str::trim).filter(|name| !name.is_empty());
        let resolved = self.resolver.resolve(&ctx.root, &ctx.path, name).await?;
        if resolved.pathname == clean(&ctx.root) {
            return Err(AppError::not_authorized());
        }

        let pathname = resolved.require()?.pathname;

        self.storage.remove(&pathname).await?;
        info!(pathname, "Entry deleted");

        self.schedule(ThumbnailJob::Delete {
            pathname: pathname.clone(),
        });

        let message = format!("{} successfully deleted", base(&pathname));
        let directory = ctx.uri(&self.parent_within_root(ctx, &pathname));
        Ok(Outcome::Redirect(format!(
            "{}/?message={}&messageLevel=success",
            directory.trim_end_matches('/'),
            utf8_percent_encode(&message, NON_ALPHANUMERIC)
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use fibr_core::error::ErrorKind;

    #[tokio::test]
    async fn test_delete_file_redirects_to_parent() {
        let f = fixture(1024).await;
        write(&f, "/docs/old.txt", "x");
        let ctx = RequestContext::owner("/docs/old.txt");

        let outcome = f.service.delete(&ctx, None).await.unwrap();
        let Outcome::Redirect(location) = outcome else {
            panic!("expected a redirect");
        };

        assert_eq!(
            location,
            "/docs/?message=old%2Etxt%20successfully%20deleted&messageLevel=success"
        );
        assert!(!f.dir.path().join("docs/old.txt").exists());
        assert_eq!(
            f.jobs.taken(),
            vec![ThumbnailJob::Delete {
                pathname: "/docs/old.txt".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_delete_named_directory() {
        let f = fixture(1024).await;
        write(&f, "/a/sub/deep.txt", "x");
        let ctx = RequestContext::owner("/a/");

        let Outcome::Redirect(location) = f.service.delete(&ctx, Some("sub")).await.unwrap() else {
            panic!("expected a redirect");
        };
        assert!(location.starts_with("/a/?message="));
        assert!(!f.dir.path().join("a/sub").exists());
    }

    #[tokio::test]
    async fn test_delete_errors() {
        let f = fixture(1024).await;

        let err = f
            .service
            .delete(&RequestContext::owner("/missing"), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = f
            .service
            .delete(&RequestContext::owner("/"), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        write(&f, "/keep.txt", "x");
        let mut ctx = RequestContext::owner("/keep.txt");
        ctx.can_edit = false;
        let err = f.service.delete(&ctx, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert!(f.dir.path().join("keep.txt").exists());
    }
}
