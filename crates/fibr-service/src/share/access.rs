//! Share access control: turns a raw request into a [`RequestContext`].

use std::sync::Arc;

use tracing::debug;

use fibr_auth::authenticator::Authenticator;
use fibr_core::error::AppError;
use fibr_core::result::AppResult;
use fibr_storage::path::{self, has_traversal};

use super::registry::ShareRegistry;
use crate::context::RequestContext;

/// Assets served to anyone, without credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicAsset {
    Robots,
    Sitemap,
}

impl PublicAsset {
    /// Asset served at `path`, if any.
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/robots.txt" => Some(Self::Robots),
            "/sitemap.xml" => Some(Self::Sitemap),
            _ => None,
        }
    }
}

/// Access decision for one request.
#[derive(Debug, Clone)]
pub enum Access {
    /// Proceed with the given context.
    Granted(RequestContext),
    /// Serve a public asset.
    Public(PublicAsset),
}

/// Derives the effective permissions of a request.
#[derive(Debug, Clone)]
pub struct AccessService {
    /// Share registry.
    registry: Arc<ShareRegistry>,
    /// Owner authentication.
    authenticator: Arc<dyn Authenticator>,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(registry: Arc<ShareRegistry>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            registry,
            authenticator,
        }
    }

    /// Decide access for the raw URL path and `Authorization` header value.
    ///
    /// - owner session: full rights, also on shared paths;
    /// - anonymous on a share: read, edit when the share allows it, never
    ///   share; password-protected shares need valid Basic credentials;
    /// - anonymous elsewhere: missing or malformed credentials are an
    ///   authentication error, rejected ones an authorization error.
    pub async fn authorize(&self, raw_path: &str, authorization: Option<&str>) -> AppResult<Access> {
        if has_traversal(raw_path) {
            return Err(AppError::not_authorized());
        }

        if let Some(asset) = PublicAsset::from_path(raw_path) {
            return Ok(Access::Public(asset));
        }

        let authenticated = self.authenticator.authenticate(authorization).await;
        let context = match (self.registry.find(raw_path).await, authenticated) {
            (Some(share), authenticated) => {
                let is_authenticated = authenticated.is_ok();
                if !is_authenticated {
                    self.registry.verify_password(&share, authorization).await?;
                }

                let prefix = format!("/{}", share.id);
                let path = raw_path.strip_prefix(&prefix).unwrap_or_default();
                let path = if path.is_empty() { "/" } else { path };

                debug!(share_id = %share.id, is_authenticated, "Request through share");
                RequestContext::shared(&share, path, is_authenticated)
            }
            (None, Ok(_)) => RequestContext::owner(raw_path),
            (None, Err(e)) => return Err(e.into()),
        };

        path::resolver::pathname(&context.root, &context.path, None)?;
        Ok(Access::Granted(context))
    }
}
