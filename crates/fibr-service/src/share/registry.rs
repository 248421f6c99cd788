//! In-memory share registry backed by a [`ShareStore`].
//!
//! One mutex guards the list for reads and writes alike. Mutations persist
//! the next list while holding it and only then commit, so no observer ever
//! sees a share that failed to persist.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use fibr_auth::basic::extract_basic_credentials;
use fibr_auth::password::PasswordHasher;
use fibr_core::error::AppError;
use fibr_core::result::AppResult;
use fibr_core::types::Share;

use super::link::LinkService;
use super::store::ShareStore;

/// Uniform message for every share password failure.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registry of shares.
#[derive(Debug)]
pub struct ShareRegistry {
    store: Arc<dyn ShareStore>,
    shares: Mutex<Vec<Share>>,
    links: LinkService,
}

impl ShareRegistry {
    /// Build the registry from what the store holds.
    pub async fn load(store: Arc<dyn ShareStore>) -> AppResult<Self> {
        let shares = store.load().await?;
        info!(count = shares.len(), "Share registry loaded");

        Ok(Self {
            store,
            shares: Mutex::new(shares),
            links: LinkService::new(),
        })
    }

    /// Create and persist a new share.
    ///
    /// `password_hash` is a bcrypt hash, empty for none.
    pub async fn create(
        &self,
        path: &str,
        edit: bool,
        password_hash: String,
        expiration: Option<DateTime<Utc>>,
    ) -> AppResult<Share> {
        let share = Share {
            id: self.links.generate_id(),
            path: path.to_string(),
            edit,
            password: password_hash,
            expiration,
        };

        let mut shares = self.shares.lock().await;
        let mut next = shares.clone();
        next.push(share.clone());

        self.store.save(&next).await.map_err(|e| {
            AppError::internal(format!("Share may not have been saved: {}", e.message))
        })?;
        *shares = next;

        info!(share_id = %share.id, path = %share.path, edit, "Share created");
        Ok(share)
    }

    /// Remove and persist the removal of a share.
    pub async fn remove(&self, id: &str) -> AppResult<Share> {
        let mut shares = self.shares.lock().await;
        let index = shares
            .iter()
            .position(|share| share.id == id)
            .ok_or_else(|| AppError::not_found(format!("Share {id} not found")))?;

        let mut next = shares.clone();
        let removed = next.remove(index);

        self.store.save(&next).await.map_err(|e| {
            AppError::internal(format!("Share may not have been removed: {}", e.message))
        })?;
        *shares = next;

        info!(share_id = %removed.id, "Share removed");
        Ok(removed)
    }

    /// Share whose id is the first segment of `url_path`, unless expired.
    pub async fn find(&self, url_path: &str) -> Option<Share> {
        let id = url_path.trim_start_matches('/').split('/').next()?;
        if id.is_empty() {
            return None;
        }

        let now = Utc::now();
        let shares = self.shares.lock().await;
        shares
            .iter()
            .find(|share| share.id == id && !share.is_expired(now))
            .cloned()
    }

    /// Snapshot of every share.
    pub async fn list(&self) -> Vec<Share> {
        self.shares.lock().await.clone()
    }

    /// Check the Basic credentials of `authorization` against the share's
    /// password. Shares without a password always pass.
    ///
    /// Every failure, whether a missing header, a malformed one or a wrong
    /// password, yields the same authentication error.
    pub async fn verify_password(&self, share: &Share, authorization: Option<&str>) -> AppResult<()> {
        if !share.has_password() {
            return Ok(());
        }

        let Ok(credentials) = extract_basic_credentials(authorization) else {
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        let hash = share.password.clone();
        let verified = tokio::task::spawn_blocking(move || {
            PasswordHasher::new().verify_password(&credentials.password, &hash)
        })
        .await;

        match verified {
            Ok(Ok(true)) => Ok(()),
            Ok(Err(e)) => {
                warn!(share_id = %share.id, error = %e, "Share password hash is unusable");
                Err(AppError::authentication(INVALID_CREDENTIALS))
            }
            _ => Err(AppError::authentication(INVALID_CREDENTIALS)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::store::MemoryShareStore;
    use async_trait::async_trait;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use fibr_core::error::ErrorKind;

    #[derive(Debug)]
    struct FailingStore;

    #[async_trait]
    impl ShareStore for FailingStore {
        async fn load(&self) -> AppResult<Vec<Share>> {
            Ok(Vec::new())
        }

        async fn save(&self, _shares: &[Share]) -> AppResult<()> {
            Err(AppError::storage("disk full"))
        }
    }

    async fn registry() -> (Arc<MemoryShareStore>, ShareRegistry) {
        let store = Arc::new(MemoryShareStore::new());
        let registry = ShareRegistry::load(store.clone()).await.unwrap();
        (store, registry)
    }

    fn basic(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[tokio::test]
    async fn test_create_persists_and_matches() {
        let (store, registry) = registry().await;
        let share = registry.create("/photos", false, String::new(), None).await.unwrap();

        assert_eq!(store.load().await.unwrap(), vec![share.clone()]);
        assert_eq!(registry.find(&format!("/{}/2024", share.id)).await, Some(share.clone()));
        assert_eq!(registry.find(&format!("/{}", share.id)).await, Some(share));
        assert_eq!(registry.find("/unknown/2024").await, None);
        assert_eq!(registry.find("/").await, None);
    }

    #[tokio::test]
    async fn test_failed_persist_is_not_committed() {
        let registry = ShareRegistry::load(Arc::new(FailingStore)).await.unwrap();
        let err = registry
            .create("/photos", true, String::new(), None)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Internal);
        assert!(registry.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_distinct() {
        let (_store, registry) = registry().await;
        let mut ids = std::collections::HashSet::new();
        for _ in 0..50 {
            let share = registry.create("/", false, String::new(), None).await.unwrap();
            assert!(ids.insert(share.id));
        }
    }

    #[tokio::test]
    async fn test_expired_share_does_not_match() {
        let (_store, registry) = registry().await;
        let expired = Utc::now() - chrono::Duration::minutes(1);
        let share = registry
            .create("/photos", false, String::new(), Some(expired))
            .await
            .unwrap();

        assert_eq!(registry.find(&format!("/{}", share.id)).await, None);
    }

    #[tokio::test]
    async fn test_remove() {
        let (store, registry) = registry().await;
        let share = registry.create("/a", false, String::new(), None).await.unwrap();

        registry.remove(&share.id).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
        assert!(registry.remove(&share.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_password_failures_are_uniform() {
        let (_store, registry) = registry().await;
        let hash = bcrypt::hash("letmein", 4).unwrap();
        let share = registry.create("/secret", false, hash, None).await.unwrap();

        registry
            .verify_password(&share, Some(&basic(":letmein")))
            .await
            .unwrap();
        registry
            .verify_password(&share, Some(&basic("anyone:letmein")))
            .await
            .unwrap();

        let wrong = registry
            .verify_password(&share, Some(&basic(":nope")))
            .await
            .unwrap_err();
        let missing = registry.verify_password(&share, None).await.unwrap_err();
        let malformed = registry
            .verify_password(&share, Some("Basic %%%"))
            .await
            .unwrap_err();

        for err in [&wrong, &missing, &malformed] {
            assert_eq!(err.kind, ErrorKind::Authentication);
            assert_eq!(err.message, wrong.message);
        }
    }
}
