//! Persistence of the share registry.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;

use fibr_core::METADATA_DIRECTORY_NAME;
use fibr_core::error::AppError;
use fibr_core::result::AppResult;
use fibr_core::traits::storage::Storage;
use fibr_core::types::Share;

/// Name of the registry file inside the metadata directory.
pub const SHARES_FILENAME: &str = "shares.json";

/// Loads and saves the whole share list.
#[async_trait]
pub trait ShareStore: Send + Sync + std::fmt::Debug + 'static {
    /// Read every persisted share.
    async fn load(&self) -> AppResult<Vec<Share>>;

    /// Replace the persisted list.
    async fn save(&self, shares: &[Share]) -> AppResult<()>;
}

/// Share list stored as a JSON array in the metadata directory of the store.
#[derive(Debug, Clone)]
pub struct JsonFileShareStore {
    storage: Arc<dyn Storage>,
    pathname: String,
}

impl JsonFileShareStore {
    /// Create a store backed by `/.metadata/shares.json`.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            pathname: format!("/{METADATA_DIRECTORY_NAME}/{SHARES_FILENAME}"),
        }
    }

    /// Pathname of the registry file.
    pub fn pathname(&self) -> &str {
        &self.pathname
    }
}

#[async_trait]
impl ShareStore for JsonFileShareStore {
    async fn load(&self) -> AppResult<Vec<Share>> {
        match self.storage.read_bytes(&self.pathname).await {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn save(&self, shares: &[Share]) -> AppResult<()> {
        let data = Bytes::from(serde_json::to_vec_pretty(shares)?);

        self.storage
            .create_dir(&format!("/{METADATA_DIRECTORY_NAME}"))
            .await?;
        self.storage
            .write(&self.pathname, Box::pin(stream::iter([Ok::<_, std::io::Error>(data)])))
            .await?;
        Ok(())
    }
}

/// In-memory share list, for tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct MemoryShareStore {
    shares: Mutex<Vec<Share>>,
}

impl MemoryShareStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `shares`.
    pub fn with_shares(shares: Vec<Share>) -> Self {
        Self {
            shares: Mutex::new(shares),
        }
    }
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn load(&self) -> AppResult<Vec<Share>> {
        self.shares
            .lock()
            .map(|shares| shares.clone())
            .map_err(|_| AppError::internal("Share store lock poisoned"))
    }

    async fn save(&self, shares: &[Share]) -> AppResult<()> {
        let mut guard = self
            .shares
            .lock()
            .map_err(|_| AppError::internal("Share store lock poisoned"))?;
        *guard = shares.to_vec();
        Ok(())
    }
}
