//! Storage trait for the hierarchical byte store served by Fibr.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;
use crate::types::StorageItem;

/// A byte stream type used for reading and writing file contents.
pub type ByteStream<'a> = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send + 'a>>;

/// Trait for the byte-addressable hierarchical store.
///
/// Every `pathname` is absolute within the store (starting with `/`).
/// Implementations must refuse any pathname that would resolve outside their
/// root. The [`Storage`] trait is defined here in `fibr-core` and implemented
/// in `fibr-storage`.
#[async_trait]
pub trait Storage: Send + Sync + std::fmt::Debug + 'static {
    /// Return the storage type name (e.g., "local").
    fn storage_type(&self) -> &str;

    /// Human name of the served root.
    fn root_name(&self) -> String;

    /// Get the entry at the given pathname.
    ///
    /// Fails with a `NotFound` error when nothing exists there.
    async fn info(&self, pathname: &str) -> AppResult<StorageItem>;

    /// List the direct children of a directory, directories first.
    async fn list(&self, pathname: &str) -> AppResult<Vec<StorageItem>>;

    /// Open a file and return its byte stream.
    async fn read(&self, pathname: &str) -> AppResult<ByteStream<'static>>;

    /// Read a whole file into memory.
    async fn read_bytes(&self, pathname: &str) -> AppResult<Bytes>;

    /// Create or truncate a file and stream content into it.
    async fn write(&self, pathname: &str, content: ByteStream<'_>) -> AppResult<u64>;

    /// Atomically create a file that must not exist yet.
    ///
    /// Returns `false` without touching anything when the file already exists.
    async fn write_new(&self, pathname: &str, content: Bytes) -> AppResult<bool>;

    /// Create a directory and any missing parents.
    async fn create_dir(&self, pathname: &str) -> AppResult<()>;

    /// Remove a file, or a directory recursively.
    async fn remove(&self, pathname: &str) -> AppResult<()>;

    /// Rename an entry.
    async fn rename(&self, from: &str, to: &str) -> AppResult<()>;

    /// Collect every file below `pathname`, not descending into directories
    /// for which `skip_dir` returns `true`.
    ///
    /// Only a failure to list `pathname` itself is an error. Unreadable
    /// subdirectories are logged and skipped.
    async fn walk(
        &self,
        pathname: &str,
        skip_dir: &(dyn for<'a> Fn(&'a StorageItem) -> bool + Send + Sync),
    ) -> AppResult<Vec<StorageItem>>;

    /// Get the entry at the given pathname, or `None` when absent.
    async fn try_info(&self, pathname: &str) -> AppResult<Option<StorageItem>> {
        match self.info(pathname).await {
            Ok(item) => Ok(Some(item)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
