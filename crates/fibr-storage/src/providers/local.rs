//! Local filesystem storage provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use fibr_core::error::{AppError, ErrorKind};
use fibr_core::result::AppResult;
use fibr_core::traits::storage::{ByteStream, Storage};
use fibr_core::types::StorageItem;

use crate::path::{clean, has_traversal, join};

/// Permissions of directories created by the provider.
#[cfg(unix)]
const DIRECTORY_MODE: u32 = 0o700;

/// Local filesystem storage provider serving one directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Root directory for all stored files.
    root: PathBuf,
}

impl LocalStorage {
    /// Create a provider rooted at an existing directory.
    pub async fn new(root_directory: &str) -> AppResult<Self> {
        let root = fs::canonicalize(root_directory).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Storage root {root_directory} is not accessible"),
                e,
            )
        })?;

        let meta = fs::metadata(&root).await?;
        if !meta.is_dir() {
            return Err(AppError::configuration(format!(
                "Storage root {root_directory} is not a directory"
            )));
        }

        Ok(Self { root })
    }

    /// Map a store pathname onto the filesystem, refusing anything that would
    /// land outside the root.
    fn resolve(&self, pathname: &str) -> AppResult<PathBuf> {
        if has_traversal(pathname) {
            return Err(AppError::not_authorized());
        }

        let clean = clean(pathname);
        let full_path = self.root.join(clean.trim_start_matches('/'));
        if !full_path.starts_with(&self.root) {
            return Err(AppError::not_authorized());
        }

        Ok(full_path)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory of {}", path.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn storage_type(&self) -> &str {
        "local"
    }

    fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "/".to_string())
    }

    async fn info(&self, pathname: &str) -> AppResult<StorageItem> {
        let full_path = self.resolve(pathname)?;
        let meta = fs::metadata(&full_path)
            .await
            .map_err(|e| io_error(e, "stat", pathname))?;

        Ok(to_item(&clean(pathname), &meta))
    }

    async fn list(&self, pathname: &str) -> AppResult<Vec<StorageItem>> {
        let full_path = self.resolve(pathname)?;
        let mut dir = fs::read_dir(&full_path)
            .await
            .map_err(|e| io_error(e, "list", pathname))?;

        let mut entries = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| io_error(e, "list", pathname))?
        {
            let meta = entry
                .metadata()
                .await
                .map_err(|e| io_error(e, "stat", pathname))?;
            let name = entry.file_name().to_string_lossy().to_string();
            entries.push(to_item(&join(&[pathname, &name]), &meta));
        }

        entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then(a.name.cmp(&b.name)));
        Ok(entries)
    }

    async fn read(&self, pathname: &str) -> AppResult<ByteStream<'static>> {
        let full_path = self.resolve(pathname)?;
        let file = fs::File::open(&full_path)
            .await
            .map_err(|e| io_error(e, "open", pathname))?;

        Ok(Box::pin(ReaderStream::new(file)))
    }

    async fn read_bytes(&self, pathname: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(pathname)?;
        let data = fs::read(&full_path)
            .await
            .map_err(|e| io_error(e, "read", pathname))?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, pathname: &str, mut content: ByteStream<'_>) -> AppResult<u64> {
        let full_path = self.resolve(pathname)?;
        self.ensure_parent(&full_path).await?;

        let mut file = fs::File::create(&full_path)
            .await
            .map_err(|e| io_error(e, "create", pathname))?;

        let mut total_bytes = 0u64;
        while let Some(chunk) = content.next().await {
            let chunk = chunk.map_err(|e| io_error(e, "receive", pathname))?;
            total_bytes += chunk.len() as u64;
            file.write_all(&chunk)
                .await
                .map_err(|e| io_error(e, "write", pathname))?;
        }

        file.flush()
            .await
            .map_err(|e| io_error(e, "flush", pathname))?;

        debug!(pathname, bytes = total_bytes, "Wrote file from stream");
        Ok(total_bytes)
    }

    async fn write_new(&self, pathname: &str, content: Bytes) -> AppResult<bool> {
        let full_path = self.resolve(pathname)?;
        self.ensure_parent(&full_path).await?;

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(io_error(e, "create", pathname)),
        };

        file.write_all(&content)
            .await
            .map_err(|e| io_error(e, "write", pathname))?;
        file.flush()
            .await
            .map_err(|e| io_error(e, "flush", pathname))?;

        debug!(pathname, bytes = content.len(), "Created file");
        Ok(true)
    }

    async fn create_dir(&self, pathname: &str) -> AppResult<()> {
        let full_path = self.resolve(pathname)?;
        create_dir_all(&full_path)
            .await
            .map_err(|e| io_error(e, "create directory", pathname))
    }

    async fn remove(&self, pathname: &str) -> AppResult<()> {
        let full_path = self.resolve(pathname)?;
        let meta = fs::symlink_metadata(&full_path)
            .await
            .map_err(|e| io_error(e, "stat", pathname))?;

        let removed = if meta.is_dir() {
            fs::remove_dir_all(&full_path).await
        } else {
            fs::remove_file(&full_path).await
        };
        removed.map_err(|e| io_error(e, "remove", pathname))?;

        debug!(pathname, "Removed entry");
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        let from_path = self.resolve(from)?;
        let to_path = self.resolve(to)?;
        self.ensure_parent(&to_path).await?;

        fs::rename(&from_path, &to_path).await.map_err(|e| {
            let kind = if e.kind() == std::io::ErrorKind::NotFound {
                ErrorKind::NotFound
            } else {
                ErrorKind::Storage
            };
            AppError::with_source(kind, format!("Failed to rename {from} to {to}"), e)
        })?;

        debug!(from, to, "Renamed entry");
        Ok(())
    }

    async fn walk(
        &self,
        pathname: &str,
        skip_dir: &(dyn for<'a> Fn(&'a StorageItem) -> bool + Send + Sync),
    ) -> AppResult<Vec<StorageItem>> {
        let root = clean(pathname);
        let mut files = Vec::new();
        let mut pending = vec![root.clone()];

        while let Some(current) = pending.pop() {
            let items = match self.list(&current).await {
                Ok(items) => items,
                Err(e) if current == root => return Err(e),
                Err(e) => {
                    warn!(pathname = %current, error = %e, "Skipping unreadable directory");
                    continue;
                }
            };

            for item in items {
                if !item.is_dir {
                    files.push(item);
                } else if !skip_dir(&item) {
                    pending.push(item.pathname);
                }
            }
        }

        Ok(files)
    }
}

/// Build a [`StorageItem`] from filesystem metadata.
fn to_item(pathname: &str, meta: &std::fs::Metadata) -> StorageItem {
    let mod_time = meta
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    StorageItem {
        pathname: pathname.to_string(),
        name: crate::path::base(pathname),
        is_dir: meta.is_dir(),
        size: meta.len(),
        mod_time,
    }
}

/// Map an I/O failure on `pathname`, keeping `NotFound` distinguishable.
fn io_error(err: std::io::Error, action: &str, pathname: &str) -> AppError {
    if err.kind() == std::io::ErrorKind::NotFound {
        AppError::not_found(format!("{pathname} not found"))
    } else {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to {action} {pathname}"),
            err,
        )
    }
}

/// Recursively create a directory with the provider's fixed permissions.
async fn create_dir_all(path: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIRECTORY_MODE);
    builder.create(path).await
}
