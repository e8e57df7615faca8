//! Sandboxed File Storage
//!
//! Uploaded files (player photos, medical attachments) live under a single
//! media root. Every path handed to [`FileStore`] is relative to that root
//! and is resolved lexically before touching the disk:
//! - absolute paths are rejected
//! - `..` may never climb above the root
//! - existing targets are canonicalized and re-checked (symlinks)
//!
//! Writes are atomic: data goes to a unique temp file in the target
//! directory, is synced, then renamed over the destination.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Longest stored file name (bytes)
const MAX_FILE_NAME_LEN: usize = 120;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Path escapes the storage root: {0}")]
    PathTraversal(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        StorageError::Io {
            context: context.into(),
            source,
        }
    }
}

#[derive(Debug)]
struct FileStoreInner {
    root: PathBuf,
    tmp_counter: AtomicU64,
}

/// Handle to the media root; cheap to clone
#[derive(Debug, Clone)]
pub struct FileStore {
    inner: Arc<FileStoreInner>,
}

impl FileStore {
    /// Open (and create if missing) the storage root
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref();
        fs::create_dir_all(root)
            .await
            .map_err(|e| StorageError::io(format!("Failed to create {}", root.display()), e))?;
        let root = fs::canonicalize(root)
            .await
            .map_err(|e| StorageError::io(format!("Failed to resolve {}", root.display()), e))?;

        tracing::debug!(root = %root.display(), "File store opened");

        Ok(Self {
            inner: Arc::new(FileStoreInner {
                root,
                tmp_counter: AtomicU64::new(0),
            }),
        })
    }

    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Map a relative path to its location under the root
    pub async fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
        let path = path.as_ref();
        let relative = normalize_relative(path)?;
        if relative.as_os_str().is_empty() {
            return Err(StorageError::PathTraversal(path.display().to_string()));
        }

        let joined = self.inner.root.join(relative);
        match fs::canonicalize(&joined).await {
            Ok(canonical) if canonical.starts_with(&self.inner.root) => Ok(canonical),
            Ok(canonical) => Err(StorageError::PathTraversal(
                canonical.display().to_string(),
            )),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(joined),
            Err(e) => Err(StorageError::io(format!("Failed to resolve {}", joined.display()), e)),
        }
    }

    /// Atomically write `data` to `path`, creating parent directories
    pub async fn write(&self, path: impl AsRef<Path>, data: &[u8]) -> Result<(), StorageError> {
        let resolved = self.resolve(path).await?;

        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::io(format!("Failed to create {}", parent.display()), e)
            })?;
        }

        let temp = self.temp_path(&resolved);
        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .map_err(|e| StorageError::io(format!("Temp creation failed: {}", temp.display()), e))?;
            file.write_all(data)
                .await
                .map_err(|e| StorageError::io("Write failed", e))?;
            file.sync_all()
                .await
                .map_err(|e| StorageError::io("Sync failed", e))?;
        }

        if let Err(e) = fs::rename(&temp, &resolved).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StorageError::io(
                format!("Rename failed: {} -> {}", temp.display(), resolved.display()),
                e,
            ));
        }

        tracing::debug!(path = %resolved.display(), bytes = data.len(), "File saved");
        Ok(())
    }

    pub async fn read(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, StorageError> {
        let resolved = self.resolve(path).await?;
        fs::read(&resolved).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(resolved.display().to_string()),
            _ => StorageError::io(format!("Read failed: {}", resolved.display()), e),
        })
    }

    /// Delete a file; returns `false` if it was already gone
    pub async fn delete(&self, path: impl AsRef<Path>) -> Result<bool, StorageError> {
        let resolved = self.resolve(path).await?;
        match fs::remove_file(&resolved).await {
            Ok(()) => {
                tracing::debug!(path = %resolved.display(), "File deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(
                format!("Delete failed: {}", resolved.display()),
                e,
            )),
        }
    }

    pub async fn exists(&self, path: impl AsRef<Path>) -> Result<bool, StorageError> {
        let resolved = self.resolve(path).await?;
        fs::try_exists(&resolved)
            .await
            .map_err(|e| StorageError::io(format!("Stat failed: {}", resolved.display()), e))
    }

    fn temp_path(&self, target: &Path) -> PathBuf {
        let n = self.inner.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let name = target
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        target.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), n))
    }
}

/// Reduce an uploaded file name to a safe single path segment
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
/// Leading dots are dropped so uploads can never be hidden files.
pub fn sanitize_file_name(name: &str) -> String {
    // browsers on Windows may send the full client path
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let mut cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned = cleaned.trim_start_matches('.').to_string();

    if cleaned.len() > MAX_FILE_NAME_LEN {
        // keep the extension
        let ext = Path::new(&cleaned)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .filter(|e| e.len() < 16);
        let keep = MAX_FILE_NAME_LEN - ext.as_ref().map_or(0, |e| e.len() + 1);
        let mut head: String = cleaned.chars().take(keep).collect();
        if let Some(ext) = ext {
            head.push('.');
            head.push_str(&ext);
        }
        cleaned = head;
    }

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Collapse `.` and `..` without ever leaving the root
fn normalize_relative(path: &Path) -> Result<PathBuf, StorageError> {
    let mut out = PathBuf::new();
    for c in path.components() {
        match c {
            Component::CurDir => {}
            Component::Normal(seg) => out.push(seg),
            Component::ParentDir => {
                if !out.pop() {
                    return Err(StorageError::PathTraversal(path.display().to_string()));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::PathTraversal(path.display().to_string()));
            }
        }
    }
    Ok(out)
}
