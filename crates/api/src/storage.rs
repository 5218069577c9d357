//! Photo file storage.
//!
//! Files are addressed by bare file name; callers validate names with
//! [`wealthlist_core::photo::validate_file_name`] before reaching storage,
//! and [`LocalPhotoStorage`] re-checks every name against its root.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};
use wealthlist_core::photo::resolve_in_dir;

/// A readable photo and its size in bytes.
pub struct PhotoFile {
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
    pub len: u64,
}

#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Write a new file from `reader`. Never overwrites an existing file.
    /// Returns the number of bytes written.
    async fn save(
        &self,
        file_name: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> io::Result<u64>;

    /// `Ok(None)` when no such file exists.
    async fn open(&self, file_name: &str) -> io::Result<Option<PhotoFile>>;

    /// Remove a file. Returns `false` if it was already absent.
    async fn remove(&self, file_name: &str) -> io::Result<bool>;
}

/// Stores photos as plain files in one directory.
#[derive(Debug, Clone)]
pub struct LocalPhotoStorage {
    root: PathBuf,
}

impl LocalPhotoStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, file_name: &str) -> io::Result<PathBuf> {
        resolve_in_dir(&self.root, file_name)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))
    }
}

#[async_trait]
impl PhotoStorage for LocalPhotoStorage {
    async fn save(
        &self,
        file_name: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> io::Result<u64> {
        let path = self.path_of(file_name)?;
        fs::create_dir_all(&self.root).await?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        let written = match tokio::io::copy(reader, &mut file).await {
            Ok(n) => n,
            Err(e) => {
                drop(file);
                if let Err(cleanup) = fs::remove_file(&path).await {
                    tracing::warn!(path = %path.display(), error = %cleanup, "Failed to remove partial upload");
                }
                return Err(e);
            }
        };
        file.flush().await?;

        tracing::debug!(path = %path.display(), bytes = written, "Photo written");
        Ok(written)
    }

    async fn open(&self, file_name: &str) -> io::Result<Option<PhotoFile>> {
        let path = self.path_of(file_name)?;
        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Ok(None);
        }

        Ok(Some(PhotoFile {
            reader: Box::new(file),
            len: metadata.len(),
        }))
    }

    async fn remove(&self, file_name: &str) -> io::Result<bool> {
        let path = self.path_of(file_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
