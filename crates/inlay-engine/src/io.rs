//! Storage reader boundary
//!
//! The only component that touches the filesystem. Hosts and tests plug
//! in their own readers (virtual filesystems, counting stubs).

use crate::error::StorageError;
use async_trait::async_trait;
use std::path::Path;

/// Asynchronous raw-byte reader for asset content
#[async_trait]
pub trait StorageReader: Send + Sync {
    /// Read the raw bytes of the asset at `path`
    async fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError>;
}

/// Reader backed by the local filesystem via `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

#[async_trait]
impl StorageReader for FsReader {
    async fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        tokio::fs::read(path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(path.to_path_buf())
            } else {
                StorageError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })
    }
}
