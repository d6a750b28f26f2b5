//! Error types for the inlining engine
//!
//! Three failure scopes:
//! - document-fatal ([`PathResolutionError`], wrapped in [`EngineError`])
//! - per-identity ([`AssetError`]): delivered to every waiter of that
//!   identity, never aborts unrelated identities, never poisons retries
//! - collaborator-local ([`StorageError`], [`OptimizeError`]): converted
//!   into [`AssetError`] at the cache boundary

use crate::types::AssetId;
use std::path::PathBuf;

/// Document base directory is unknown; relative targets cannot resolve
///
/// Fatal for the whole document: there is no partial inlining without a
/// base path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("document base directory is unknown; cannot resolve asset targets")]
pub struct PathResolutionError;

/// Per-identity failure while loading or optimizing an asset
///
/// `Clone` because one failure is shared with every concurrent waiter of
/// the same identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    /// Storage read failed
    #[error("failed to read asset {path}: {message}")]
    Read {
        /// Asset path
        path: PathBuf,
        /// Underlying read failure
        message: String,
    },

    /// Optimization transform failed
    #[error("failed to optimize asset {path}: {message}")]
    Optimize {
        /// Asset path
        path: PathBuf,
        /// Underlying optimizer failure
        message: String,
    },

    /// The load task itself failed (e.g. panicked)
    #[error("asset load task failed: {0}")]
    Internal(String),
}

impl AssetError {
    /// Create a read error for an identity
    pub fn read(id: &AssetId, message: impl Into<String>) -> Self {
        Self::Read {
            path: id.as_path().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an optimize error for an identity
    pub fn optimize(id: &AssetId, message: impl Into<String>) -> Self {
        Self::Optimize {
            path: id.as_path().to_path_buf(),
            message: message.into(),
        }
    }
}

/// Errors from the storage reader collaborator
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Asset does not exist
    #[error("asset not found: {0}")]
    NotFound(PathBuf),

    /// Any other IO failure
    #[error("io error reading {path}: {source}")]
    Io {
        /// Asset path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the optimization transform collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("optimizer failed: {0}")]
pub struct OptimizeError(pub String);

/// Document-fatal engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Relative asset targets could not be resolved
    #[error("path resolution failed: {0}")]
    PathResolution(#[from] PathResolutionError),
}
