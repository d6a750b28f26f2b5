//! Core value types shared across the engine

use indexmap::IndexMap;
use inlay_dom::NodePath;
use std::path::Path;

/// Normalized absolute path uniquely identifying one physical asset
///
/// Equality is string equality after lexical normalization; this is the
/// cache key, so two references spelled differently but resolving to the
/// same file share one identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(String);

impl AssetId {
    /// Wrap an already-normalized absolute path string
    #[inline]
    #[must_use]
    pub fn new(normalized: impl Into<String>) -> Self {
        Self(normalized.into())
    }

    /// The identity as a string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identity as a filesystem path
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One discovered reference to an asset
///
/// The site is addressed by path rather than held as a borrow so the
/// rewriter can mutate the tree without aliasing the finder's results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSite {
    /// Where the reference node lives in the document tree
    pub path: NodePath,
    /// The raw target attribute value as written in the document
    pub target: String,
}

/// All references of one document, grouped by asset identity
///
/// Insertion order is discovery order, which keeps output deterministic.
pub type ReferenceGroups = IndexMap<AssetId, Vec<ReferenceSite>>;
