//! Inlay engine
//!
//! Inlines small SVG assets referenced by markup documents directly into
//! the document tree, deduplicating disk reads and optimization work
//! across all references and all documents processed by one engine
//! instance.
//!
//! # Pipeline
//!
//! ```text
//! Document tree → finder → grouper → DedupCache.resolve
//!                                         ↓
//!                    rewriter ← policy filter (thresholds)
//! ```
//!
//! The cache is the only stateful, concurrency-sensitive component; it
//! guarantees at-most-one read-and-optimize per asset identity for the
//! engine's lifetime and tracks hit/miss counters.
//!
//! # Example
//!
//! ```rust,ignore
//! use inlay_engine::{Engine, EngineConfig};
//! use std::path::Path;
//!
//! # async fn example(tree: &mut inlay_dom::Node) -> Result<(), inlay_engine::EngineError> {
//! let engine = Engine::new(EngineConfig::new());
//! engine.process_document(tree, Some(Path::new("/site/pages"))).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod finder;
pub mod grouper;
pub mod io;
pub mod optimize;
pub mod policy;
pub mod rewrite;
pub mod types;

pub use cache::{CacheEntry, CacheStats, DedupCache};
pub use config::{EfficiencyHook, EngineConfig};
pub use engine::Engine;
pub use error::{AssetError, EngineError, OptimizeError, PathResolutionError, StorageError};
pub use finder::TARGET_ATTR;
pub use io::{FsReader, StorageReader};
pub use optimize::{AssetOptimizer, NoopOptimizer, SvgMinifier};
pub use policy::Thresholds;
pub use types::{AssetId, ReferenceGroups, ReferenceSite};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
