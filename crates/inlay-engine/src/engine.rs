//! Engine orchestrator
//!
//! Wires finder, grouper, cache, policy and rewriter per document. The
//! cache (and its hit/miss counters) lives as long as the engine
//! instance and is shared by every document processed through it,
//! concurrently or not.

use crate::cache::{CacheStats, DedupCache};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::finder::find_references;
use crate::grouper::group_references;
use crate::io::{FsReader, StorageReader};
use crate::optimize::{AssetOptimizer, SvgMinifier};
use crate::policy::filter_groups;
use crate::rewrite::rewrite_references;
use crate::types::AssetId;
use inlay_dom::{FragmentParser, Node, SvgFragmentParser};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Asset resolution and inlining engine
///
/// One instance is meant to outlive many documents; processing the same
/// asset across documents costs one read and one optimization in total.
/// All methods take `&self`, so one engine can serve concurrent
/// documents directly or behind an `Arc`.
pub struct Engine {
    config: EngineConfig,
    parser: Arc<dyn FragmentParser>,
    cache: DedupCache,
    last_reported: Mutex<CacheStats>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish()
    }
}

impl Engine {
    /// Create an engine over the local filesystem with the shipping
    /// parser and minifier
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_collaborators(config, Arc::new(FsReader), None, Arc::new(SvgFragmentParser))
    }

    /// Create an engine with explicit collaborators
    ///
    /// `optimizer` overrides the shipping transform; when `None`, the
    /// `optimize` flag in `config` decides whether [`SvgMinifier`]
    /// runs.
    #[must_use]
    pub fn with_collaborators(
        config: EngineConfig,
        reader: Arc<dyn StorageReader>,
        optimizer: Option<Arc<dyn AssetOptimizer>>,
        parser: Arc<dyn FragmentParser>,
    ) -> Self {
        let optimizer = optimizer.or_else(|| {
            config
                .optimize
                .then(|| Arc::new(SvgMinifier) as Arc<dyn AssetOptimizer>)
        });
        Self {
            cache: DedupCache::new(reader, optimizer),
            parser,
            last_reported: Mutex::new(CacheStats::default()),
            config,
        }
    }

    /// Inline every qualifying SVG reference in `root`, in place
    ///
    /// `base_dir` is the directory the document's own location resolves
    /// relative targets against.
    ///
    /// Per-identity failures (unreadable or unparsable assets) leave
    /// those references untouched and do not fail the document; only a
    /// missing base directory is fatal, and only for this document.
    ///
    /// # Errors
    /// [`EngineError::PathResolution`] when `base_dir` is `None` and the
    /// document contains references.
    pub async fn process_document(
        &self,
        root: &mut Node,
        base_dir: Option<&Path>,
    ) -> Result<(), EngineError> {
        let sites = find_references(root);
        if sites.is_empty() {
            tracing::debug!("document has no asset references");
            return Ok(());
        }

        let groups = group_references(sites, base_dir)?;
        tracing::debug!(groups = groups.len(), "resolving asset groups");

        let requests = groups
            .iter()
            .map(|(id, sites)| (id.clone(), sites.len()))
            .collect();
        let resolved = self.cache.resolve(requests).await;

        let mut entries = HashMap::new();
        let mut sizes = HashMap::new();
        for (id, result) in resolved {
            match result {
                Ok(entry) => {
                    sizes.insert(id.clone(), entry.len as u64);
                    entries.insert(id, entry);
                }
                Err(err) => {
                    tracing::warn!(asset = %id, error = %err, "asset unresolved; leaving its references untouched");
                }
            }
        }

        let surviving = filter_groups(groups, &sizes, &self.config.thresholds);
        tracing::info!(inlined = surviving.len(), "inlining qualifying groups");
        rewrite_references(root, &surviving, &entries, self.parser.as_ref());

        self.report_efficiency();
        Ok(())
    }

    /// Cumulative cache statistics for this instance
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Number of distinct asset identities resolved or in flight
    #[must_use]
    pub fn cached_assets(&self) -> usize {
        self.cache.entry_count()
    }

    /// Fire the efficiency hook if the totals moved since the last report
    fn report_efficiency(&self) {
        let Some(hook) = &self.config.on_cache_efficiency else {
            return;
        };
        let stats = self.cache.stats();
        let mut last = self.last_reported.lock();
        if *last != stats {
            *last = stats;
            hook(stats.hits, stats.misses);
        }
    }

    /// Lexically resolve a target the way the grouper will
    ///
    /// Exposed for hosts that want to predict cache keys.
    #[must_use]
    pub fn asset_identity(target: &str, base_dir: &Path) -> AssetId {
        crate::grouper::resolve_target(target, base_dir)
    }
}
