//! Engine configuration

use crate::policy::Thresholds;
use std::sync::Arc;

/// Callback invoked after a document when cumulative cache totals moved
pub type EfficiencyHook = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Configuration for one engine instance, immutable after construction
#[derive(Clone)]
pub struct EngineConfig {
    /// Inlining thresholds
    pub thresholds: Thresholds,
    /// Whether to apply the optimization transform to asset content
    pub optimize: bool,
    /// Reported with cumulative `(hits, misses)` once per processed
    /// document, only when the totals changed since the last report
    pub on_cache_efficiency: Option<EfficiencyHook>,
}

impl EngineConfig {
    /// Default configuration: default thresholds, optimization on
    #[must_use]
    pub fn new() -> Self {
        Self {
            thresholds: Thresholds::default(),
            optimize: true,
            on_cache_efficiency: None,
        }
    }

    /// Replace the thresholds
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Enable or disable the optimization transform
    #[must_use]
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Install the cache-efficiency callback
    #[must_use]
    pub fn with_efficiency_hook(mut self, hook: EfficiencyHook) -> Self {
        self.on_cache_efficiency = Some(hook);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("thresholds", &self.thresholds)
            .field("optimize", &self.optimize)
            .field("on_cache_efficiency", &self.on_cache_efficiency.is_some())
            .finish()
    }
}
