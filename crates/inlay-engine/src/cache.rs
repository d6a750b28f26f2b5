//! Deduplicating asset cache
//!
//! Guarantees each asset identity is read and optimized at most once per
//! engine instance, no matter how many references exist or how many
//! documents resolve concurrently.
//!
//! The protocol is a future registry keyed by identity: the first caller
//! to observe an absent identity claims it by inserting a pending slot
//! under the map lock and spawning exactly one load task; everyone else
//! awaits the same shared completion signal. A failed load removes the
//! slot again so a later call can retry from scratch.

use crate::error::AssetError;
use crate::io::StorageReader;
use crate::optimize::AssetOptimizer;
use crate::types::AssetId;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A fully loaded, optimized asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Final asset content
    pub content: String,
    /// Content length in bytes
    pub len: usize,
}

impl CacheEntry {
    fn new(content: String) -> Self {
        let len = content.len();
        Self { content, len }
    }
}

/// Monotonic hit/miss counters
///
/// `hits + misses` always equals the total number of reference
/// occurrences ever submitted to the cache over the instance lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    /// Occurrences served without triggering a load
    pub hits: u64,
    /// Occurrences that triggered a load
    pub misses: u64,
}

type LoadResult = Result<Arc<CacheEntry>, AssetError>;
type LoadFuture = Shared<BoxFuture<'static, LoadResult>>;

enum Slot {
    Pending(LoadFuture),
    Ready(Arc<CacheEntry>),
}

struct CacheInner {
    slots: Mutex<HashMap<AssetId, Slot>>,
    hits: AtomicU64,
    misses: AtomicU64,
    reader: Arc<dyn StorageReader>,
    optimizer: Option<Arc<dyn AssetOptimizer>>,
}

/// Concurrency-safe, per-instance dedup cache over asset identities
///
/// Cheap to clone; clones share the same slot map and counters. Entries
/// are never evicted: lifetime equals the engine instance's.
#[derive(Clone)]
pub struct DedupCache {
    inner: Arc<CacheInner>,
}

impl std::fmt::Debug for DedupCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupCache")
            .field("entries", &self.inner.slots.lock().len())
            .field("stats", &self.stats())
            .finish()
    }
}

impl DedupCache {
    /// Create a cache over the given reader and optional optimizer
    #[must_use]
    pub fn new(
        reader: Arc<dyn StorageReader>,
        optimizer: Option<Arc<dyn AssetOptimizer>>,
    ) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                slots: Mutex::new(HashMap::new()),
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
                reader,
                optimizer,
            }),
        }
    }

    /// Resolve a batch of identities, each with its occurrence count
    ///
    /// Identities already resolved or in flight count every occurrence
    /// as a hit; an absent identity counts one miss (the single load now
    /// underway) and the remaining occurrences as hits. Independent
    /// identities load concurrently; a failure for one identity is
    /// returned for that identity only and un-claims its slot so a later
    /// call can retry.
    pub async fn resolve(
        &self,
        requests: Vec<(AssetId, usize)>,
    ) -> HashMap<AssetId, LoadResult> {
        let mut ready = Vec::new();
        let mut waits = Vec::new();
        {
            let mut slots = self.inner.slots.lock();
            for (id, occurrences) in requests {
                let occurrences = occurrences as u64;
                match slots.get(&id) {
                    Some(Slot::Ready(entry)) => {
                        self.inner.hits.fetch_add(occurrences, Ordering::Relaxed);
                        ready.push((id, Ok(entry.clone())));
                    }
                    Some(Slot::Pending(fut)) => {
                        self.inner.hits.fetch_add(occurrences, Ordering::Relaxed);
                        waits.push((id, fut.clone()));
                    }
                    None => {
                        self.inner.misses.fetch_add(1, Ordering::Relaxed);
                        self.inner
                            .hits
                            .fetch_add(occurrences.saturating_sub(1), Ordering::Relaxed);
                        let fut = self.spawn_load(id.clone());
                        slots.insert(id.clone(), Slot::Pending(fut.clone()));
                        waits.push((id, fut));
                    }
                }
            }
        }

        let awaited = futures::future::join_all(
            waits
                .into_iter()
                .map(|(id, fut)| async move { (id, fut.await) }),
        )
        .await;

        ready.into_iter().chain(awaited).collect()
    }

    /// Snapshot of the cumulative hit/miss counters
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
        }
    }

    /// Number of identities currently resolved or in flight
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.inner.slots.lock().len()
    }

    /// Spawn the single read-and-optimize task for a freshly claimed
    /// identity
    ///
    /// The work runs detached: a caller abandoning its wait does not
    /// cancel the load, which stays useful to other waiters.
    fn spawn_load(&self, id: AssetId) -> LoadFuture {
        let inner = self.inner.clone();
        let handle = tokio::spawn(async move {
            let guard = ClaimGuard::new(&inner, &id);
            let result = load_asset(&inner, &id).await.map(Arc::new);
            guard.complete(result.clone());
            result
        });

        async move {
            match handle.await {
                Ok(result) => result,
                Err(join_err) => Err(AssetError::Internal(format!(
                    "asset load task panicked: {join_err}"
                ))),
            }
        }
        .boxed()
        .shared()
    }
}

async fn load_asset(inner: &CacheInner, id: &AssetId) -> Result<CacheEntry, AssetError> {
    tracing::debug!(asset = %id, "loading asset");

    let bytes = inner
        .reader
        .read(id.as_path())
        .await
        .map_err(|e| AssetError::read(id, e.to_string()))?;
    let raw =
        String::from_utf8(bytes).map_err(|_| AssetError::read(id, "asset is not valid utf-8"))?;

    let content = match &inner.optimizer {
        Some(optimizer) => optimizer
            .optimize(&raw, id.as_path())
            .map_err(|e| AssetError::optimize(id, e.to_string()))?,
        None => raw,
    };

    tracing::debug!(asset = %id, bytes = content.len(), "asset ready");
    Ok(CacheEntry::new(content))
}

/// Releases a claim that did not run to an orderly completion
///
/// If the load task unwinds before `complete`, the pending slot is
/// removed so the identity is not permanently stuck in flight.
struct ClaimGuard {
    inner: Arc<CacheInner>,
    id: AssetId,
    armed: bool,
}

impl ClaimGuard {
    fn new(inner: &Arc<CacheInner>, id: &AssetId) -> Self {
        Self {
            inner: inner.clone(),
            id: id.clone(),
            armed: true,
        }
    }

    fn complete(mut self, result: LoadResult) {
        self.armed = false;
        let mut slots = self.inner.slots.lock();
        match result {
            Ok(entry) => {
                let previous = slots.insert(self.id.clone(), Slot::Ready(entry.clone()));
                if let Some(Slot::Ready(existing)) = previous {
                    if !existing.content.is_empty() && !entry.content.is_empty() {
                        // Two completed reads for one identity means the
                        // claim protocol is broken; abort loudly.
                        tracing::error!(asset = %self.id, "duplicate completed read");
                        drop(slots);
                        panic!(
                            "dedup cache consistency violated: asset {} completed twice",
                            self.id
                        );
                    }
                }
            }
            Err(_) => {
                // A failed attempt must not poison future resolves.
                slots.remove(&self.id);
            }
        }
    }
}

impl Drop for ClaimGuard {
    fn drop(&mut self) {
        if self.armed {
            self.inner.slots.lock().remove(&self.id);
        }
    }
}
