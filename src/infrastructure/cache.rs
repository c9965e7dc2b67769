//! In-memory TTL caching for chain reads
//!
//! This module provides the session-lifetime read cache behind the
//! read-through node access layer: a per-entity-kind mapping from key to
//! (value, fetch timestamp), with fixed freshness policy and no eviction
//! beyond replacement. A refresh writes a whole new entry under a single
//! write-lock scope, so readers never observe a partial overwrite;
//! concurrent refreshes of one key resolve to last-write-wins.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::core::types::Timestamp;

/// Kind of chain entity held in a cache, with its freshness policy
///
/// TTLs are fixed policy constants, not runtime-configurable: operator and
/// balance records move every block, domain summaries only at epoch
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Operator registration and stake records
    Operator,
    /// Account balance records
    Balance,
    /// Domain staking summaries
    Domain,
}

impl EntityKind {
    /// Maximum age before a cached entry must be refreshed
    pub const fn ttl(self) -> Duration {
        match self {
            Self::Operator => Duration::from_secs(30),
            Self::Balance => Duration::from_secs(10),
            Self::Domain => Duration::from_secs(300),
        }
    }

    /// Label used in logs and metrics
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Balance => "balance",
            Self::Domain => "domain",
        }
    }
}

/// A cached value together with the moment it was fetched
///
/// Entries are immutable once written; a refresh replaces the entry rather
/// than mutating it, and the timestamp always reflects the original fetch,
/// so callers handed a stale fallback can detect its age.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<T> {
    /// The cached record
    pub value: T,
    /// When the record was fetched from the node
    pub fetched_at: Timestamp,
}

impl<T> CacheEntry<T> {
    /// Create a new entry fetched at the given moment
    pub fn new(value: T, fetched_at: Timestamp) -> Self {
        Self { value, fetched_at }
    }

    /// Check whether this entry is still fresh at `now`
    pub fn is_fresh(&self, now: Timestamp, kind: EntityKind) -> bool {
        is_fresh(self.fetched_at, now, kind)
    }

    /// Age of the entry at `now`; zero if the clock ran backwards
    pub fn age(&self, now: Timestamp) -> Duration {
        now.duration_since(self.fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Pure freshness check: `now - fetched_at < ttl(kind)`
///
/// A timestamp from the future (clock skew, or a late write landing after a
/// newer read of the clock) counts as fresh.
pub fn is_fresh(fetched_at: Timestamp, now: Timestamp, kind: EntityKind) -> bool {
    match now.duration_since(fetched_at).to_std() {
        Ok(age) => age < kind.ttl(),
        Err(_) => true,
    }
}

/// Cache hit/miss accounting
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    /// Reads answered by a fresh cached entry
    pub hits: u64,
    /// Reads that had to go to the node
    pub misses: u64,
    /// Reads answered by a stale entry after a failed refresh
    pub stale_served: u64,
    /// Entries replaced by a refresh
    pub replacements: u64,
}

impl CacheMetrics {
    /// Fraction of reads served from cache, 0.0 when nothing was read yet
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

/// Session-lifetime TTL cache for one entity kind
///
/// Keys are never evicted, only replaced; the cache is bounded by the number
/// of distinct keys a session queries. Mutation goes through a single
/// `RwLock`, so each `put` is atomic from any reader's perspective.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    kind: EntityKind,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    metrics: Arc<Mutex<CacheMetrics>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    /// Create an empty cache for the given entity kind
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            entries: RwLock::new(HashMap::new()),
            metrics: Arc::new(Mutex::new(CacheMetrics::default())),
        }
    }

    /// The entity kind this cache holds
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Look up the entry for a key, fresh or stale
    pub async fn get(&self, key: &K) -> Option<CacheEntry<V>> {
        self.entries.read().await.get(key).cloned()
    }

    /// Insert or replace the entry for a key
    pub async fn put(&self, key: K, value: V, fetched_at: Timestamp) {
        let entry = CacheEntry::new(value, fetched_at);
        let replaced = {
            let mut entries = self.entries.write().await;
            entries.insert(key.clone(), entry).is_some()
        };

        if replaced {
            let mut metrics = self.metrics.lock().await;
            metrics.replacements += 1;
        }

        debug!(kind = self.kind.as_str(), ?key, replaced, "cache put");
    }

    /// Number of distinct keys cached
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Record a read answered by a fresh entry
    pub async fn record_hit(&self) {
        self.metrics.lock().await.hits += 1;
        metrics::counter!("staking_cache_hits_total", "kind" => self.kind.as_str()).increment(1);
    }

    /// Record a read that had to query the node
    pub async fn record_miss(&self) {
        self.metrics.lock().await.misses += 1;
        metrics::counter!("staking_cache_misses_total", "kind" => self.kind.as_str()).increment(1);
    }

    /// Record a read answered by a stale entry after a failed refresh
    pub async fn record_stale_served(&self) {
        self.metrics.lock().await.stale_served += 1;
        metrics::counter!("staking_cache_stale_served_total", "kind" => self.kind.as_str())
            .increment(1);
    }

    /// Snapshot of the accounting counters
    pub async fn metrics(&self) -> CacheMetrics {
        self.metrics.lock().await.clone()
    }
}
