//! Read-through cached access to remote node state
//!
//! [`ChainReader`] is the single entry point the rest of the portal uses to
//! read operators, balances, and domain summaries. Each read consults the
//! per-kind TTL cache first, refreshes from the node when stale, and falls
//! back to the last known value when the node is unreachable: slightly
//! stale data beats a hard failure for display purposes. Only a miss with
//! no cached fallback surfaces an error.

use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::core::error::StakingError;
use crate::core::result::StakingResult;
use crate::core::types::{AccountAddress, DomainId, EpochIndex, OperatorId, Timestamp};
use crate::infrastructure::cache::{CacheMetrics, EntityKind, TtlCache};

use super::rpc::ChainQuery;
use super::types::{BalanceRecord, DomainRecord, OperatorRecord};

/// Cache accounting across all three entity kinds
#[derive(Debug, Clone, Default)]
pub struct ReaderStats {
    /// Operator cache counters
    pub operators: CacheMetrics,
    /// Balance cache counters
    pub balances: CacheMetrics,
    /// Domain cache counters
    pub domains: CacheMetrics,
}

/// Cached read-through access to operator, balance, and domain records
///
/// Owns one [`TtlCache`] per entity kind, constructed once per application
/// session and passed by reference rather than held as global state, so
/// every test gets a fresh store.
pub struct ChainReader {
    node: Arc<dyn ChainQuery>,
    pub(crate) operators: TtlCache<OperatorId, OperatorRecord>,
    pub(crate) balances: TtlCache<AccountAddress, BalanceRecord>,
    pub(crate) domains: TtlCache<DomainId, DomainRecord>,
}

impl ChainReader {
    /// Create a reader over the given node connection with empty caches
    pub fn new(node: Arc<dyn ChainQuery>) -> Self {
        Self {
            node,
            operators: TtlCache::new(EntityKind::Operator),
            balances: TtlCache::new(EntityKind::Balance),
            domains: TtlCache::new(EntityKind::Domain),
        }
    }

    /// Read an operator record, cached for up to 30 seconds
    ///
    /// Returns the cached record while fresh; otherwise refreshes from the
    /// node. A failed refresh degrades to the last known record if one
    /// exists (its timestamp still reflects the original fetch), else fails
    /// with [`StakingError::ChainUnavailable`].
    #[instrument(skip(self))]
    pub async fn read_operator(&self, id: OperatorId) -> StakingResult<OperatorRecord> {
        let now = Timestamp::now();
        if let Some(entry) = self.operators.get(&id).await {
            if entry.is_fresh(now, EntityKind::Operator) {
                self.operators.record_hit().await;
                return Ok(entry.value);
            }
        }
        self.operators.record_miss().await;

        let fetched = self
            .node
            .operator(id)
            .await
            .and_then(|raw| OperatorRecord::from_wire(id, &raw));

        match fetched {
            Ok(record) => {
                self.operators.put(id, record.clone(), Timestamp::now()).await;
                Ok(record)
            }
            Err(error) => self.fallback_operator(id, error).await,
        }
    }

    async fn fallback_operator(
        &self,
        id: OperatorId,
        error: StakingError,
    ) -> StakingResult<OperatorRecord> {
        if let Some(stale) = self.operators.get(&id).await {
            warn!("⚠️  Serving stale operator {} after refresh failure: {}", id, error);
            self.operators.record_stale_served().await;
            return Ok(stale.value);
        }
        Err(StakingError::chain_unavailable("operator".to_string(), id.to_string())
            .with_source(error))
    }

    /// Read an account balance record, cached for up to 10 seconds
    ///
    /// Same freshness and stale-fallback contract as [`Self::read_operator`].
    #[instrument(skip(self, address), fields(address = %address))]
    pub async fn read_balance(&self, address: &AccountAddress) -> StakingResult<BalanceRecord> {
        let now = Timestamp::now();
        if let Some(entry) = self.balances.get(address).await {
            if entry.is_fresh(now, EntityKind::Balance) {
                self.balances.record_hit().await;
                return Ok(entry.value);
            }
        }
        self.balances.record_miss().await;

        let fetched = self
            .node
            .balance(address)
            .await
            .and_then(|raw| BalanceRecord::from_wire(address.clone(), &raw));

        match fetched {
            Ok(record) => {
                self.balances
                    .put(address.clone(), record.clone(), Timestamp::now())
                    .await;
                Ok(record)
            }
            Err(error) => {
                if let Some(stale) = self.balances.get(address).await {
                    warn!(
                        "⚠️  Serving stale balance for {} after refresh failure: {}",
                        address, error
                    );
                    self.balances.record_stale_served().await;
                    return Ok(stale.value);
                }
                Err(StakingError::chain_unavailable(
                    "balance".to_string(),
                    address.to_string(),
                )
                .with_source(error))
            }
        }
    }

    /// Read a domain staking summary, cached for up to 300 seconds
    ///
    /// Same freshness and stale-fallback contract as [`Self::read_operator`].
    #[instrument(skip(self))]
    pub async fn read_domain_summary(&self, id: DomainId) -> StakingResult<DomainRecord> {
        let now = Timestamp::now();
        if let Some(entry) = self.domains.get(&id).await {
            if entry.is_fresh(now, EntityKind::Domain) {
                self.domains.record_hit().await;
                return Ok(entry.value);
            }
        }
        self.domains.record_miss().await;

        let fetched = self
            .node
            .domain_summary(id)
            .await
            .and_then(|raw| DomainRecord::from_wire(id, &raw));

        match fetched {
            Ok(record) => {
                self.domains.put(id, record.clone(), Timestamp::now()).await;
                Ok(record)
            }
            Err(error) => {
                if let Some(stale) = self.domains.get(&id).await {
                    warn!(
                        "⚠️  Serving stale domain summary {} after refresh failure: {}",
                        id, error
                    );
                    self.domains.record_stale_served().await;
                    return Ok(stale.value);
                }
                Err(
                    StakingError::chain_unavailable("domain".to_string(), id.to_string())
                        .with_source(error),
                )
            }
        }
    }

    /// Epoch currently in progress on a domain
    ///
    /// Advisory to callers: any failure (node unreachable with no cache,
    /// undecodable summary) collapses to `None` rather than an error.
    pub async fn current_epoch_index(&self, id: DomainId) -> Option<EpochIndex> {
        match self.read_domain_summary(id).await {
            Ok(record) => record.current_epoch_index,
            Err(error) => {
                debug!("Epoch index unavailable for domain {}: {}", id, error);
                None
            }
        }
    }

    /// Snapshot of cache accounting across all entity kinds
    pub async fn stats(&self) -> ReaderStats {
        ReaderStats {
            operators: self.operators.metrics().await,
            balances: self.balances.metrics().await,
            domains: self.domains.metrics().await,
        }
    }
}
