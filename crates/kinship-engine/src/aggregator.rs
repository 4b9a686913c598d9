//! Loan-level support aggregation.
//!
//! Answers "how much of this loan comes from the borrower's own network?" for
//! interactive display. Every computed record, including the `NONE` outcomes
//! for empty or unresolvable loans, is cached for the configured TTL.

use futures_util::future::join_all;
use kinship_core::{
    normalize_address, Address, Identity, KinshipError, LenderConnection, LoanSupportRecord,
    Result, RiskTier, SocialGraphClient, SupportStrength,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::{Clock, SystemClock, TtlCache};
use crate::config::EngineConfig;
use crate::proximity::ProximityCalculator;

/// Mutual follows at which a lender counts as part of the borrower's network
pub const DEFAULT_CONNECTION_THRESHOLD: u32 = 5;

/// Aggregates per-lender proximity into a [`LoanSupportRecord`]
#[derive(Clone)]
pub struct LoanSupportAggregator {
    graph: Arc<dyn SocialGraphClient>,
    proximity: ProximityCalculator,
    cache: TtlCache<LoanSupportRecord>,
    connection_threshold: u32,
}

impl LoanSupportAggregator {
    /// Aggregator over an existing cache
    #[must_use]
    pub fn new(graph: Arc<dyn SocialGraphClient>, cache: TtlCache<LoanSupportRecord>) -> Self {
        Self {
            proximity: ProximityCalculator::new(graph.clone()),
            graph,
            cache,
            connection_threshold: DEFAULT_CONNECTION_THRESHOLD,
        }
    }

    /// Aggregator built from configuration on the wall clock
    #[must_use]
    pub fn from_config(graph: Arc<dyn SocialGraphClient>, config: &EngineConfig) -> Self {
        Self::from_config_with_clock(graph, config, Arc::new(SystemClock))
    }

    /// Aggregator built from configuration on a caller-supplied clock
    #[must_use]
    pub fn from_config_with_clock(
        graph: Arc<dyn SocialGraphClient>,
        config: &EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = TtlCache::with_clock(
            config.support.cache_ttl(),
            config.support.cache_capacity,
            clock,
        );
        let mut aggregator = Self::new(graph, cache);
        aggregator.proximity = aggregator
            .proximity
            .with_follow_limit(config.proximity.follow_limit);
        aggregator.connection_threshold = config.support.connection_threshold;
        aggregator
    }

    /// Cache key: normalized borrower followed by the sorted lender set
    #[must_use]
    pub fn cache_key(borrower: &str, lenders: &[Address]) -> String {
        let mut sorted: Vec<Address> = lenders.iter().map(|l| normalize_address(l)).collect();
        sorted.sort_unstable();
        format!("{}:{}", normalize_address(borrower), sorted.join(","))
    }

    /// Support record for a loan, served from cache when fresh
    pub async fn get_support(&self, borrower: &str, lenders: &[Address]) -> LoanSupportRecord {
        let key = Self::cache_key(borrower, lenders);

        if let Some(record) = self.cache.get(&key).await {
            return record;
        }

        let record = self.compute_support(borrower, lenders).await;
        self.cache.insert(key, record.clone()).await;
        record
    }

    /// Drop the cached record for one loan, e.g. after a new contribution
    pub async fn invalidate(&self, borrower: &str, lenders: &[Address]) {
        self.cache.invalidate(&Self::cache_key(borrower, lenders)).await;
    }

    /// Social identity behind a wallet address.
    ///
    /// Fails with [`KinshipError::UnresolvableIdentity`] when the address has
    /// no profile or the lookup itself fails.
    pub async fn resolve_identity(&self, address: &str) -> Result<Identity> {
        let address = normalize_address(address);
        self.resolve(std::slice::from_ref(&address))
            .await
            .remove(&address)
            .ok_or(KinshipError::UnresolvableIdentity(address))
    }

    async fn compute_support(&self, borrower: &str, lenders: &[Address]) -> LoanSupportRecord {
        let total_lenders = u32::try_from(lenders.len()).unwrap_or(u32::MAX);

        if lenders.is_empty() {
            return LoanSupportRecord::none(0);
        }

        let borrower_identity = match self.resolve_identity(borrower).await {
            Ok(identity) => identity,
            Err(e) => {
                debug!(error = %e, "borrower not scoreable, reporting no support");
                return LoanSupportRecord::none(total_lenders);
            }
        };

        let lender_addresses: Vec<Address> = lenders.iter().map(|l| normalize_address(l)).collect();
        let identities = self.resolve(&lender_addresses).await;

        let connections = join_all(lender_addresses.iter().map(|address| {
            self.score_lender(&borrower_identity, address, identities.get(address))
        }))
        .await;

        let record = summarize(connections);
        debug!(
            borrower = %borrower_identity.label(),
            total = record.total_lenders,
            connected = record.lenders_with_connections,
            strength = %record.support_strength,
            "loan support computed"
        );
        record
    }

    async fn score_lender(
        &self,
        borrower: &Identity,
        address: &Address,
        identity: Option<&Identity>,
    ) -> LenderConnection {
        let Some(lender) = identity else {
            return LenderConnection {
                address: address.clone(),
                fid: None,
                username: None,
                mutual_follows: 0,
                risk_tier: RiskTier::High,
                is_connected: false,
            };
        };

        let score = self
            .proximity
            .compute(borrower.fid, lender.fid, borrower.quality, lender.quality)
            .await;
        debug!(
            borrower = %borrower.label(),
            lender = %lender.label(),
            mutual_follows = score.mutual_follows,
            "lender scored"
        );

        LenderConnection {
            address: address.clone(),
            fid: Some(lender.fid),
            username: lender.username.clone(),
            mutual_follows: score.mutual_follows,
            risk_tier: score.risk_tier,
            is_connected: score.mutual_follows >= self.connection_threshold,
        }
    }

    /// First identity per address; a failed lookup resolves nothing
    async fn resolve(&self, addresses: &[Address]) -> HashMap<Address, Identity> {
        match self.graph.fetch_bulk_users(addresses).await {
            Ok(users) => users
                .into_iter()
                .filter_map(|(address, identities)| {
                    identities
                        .into_iter()
                        .next()
                        .map(|identity| (normalize_address(&address), identity))
                })
                .collect(),
            Err(e) => {
                warn!(count = addresses.len(), error = %e, "identity lookup failed");
                HashMap::new()
            }
        }
    }
}

impl std::fmt::Debug for LoanSupportAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoanSupportAggregator")
            .field("cache", &self.cache)
            .field("connection_threshold", &self.connection_threshold)
            .finish_non_exhaustive()
    }
}

/// Fold per-lender results into a record
#[allow(clippy::cast_precision_loss)]
fn summarize(lenders: Vec<LenderConnection>) -> LoanSupportRecord {
    if lenders.is_empty() {
        return LoanSupportRecord::none(0);
    }

    let total = lenders.len();
    let connected = lenders.iter().filter(|l| l.is_connected).count();
    let mutual_sum: u64 = lenders.iter().map(|l| u64::from(l.mutual_follows)).sum();

    let percentage_from_network = connected as f64 / total as f64 * 100.0;

    LoanSupportRecord {
        total_lenders: u32::try_from(total).unwrap_or(u32::MAX),
        lenders_with_connections: u32::try_from(connected).unwrap_or(u32::MAX),
        average_mutual_connections: mutual_sum as f64 / total as f64,
        percentage_from_network,
        support_strength: SupportStrength::from_percentage(percentage_from_network),
        lenders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lender(address: &str, mutual_follows: u32) -> LenderConnection {
        LenderConnection {
            address: address.into(),
            fid: Some(1),
            username: None,
            mutual_follows,
            risk_tier: RiskTier::Medium,
            is_connected: mutual_follows >= DEFAULT_CONNECTION_THRESHOLD,
        }
    }

    #[test]
    fn cache_key_ignores_lender_order_and_case() {
        let a = LoanSupportAggregator::cache_key(
            "0xBorrower",
            &["0xB".to_string(), "0xa".to_string()],
        );
        let b = LoanSupportAggregator::cache_key(
            "0xborrower",
            &["0xA".to_string(), "0xb".to_string()],
        );
        assert_eq!(a, b);
        assert_eq!(a, "0xborrower:0xa,0xb");
    }

    #[test]
    fn seven_of_ten_connected_is_strong() {
        let lenders = (0..10)
            .map(|i| lender(&format!("0x{i}"), if i < 7 { 5 } else { 1 }))
            .collect();
        let record = summarize(lenders);
        assert_eq!(record.total_lenders, 10);
        assert_eq!(record.lenders_with_connections, 7);
        assert!((record.percentage_from_network - 70.0).abs() < 1e-9);
        assert_eq!(record.support_strength, SupportStrength::Strong);
        assert!((record.average_mutual_connections - 3.8).abs() < 1e-9);
    }

    #[test]
    fn no_connected_lenders_is_none() {
        let record = summarize(vec![lender("0x1", 4), lender("0x2", 0)]);
        assert_eq!(record.support_strength, SupportStrength::None);
        assert!((record.average_mutual_connections - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn one_in_four_is_weak() {
        let record = summarize(vec![
            lender("0x1", 9),
            lender("0x2", 0),
            lender("0x3", 0),
            lender("0x4", 0),
        ]);
        assert_eq!(record.support_strength, SupportStrength::Weak);
    }
}
