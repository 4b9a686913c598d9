//! The social-graph provider seam.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::{Address, Fid, Identity, Result};

/// Source of followers, following and wallet-to-identity lookups.
///
/// Implementations talk to a remote, rate-limited API and may fail at any
/// call; the scoring engine treats every failure as "no data".
#[async_trait]
pub trait SocialGraphClient: Send + Sync {
    /// Up to `limit` identities following `fid`
    async fn fetch_followers(&self, fid: Fid, limit: usize) -> Result<Vec<Fid>>;

    /// Up to `limit` identities that `fid` follows
    async fn fetch_following(&self, fid: Fid, limit: usize) -> Result<Vec<Fid>>;

    /// Identities verified for each address, keyed by normalized address.
    ///
    /// Addresses without a profile are absent from the map.
    async fn fetch_bulk_users(&self, addresses: &[Address])
        -> Result<HashMap<Address, Vec<Identity>>>;
}

