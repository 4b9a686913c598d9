//! In-memory social graph for engine tests.

#![allow(dead_code)]

use async_trait::async_trait;
use kinship_core::{
    normalize_address, Address, Fid, Identity, KinshipError, QualityScore, Result,
    SocialGraphClient,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

#[derive(Default)]
pub struct FakeGraph {
    followers: HashMap<Fid, Vec<Fid>>,
    following: HashMap<Fid, Vec<Fid>>,
    users: HashMap<Address, Identity>,
    failing: HashSet<Fid>,
    fail_bulk: bool,
    calls: AtomicUsize,
    follow_calls: Mutex<Vec<(Fid, Instant)>>,
}

impl FakeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn followers(mut self, fid: Fid, of: impl IntoIterator<Item = Fid>) -> Self {
        self.followers.entry(fid).or_default().extend(of);
        self
    }

    pub fn following(mut self, fid: Fid, of: impl IntoIterator<Item = Fid>) -> Self {
        self.following.entry(fid).or_default().extend(of);
        self
    }

    pub fn user(mut self, address: &str, fid: Fid, quality: Option<f64>) -> Self {
        let mut identity = Identity::new(fid);
        identity.address = Some(normalize_address(address));
        identity.quality = quality.map(|q| QualityScore::new(q).unwrap());
        self.users.insert(normalize_address(address), identity);
        self
    }

    pub fn failing(mut self, fid: Fid) -> Self {
        self.failing.insert(fid);
        self
    }

    pub fn failing_bulk(mut self) -> Self {
        self.fail_bulk = true;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Follower/following calls with the (paused) time they were issued
    pub fn follow_calls(&self) -> Vec<(Fid, Instant)> {
        self.follow_calls.lock().unwrap().clone()
    }

    fn list(&self, map: &HashMap<Fid, Vec<Fid>>, fid: Fid, limit: usize) -> Result<Vec<Fid>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.follow_calls.lock().unwrap().push((fid, Instant::now()));
        if self.failing.contains(&fid) {
            return Err(KinshipError::Connection(format!("fid {fid} unreachable")));
        }
        Ok(map
            .get(&fid)
            .map(|fids| fids.iter().copied().take(limit).collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl SocialGraphClient for FakeGraph {
    async fn fetch_followers(&self, fid: Fid, limit: usize) -> Result<Vec<Fid>> {
        self.list(&self.followers, fid, limit)
    }

    async fn fetch_following(&self, fid: Fid, limit: usize) -> Result<Vec<Fid>> {
        self.list(&self.following, fid, limit)
    }

    async fn fetch_bulk_users(
        &self,
        addresses: &[Address],
    ) -> Result<HashMap<Address, Vec<Identity>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_bulk {
            return Err(KinshipError::Timeout(30));
        }
        Ok(addresses
            .iter()
            .filter_map(|a| {
                let key = normalize_address(a);
                self.users.get(&key).map(|id| (key, vec![id.clone()]))
            })
            .collect())
    }
}
