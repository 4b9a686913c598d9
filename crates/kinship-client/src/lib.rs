//! HTTP client for Farcaster social-graph data.
//!
//! This crate provides [`NeynarClient`], a rate-limited client for the
//! Neynar v2 API that implements [`SocialGraphClient`] for the scoring engine.

mod client;
mod config;
pub mod api;

use async_trait::async_trait;
use kinship_core::{Address, Fid, Identity};
use std::collections::HashMap;

pub use client::{NeynarClient, NeynarClientBuilder};
pub use config::*;
pub use kinship_core::{KinshipError, Result, SocialGraphClient};

#[async_trait]
impl SocialGraphClient for NeynarClient {
    async fn fetch_followers(&self, fid: Fid, limit: usize) -> Result<Vec<Fid>> {
        self.follows().followers(fid, limit).await
    }

    async fn fetch_following(&self, fid: Fid, limit: usize) -> Result<Vec<Fid>> {
        self.follows().following(fid, limit).await
    }

    async fn fetch_bulk_users(
        &self,
        addresses: &[Address],
    ) -> Result<HashMap<Address, Vec<Identity>>> {
        self.users().bulk_by_address(addresses).await
    }
}
