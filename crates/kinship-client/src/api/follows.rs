//! Follower and following endpoints.

use crate::NeynarClient;
use kinship_core::{Fid, Result};
use serde::Deserialize;

/// Largest page the API serves for follow lists
const MAX_PAGE_SIZE: usize = 100;

/// Follower/following endpoints
pub struct FollowsApi<'a> {
    client: &'a NeynarClient,
}

#[derive(Debug, Deserialize)]
struct FollowPage {
    #[serde(default)]
    users: Vec<FollowEntry>,
    #[serde(default)]
    next: Option<NextCursor>,
}

#[derive(Debug, Deserialize)]
struct FollowEntry {
    user: UserRef,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    fid: Fid,
}

#[derive(Debug, Deserialize)]
struct NextCursor {
    #[serde(default)]
    cursor: Option<String>,
}

impl<'a> FollowsApi<'a> {
    pub(crate) const fn new(client: &'a NeynarClient) -> Self {
        Self { client }
    }

    /// Up to `limit` FIDs following `fid`
    pub async fn followers(&self, fid: Fid, limit: usize) -> Result<Vec<Fid>> {
        self.paged("/v2/farcaster/followers", fid, limit).await
    }

    /// Up to `limit` FIDs that `fid` follows
    pub async fn following(&self, fid: Fid, limit: usize) -> Result<Vec<Fid>> {
        self.paged("/v2/farcaster/following", fid, limit).await
    }

    /// Walk cursor pages until `limit` FIDs are collected or the list ends
    async fn paged(&self, path: &str, fid: Fid, limit: usize) -> Result<Vec<Fid>> {
        let fid_param = fid.to_string();
        let mut fids = Vec::with_capacity(limit.min(MAX_PAGE_SIZE));
        let mut cursor: Option<String> = None;

        while fids.len() < limit {
            let page_size = (limit - fids.len()).min(MAX_PAGE_SIZE).to_string();
            let mut params = vec![("fid", fid_param.as_str()), ("limit", page_size.as_str())];
            if let Some(c) = cursor.as_deref() {
                params.push(("cursor", c));
            }

            let page: FollowPage = self.client.get_with_query(path, &params).await?;
            let received = page.users.len();
            fids.extend(page.users.into_iter().map(|entry| entry.user.fid));

            cursor = page.next.and_then(|n| n.cursor);
            if cursor.is_none() || received == 0 {
                break;
            }
        }

        fids.truncate(limit);
        Ok(fids)
    }
}
