//! User lookup endpoints.

use crate::NeynarClient;
use kinship_core::{normalize_address, Address, Fid, Identity, KinshipError, QualityScore, Result};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// User lookup endpoints
pub struct UsersApi<'a> {
    client: &'a NeynarClient,
}

#[derive(Debug, Deserialize)]
struct NeynarUser {
    fid: Fid,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    experimental: Option<Experimental>,
}

#[derive(Debug, Deserialize)]
struct Experimental {
    #[serde(default)]
    neynar_user_score: Option<f64>,
}

impl NeynarUser {
    fn into_identity(self, address: &str) -> Identity {
        let raw = self
            .score
            .or_else(|| self.experimental.and_then(|e| e.neynar_user_score));
        let quality = raw.and_then(|value| match QualityScore::new(value) {
            Ok(q) => Some(q),
            Err(_) => {
                debug!(fid = self.fid, value, "Ignoring out-of-range user score");
                None
            }
        });

        Identity {
            fid: self.fid,
            username: self.username,
            address: Some(address.to_string()),
            quality,
        }
    }
}

impl<'a> UsersApi<'a> {
    pub(crate) const fn new(client: &'a NeynarClient) -> Self {
        Self { client }
    }

    /// Profiles verified for each address, keyed by lowercase address.
    ///
    /// Addresses without a profile are absent from the result.
    pub async fn bulk_by_address(
        &self,
        addresses: &[Address],
    ) -> Result<HashMap<Address, Vec<Identity>>> {
        if addresses.is_empty() {
            return Ok(HashMap::new());
        }

        let joined = addresses
            .iter()
            .map(|a| normalize_address(a))
            .collect::<Vec<_>>()
            .join(",");

        let raw: HashMap<String, Vec<NeynarUser>> = match self
            .client
            .get_with_query(
                "/v2/farcaster/user/bulk-by-address",
                &[("addresses", joined.as_str())],
            )
            .await
        {
            Ok(raw) => raw,
            // The API answers 404 when none of the addresses has a profile
            Err(KinshipError::NotFound { .. }) => return Ok(HashMap::new()),
            Err(e) => return Err(e),
        };

        Ok(raw
            .into_iter()
            .filter(|(_, users)| !users.is_empty())
            .map(|(address, users)| {
                let address = normalize_address(&address);
                let identities = users
                    .into_iter()
                    .map(|u| u.into_identity(&address))
                    .collect();
                (address, identities)
            })
            .collect())
    }
}
