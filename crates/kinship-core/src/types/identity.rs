use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{KinshipError, Result};

/// Numeric identity key in the social graph
pub type Fid = u64;

/// Wallet address, compared case-insensitively
pub type Address = String;

/// Account quality in `[0, 1]`, as supplied by the graph provider's spam/bot scoring
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct QualityScore(f64);

impl QualityScore {
    /// Validate a raw quality value
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(KinshipError::InvalidArgument(format!(
                "quality score must be within [0, 1], got {value}"
            )))
        }
    }

    /// Raw value
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for QualityScore {
    type Error = KinshipError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<QualityScore> for f64 {
    fn from(score: QualityScore) -> Self {
        score.0
    }
}

/// A social-graph identity resolved for one computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Graph node key
    pub fid: Fid,

    /// Handle, if the provider returned one
    #[serde(default)]
    pub username: Option<String>,

    /// Verified wallet address this identity was resolved from
    #[serde(default)]
    pub address: Option<Address>,

    /// Account quality, when known
    #[serde(default)]
    pub quality: Option<QualityScore>,
}

impl Identity {
    /// Identity with only a graph key
    #[must_use]
    pub const fn new(fid: Fid) -> Self {
        Self {
            fid,
            username: None,
            address: None,
            quality: None,
        }
    }

    /// Attach a quality score
    #[must_use]
    pub const fn with_quality(mut self, quality: QualityScore) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Display label: `@username` when known, otherwise `fid:<n>`
    #[must_use]
    pub fn label(&self) -> String {
        self.username
            .as_ref()
            .map_or_else(|| format!("fid:{}", self.fid), |u| format!("@{u}"))
    }
}

/// Followers and following of one identity at fetch time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialGraphSnapshot {
    /// Identities following this one
    pub followers: HashSet<Fid>,
    /// Identities this one follows
    pub following: HashSet<Fid>,
}

impl SocialGraphSnapshot {
    /// Build a snapshot from fetched lists (duplicates collapse)
    pub fn new(
        followers: impl IntoIterator<Item = Fid>,
        following: impl IntoIterator<Item = Fid>,
    ) -> Self {
        Self {
            followers: followers.into_iter().collect(),
            following: following.into_iter().collect(),
        }
    }

    /// Combined network: followers ∪ following
    #[must_use]
    pub fn network(&self) -> HashSet<Fid> {
        self.followers.union(&self.following).copied().collect()
    }

    /// Whether this identity follows `other`
    #[must_use]
    pub fn follows(&self, other: Fid) -> bool {
        self.following.contains(&other)
    }
}

/// Normalize a wallet address for keying and lookup
#[must_use]
pub fn normalize_address(address: &str) -> Address {
    address.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_rejects_out_of_range() {
        assert!(QualityScore::new(0.0).is_ok());
        assert!(QualityScore::new(1.0).is_ok());
        assert!(QualityScore::new(1.01).is_err());
        assert!(QualityScore::new(-0.1).is_err());
        assert!(QualityScore::new(f64::NAN).is_err());
    }

    #[test]
    fn quality_deserialization_validates() {
        let ok: QualityScore = serde_json::from_str("0.85").unwrap();
        assert!((ok.get() - 0.85).abs() < f64::EPSILON);
        assert!(serde_json::from_str::<QualityScore>("3.0").is_err());
    }

    #[test]
    fn snapshot_network_is_union() {
        let snap = SocialGraphSnapshot::new([1, 2, 3], [3, 4]);
        let network = snap.network();
        assert_eq!(network.len(), 4);
        assert!(snap.follows(4));
        assert!(!snap.follows(1));
    }

    #[test]
    fn identity_label() {
        let mut id = Identity::new(42);
        assert_eq!(id.label(), "fid:42");
        id.username = Some("alice".into());
        assert_eq!(id.label(), "@alice");
    }

    #[test]
    fn address_normalization() {
        assert_eq!(normalize_address(" 0xAbC "), "0xabc");
    }
}
