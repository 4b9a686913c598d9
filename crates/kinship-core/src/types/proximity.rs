use serde::{Deserialize, Serialize};

/// Coarse lending-risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    /// Well connected
    Low,
    /// Some shared network
    Medium,
    /// Little or no relationship, or unscoreable
    High,
}

impl RiskTier {
    /// Safety ranking: `High` < `Medium` < `Low`
    #[must_use]
    pub const fn safety_rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Display-only bucket for average account quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualityTier {
    /// Average quality ≥ 0.7
    High,
    /// Average quality ≥ 0.4
    Medium,
    /// Anything lower
    Low,
}

impl QualityTier {
    /// Bucket an average quality value
    #[must_use]
    pub fn from_average(average_quality: f64) -> Self {
        if average_quality >= 0.7 {
            Self::High
        } else if average_quality >= 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Pairwise social proximity between two identities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityScore {
    /// Identities present in both parties' combined networks
    pub mutual_follows: u32,

    /// `mutual_follows` scaled by average quality
    pub effective_mutuals: f64,

    /// Composite trust score, 0-100
    pub social_distance: u8,

    /// Share of the combined network that is mutual, in percent
    pub percent_overlap: f64,

    /// Average of both quality scores, or the default when either is unknown
    pub average_quality: f64,

    /// Whether A follows B
    pub a_follows_b: bool,

    /// Whether B follows A
    pub b_follows_a: bool,

    /// Lending-risk bucket
    pub risk_tier: RiskTier,

    /// Display-only quality bucket
    pub quality_tier: QualityTier,
}

impl ProximityScore {
    /// The "no relationship" result used whenever a pair cannot be scored
    #[must_use]
    pub const fn unscored() -> Self {
        Self {
            mutual_follows: 0,
            effective_mutuals: 0.0,
            social_distance: 0,
            percent_overlap: 0.0,
            average_quality: 0.0,
            a_follows_b: false,
            b_follows_a: false,
            risk_tier: RiskTier::High,
            quality_tier: QualityTier::Low,
        }
    }

    /// Unscored result that still reports the pair's known average quality
    #[must_use]
    pub fn unscored_with_quality(average_quality: f64) -> Self {
        Self {
            average_quality,
            quality_tier: QualityTier::from_average(average_quality),
            ..Self::unscored()
        }
    }

    /// Whether the two identities follow each other
    #[must_use]
    pub const fn is_reciprocal(&self) -> bool {
        self.a_follows_b && self.b_follows_a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safety_ranking_orders_tiers() {
        assert!(RiskTier::High.safety_rank() < RiskTier::Medium.safety_rank());
        assert!(RiskTier::Medium.safety_rank() < RiskTier::Low.safety_rank());
    }

    #[test]
    fn quality_tier_thresholds() {
        assert_eq!(QualityTier::from_average(0.7), QualityTier::High);
        assert_eq!(QualityTier::from_average(0.69), QualityTier::Medium);
        assert_eq!(QualityTier::from_average(0.4), QualityTier::Medium);
        assert_eq!(QualityTier::from_average(0.39), QualityTier::Low);
    }

    #[test]
    fn unscored_is_high_risk() {
        let score = ProximityScore::unscored();
        assert_eq!(score.mutual_follows, 0);
        assert_eq!(score.social_distance, 0);
        assert_eq!(score.risk_tier, RiskTier::High);
    }

    #[test]
    fn unscored_keeps_supplied_quality() {
        let score = ProximityScore::unscored_with_quality(0.9);
        assert_eq!(score.risk_tier, RiskTier::High);
        assert_eq!(score.social_distance, 0);
        assert!((score.average_quality - 0.9).abs() < f64::EPSILON);
        assert_eq!(score.quality_tier, QualityTier::High);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(ProximityScore::unscored()).unwrap();
        assert_eq!(json["riskTier"], "HIGH");
        assert_eq!(json["mutualFollows"], 0);
    }
}
