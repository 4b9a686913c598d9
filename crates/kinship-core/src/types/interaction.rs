use serde::{Deserialize, Serialize};

use super::RiskTier;

/// Interaction count split by direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectedCount {
    /// Interactions from A towards B
    pub a_to_b: u32,
    /// Interactions from B towards A
    pub b_to_a: u32,
}

impl DirectedCount {
    /// Both directions
    #[must_use]
    pub const fn new(a_to_b: u32, b_to_a: u32) -> Self {
        Self { a_to_b, b_to_a }
    }

    /// Sum of both directions
    #[must_use]
    pub const fn total(self) -> u32 {
        self.a_to_b + self.b_to_a
    }

    /// True when both directions are non-zero
    #[must_use]
    pub const fn is_reciprocal(self) -> bool {
        self.a_to_b > 0 && self.b_to_a > 0
    }
}

/// Raw interaction signals between two identities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionCounts {
    /// Shared network size
    pub mutual_follows: u32,
    /// Likes, per direction
    pub likes: DirectedCount,
    /// Recasts, per direction
    pub recasts: DirectedCount,
    /// Replies, per direction
    pub replies: DirectedCount,
}

/// Strong-tie classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Relationship {
    /// Frequent, reciprocal interaction
    Strong,
    /// Regular interaction
    Medium,
    /// Some signal
    Weak,
    /// Nothing observed
    None,
}

/// Weighted multi-signal trust score for one pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionScore {
    /// Raw counts the score was derived from
    pub counts: InteractionCounts,
    /// Unweighted sum of all counts
    pub raw_score: f64,
    /// Weighted sum of all counts
    pub weighted_score: f64,
    /// One weight unit per interaction type observed in both directions
    pub reciprocity_bonus: f64,
    /// `(weighted_score + reciprocity_bonus) × quality_factor`
    pub quality_adjusted: f64,
    /// Normalized 0-100
    pub strong_tie_score: f64,
    /// Classification
    pub relationship: Relationship,
}

impl InteractionScore {
    /// The "no relationship" result
    #[must_use]
    pub fn none() -> Self {
        Self {
            counts: InteractionCounts::default(),
            raw_score: 0.0,
            weighted_score: 0.0,
            reciprocity_bonus: 0.0,
            quality_adjusted: 0.0,
            strong_tie_score: 0.0,
            relationship: Relationship::None,
        }
    }
}

/// Cheap mutual-follow score, optionally blended with the detailed one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridScore {
    /// Shared network size
    pub mutual_follows: u32,
    /// `min(mutual_follows / 20 × 100, 100)`
    pub quick_score: f64,
    /// Risk derived from mutual follows alone
    pub quick_risk: RiskTier,
    /// Present only when detailed analysis was requested
    pub detailed_score: Option<InteractionScore>,
    /// Final blended score
    pub combined: f64,
}

/// One unit of background scoring work
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringPair {
    /// Borrower graph key
    pub borrower_id: super::Fid,
    /// Lender graph key
    pub lender_id: super::Fid,
    /// Loan the pair belongs to
    pub loan_id: String,
}

impl ScoringPair {
    /// Build a pair
    pub fn new(borrower_id: super::Fid, lender_id: super::Fid, loan_id: impl Into<String>) -> Self {
        Self {
            borrower_id,
            lender_id,
            loan_id: loan_id.into(),
        }
    }
}
