use serde::{Deserialize, Serialize};

use super::{Address, Fid, RiskTier};

/// How well a loan's lenders are connected to its borrower
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SupportStrength {
    /// ≥ 60 % of lenders come from the borrower's network
    Strong,
    /// ≥ 30 %
    Moderate,
    /// Some
    Weak,
    /// None, or the loan could not be scored
    None,
}

impl SupportStrength {
    /// Classify a network percentage
    #[must_use]
    pub fn from_percentage(percentage_from_network: f64) -> Self {
        if percentage_from_network >= 60.0 {
            Self::Strong
        } else if percentage_from_network >= 30.0 {
            Self::Moderate
        } else if percentage_from_network > 0.0 {
            Self::Weak
        } else {
            Self::None
        }
    }
}

impl std::fmt::Display for SupportStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strong => write!(f, "STRONG"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::Weak => write!(f, "WEAK"),
            Self::None => write!(f, "NONE"),
        }
    }
}

/// Per-lender detail within a support record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderConnection {
    /// Lender wallet address (normalized)
    pub address: Address,
    /// Resolved graph key, if the lender has a social profile
    pub fid: Option<Fid>,
    /// Resolved handle
    pub username: Option<String>,
    /// Mutual follows with the borrower
    pub mutual_follows: u32,
    /// Pairwise risk tier
    pub risk_tier: RiskTier,
    /// Whether the lender counts as part of the borrower's network
    pub is_connected: bool,
}

/// Loan-level aggregate of lender proximity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSupportRecord {
    /// Number of lender addresses supplied
    pub total_lenders: u32,
    /// Lenders at or above the connection threshold
    pub lenders_with_connections: u32,
    /// Mean mutual follows across all lenders
    pub average_mutual_connections: f64,
    /// `lenders_with_connections / total_lenders × 100`
    pub percentage_from_network: f64,
    /// Classification
    pub support_strength: SupportStrength,
    /// Per-lender breakdown, empty when nothing was scored
    #[serde(default)]
    pub lenders: Vec<LenderConnection>,
}

impl LoanSupportRecord {
    /// Record for a loan that could not be scored or has no lenders
    #[must_use]
    pub const fn none(total_lenders: u32) -> Self {
        Self {
            total_lenders,
            lenders_with_connections: 0,
            average_mutual_connections: 0.0,
            percentage_from_network: 0.0,
            support_strength: SupportStrength::None,
            lenders: Vec::new(),
        }
    }
}
