//! One-line descriptions for display layers.

use kinship_core::{
    InteractionScore, LoanSupportRecord, ProximityScore, QualityTier, Relationship, RiskTier,
    SupportStrength,
};
use serde::Serialize;
use std::fmt;

/// Display severity, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Well connected
    Good,
    /// Some connection
    Fair,
    /// Thin connection
    Caution,
    /// No connection, or could not be scored
    Alert,
}

impl Severity {
    /// Indicator glyph
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Good => "🟢",
            Self::Fair => "🟡",
            Self::Caution => "🟠",
            Self::Alert => "🔴",
        }
    }
}

/// Description ready for a card or badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Indicator
    pub severity: Severity,
    /// One-line text
    pub text: String,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity.emoji(), self.text)
    }
}

fn plural(count: u32, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Describe a pairwise proximity score
#[must_use]
pub fn describe_proximity(score: &ProximityScore) -> Summary {
    let mutuals = plural(score.mutual_follows, "mutual connection");

    let (severity, mut text) = match score.risk_tier {
        RiskTier::Low => (Severity::Good, format!("Strong social connection ({mutuals})")),
        RiskTier::Medium => (Severity::Fair, format!("Some shared network ({mutuals})")),
        RiskTier::High if score.mutual_follows == 0 => {
            (Severity::Alert, String::from("No social connection found"))
        }
        RiskTier::High => (Severity::Alert, format!("Weak social connection ({mutuals})")),
    };

    if score.is_reciprocal() {
        text.push_str(", follow each other");
    }
    if score.mutual_follows > 0 && score.quality_tier == QualityTier::Low {
        text.push_str(", low-quality network");
    }

    Summary { severity, text }
}

/// Describe a loan support record
#[must_use]
pub fn describe_support(record: &LoanSupportRecord) -> Summary {
    let from_network = format!(
        "{} of {} lenders from the borrower's network",
        record.lenders_with_connections, record.total_lenders
    );

    let (severity, text) = match record.support_strength {
        SupportStrength::Strong => (
            Severity::Good,
            format!("Strong community support: {from_network}"),
        ),
        SupportStrength::Moderate => (
            Severity::Fair,
            format!("Moderate community support: {from_network}"),
        ),
        SupportStrength::Weak => (
            Severity::Caution,
            format!("Weak community support: {from_network}"),
        ),
        SupportStrength::None if record.total_lenders == 0 => {
            (Severity::Alert, String::from("No lenders yet"))
        }
        SupportStrength::None => (
            Severity::Alert,
            String::from("No lenders from the borrower's network"),
        ),
    };

    Summary { severity, text }
}

/// Describe a detailed interaction score
#[must_use]
pub fn describe_relationship(score: &InteractionScore) -> Summary {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let tie = score.strong_tie_score.round() as u32;

    match score.relationship {
        Relationship::Strong => Summary {
            severity: Severity::Good,
            text: format!("Strong tie (score {tie}/100)"),
        },
        Relationship::Medium => Summary {
            severity: Severity::Fair,
            text: format!("Regular interaction (score {tie}/100)"),
        },
        Relationship::Weak => Summary {
            severity: Severity::Caution,
            text: format!("Occasional interaction (score {tie}/100)"),
        },
        Relationship::None => Summary {
            severity: Severity::Alert,
            text: String::from("No interaction history"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proximity(mutual_follows: u32, risk_tier: RiskTier) -> ProximityScore {
        ProximityScore {
            mutual_follows,
            effective_mutuals: f64::from(mutual_follows) * 0.7,
            social_distance: 40,
            percent_overlap: 5.0,
            average_quality: 0.7,
            a_follows_b: false,
            b_follows_a: false,
            risk_tier,
            quality_tier: QualityTier::High,
        }
    }

    #[test]
    fn unscored_pair_is_alert() {
        let summary = describe_proximity(&ProximityScore::unscored());
        assert_eq!(summary.severity, Severity::Alert);
        assert_eq!(summary.text, "No social connection found");
        assert_eq!(summary.to_string(), "🔴 No social connection found");
    }

    #[test]
    fn proximity_text_by_tier() {
        let low = describe_proximity(&proximity(14, RiskTier::Low));
        assert_eq!(low.severity, Severity::Good);
        assert_eq!(low.text, "Strong social connection (14 mutual connections)");

        let medium = describe_proximity(&proximity(1, RiskTier::Medium));
        assert_eq!(medium.text, "Some shared network (1 mutual connection)");
    }

    #[test]
    fn reciprocal_follow_is_mentioned() {
        let mut score = proximity(4, RiskTier::Medium);
        score.a_follows_b = true;
        score.b_follows_a = true;
        assert!(describe_proximity(&score).text.ends_with("follow each other"));
    }

    #[test]
    fn support_text() {
        let mut record = LoanSupportRecord::none(10);
        record.lenders_with_connections = 7;
        record.support_strength = SupportStrength::Strong;
        let summary = describe_support(&record);
        assert_eq!(summary.severity, Severity::Good);
        assert_eq!(
            summary.text,
            "Strong community support: 7 of 10 lenders from the borrower's network"
        );

        assert_eq!(describe_support(&LoanSupportRecord::none(0)).text, "No lenders yet");
        assert_eq!(
            describe_support(&LoanSupportRecord::none(3)).severity,
            Severity::Alert
        );
    }

    #[test]
    fn relationship_text() {
        assert_eq!(
            describe_relationship(&InteractionScore::none()).text,
            "No interaction history"
        );
    }
}
