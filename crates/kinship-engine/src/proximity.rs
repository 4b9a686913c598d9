//! Pairwise social proximity.
//!
//! Proximity is derived from the overlap of two identities' combined
//! follower/following networks, discounted by account quality. Thresholds
//! below are empirical break points; changing them shifts every risk tier.

use kinship_core::{
    Fid, ProximityScore, QualityScore, QualityTier, Result, RiskTier, SocialGraphClient,
    SocialGraphSnapshot,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Average quality assumed when either side's score is unknown
pub const DEFAULT_AVERAGE_QUALITY: f64 = 0.7;

/// Followers/following fetched per identity unless configured otherwise
pub const DEFAULT_FOLLOW_LIMIT: usize = 100;

/// Base score bands over effective mutuals, highest first
const DISTANCE_BANDS: [(f64, u32); 5] = [(18.0, 60), (9.0, 50), (4.5, 35), (2.5, 20), (0.8, 10)];

/// Overlap percentage above which the overlap bonus applies
const OVERLAP_BONUS_THRESHOLD: f64 = 10.0;

/// Upper bound for the overlap bonus
const OVERLAP_BONUS_CAP: f64 = 30.0;

const RECIPROCAL_FOLLOW_BONUS: u32 = 10;
const ONE_WAY_FOLLOW_BONUS: u32 = 5;
const MAX_SOCIAL_DISTANCE: u32 = 100;

/// Computes proximity scores against a social-graph provider
#[derive(Clone)]
pub struct ProximityCalculator {
    graph: Arc<dyn SocialGraphClient>,
    follow_limit: usize,
}

impl ProximityCalculator {
    /// Calculator with the default follow limit
    #[must_use]
    pub fn new(graph: Arc<dyn SocialGraphClient>) -> Self {
        Self {
            graph,
            follow_limit: DEFAULT_FOLLOW_LIMIT,
        }
    }

    /// Set how many followers/following are fetched per identity
    #[must_use]
    pub const fn with_follow_limit(mut self, limit: usize) -> Self {
        self.follow_limit = limit;
        self
    }

    /// Score a pair, collapsing any fetch failure into
    /// [`ProximityScore::unscored_with_quality`].
    ///
    /// An unscoreable pair is always reported as high risk, never as an error;
    /// the supplied quality scores are still reflected in its quality tier.
    pub async fn compute(
        &self,
        a: Fid,
        b: Fid,
        quality_a: Option<QualityScore>,
        quality_b: Option<QualityScore>,
    ) -> ProximityScore {
        match self.try_compute(a, b, quality_a, quality_b).await {
            Ok(score) => score,
            Err(e) => {
                warn!(a, b, error = %e, "proximity fetch failed, scoring pair as unconnected");
                ProximityScore::unscored_with_quality(average_quality(quality_a, quality_b))
            }
        }
    }

    /// Score a pair, surfacing fetch failures
    pub async fn try_compute(
        &self,
        a: Fid,
        b: Fid,
        quality_a: Option<QualityScore>,
        quality_b: Option<QualityScore>,
    ) -> Result<ProximityScore> {
        let (snapshot_a, snapshot_b) =
            fetch_pair(self.graph.as_ref(), a, b, self.follow_limit).await?;
        let score = score_proximity(a, &snapshot_a, b, &snapshot_b, quality_a, quality_b);
        debug!(
            a,
            b,
            mutual_follows = score.mutual_follows,
            social_distance = score.social_distance,
            risk = %score.risk_tier,
            "proximity computed"
        );
        Ok(score)
    }
}

impl std::fmt::Debug for ProximityCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProximityCalculator")
            .field("follow_limit", &self.follow_limit)
            .finish_non_exhaustive()
    }
}

/// Fetch both snapshots with all four list reads in flight at once
pub(crate) async fn fetch_pair(
    graph: &dyn SocialGraphClient,
    a: Fid,
    b: Fid,
    limit: usize,
) -> Result<(SocialGraphSnapshot, SocialGraphSnapshot)> {
    let (followers_a, following_a, followers_b, following_b) = tokio::try_join!(
        graph.fetch_followers(a, limit),
        graph.fetch_following(a, limit),
        graph.fetch_followers(b, limit),
        graph.fetch_following(b, limit),
    )?;

    Ok((
        SocialGraphSnapshot::new(followers_a, following_a),
        SocialGraphSnapshot::new(followers_b, following_b),
    ))
}

/// `|networkA ∩ networkB|`
#[must_use]
pub fn mutual_follow_count(a: &SocialGraphSnapshot, b: &SocialGraphSnapshot) -> u32 {
    let network_b = b.network();
    let count = a.network().intersection(&network_b).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Score two already-fetched snapshots
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score_proximity(
    a: Fid,
    snapshot_a: &SocialGraphSnapshot,
    b: Fid,
    snapshot_b: &SocialGraphSnapshot,
    quality_a: Option<QualityScore>,
    quality_b: Option<QualityScore>,
) -> ProximityScore {
    let network_a = snapshot_a.network();
    let network_b = snapshot_b.network();

    let mutual = network_a.intersection(&network_b).count();
    let union = network_a.union(&network_b).count();
    let mutual_follows = u32::try_from(mutual).unwrap_or(u32::MAX);

    let percent_overlap = if union == 0 {
        0.0
    } else {
        mutual as f64 / union as f64 * 100.0
    };

    let average_quality = average_quality(quality_a, quality_b);
    let effective_mutuals = f64::from(mutual_follows) * average_quality;

    let a_follows_b = snapshot_a.follows(b) || snapshot_b.followers.contains(&a);
    let b_follows_a = snapshot_b.follows(a) || snapshot_a.followers.contains(&b);

    let social_distance =
        social_distance(effective_mutuals, percent_overlap, a_follows_b, b_follows_a);

    ProximityScore {
        mutual_follows,
        effective_mutuals,
        social_distance,
        percent_overlap,
        average_quality,
        a_follows_b,
        b_follows_a,
        risk_tier: risk_tier(effective_mutuals, social_distance),
        quality_tier: QualityTier::from_average(average_quality),
    }
}

/// Mean of both scores, or [`DEFAULT_AVERAGE_QUALITY`] if either is missing
#[must_use]
pub fn average_quality(a: Option<QualityScore>, b: Option<QualityScore>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => (a.get() + b.get()) / 2.0,
        _ => DEFAULT_AVERAGE_QUALITY,
    }
}

/// Composite 0-100 score from effective mutuals, overlap and follow direction
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn social_distance(
    effective_mutuals: f64,
    percent_overlap: f64,
    a_follows_b: bool,
    b_follows_a: bool,
) -> u8 {
    let base = DISTANCE_BANDS
        .iter()
        .find(|(threshold, _)| effective_mutuals >= *threshold)
        .map_or(0, |(_, points)| *points);

    let overlap_bonus = if percent_overlap > OVERLAP_BONUS_THRESHOLD {
        (percent_overlap * 3.0).min(OVERLAP_BONUS_CAP).round() as u32
    } else {
        0
    };

    let follow_bonus = match (a_follows_b, b_follows_a) {
        (true, true) => RECIPROCAL_FOLLOW_BONUS,
        (true, false) | (false, true) => ONE_WAY_FOLLOW_BONUS,
        (false, false) => 0,
    };

    // Capped at 100, so always fits in a u8
    (base + overlap_bonus + follow_bonus).min(MAX_SOCIAL_DISTANCE) as u8
}

/// Either signal alone is enough to move a pair into the safer tier
#[must_use]
pub fn risk_tier(effective_mutuals: f64, social_distance: u8) -> RiskTier {
    if effective_mutuals >= 9.0 || social_distance >= 60 {
        RiskTier::Low
    } else if effective_mutuals >= 2.5 || social_distance >= 30 {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}
