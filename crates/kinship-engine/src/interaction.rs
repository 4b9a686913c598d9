//! Weighted interaction scoring for high-value pairs.
//!
//! This is the expensive path: it must only run for pre-selected loans or from
//! the background [`BatchScheduler`](crate::BatchScheduler), never on an
//! interactive request.

use kinship_core::{
    DirectedCount, Fid, HybridScore, InteractionCounts, InteractionScore, KinshipError,
    Relationship, Result, RiskTier, ScoringPair, SocialGraphClient,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::batch::{BatchScheduler, DEFAULT_BATCH_DELAY, DEFAULT_BATCH_SIZE};
use crate::config::{BatchConfig, InteractionConfig};
use crate::proximity::{fetch_pair, mutual_follow_count, DEFAULT_FOLLOW_LIMIT};

/// Per-signal weights
pub const MUTUAL_FOLLOW_WEIGHT: f64 = 2.0;
pub const LIKE_WEIGHT: f64 = 1.0;
pub const RECAST_WEIGHT: f64 = 3.0;
pub const REPLY_WEIGHT: f64 = 4.0;

/// Quality multiplier used when per-user quality is unavailable
pub const DEFAULT_QUALITY_FACTOR: f64 = 1.0;

/// Quality-adjusted score that maps to a strong-tie score of 100
const STRONG_TIE_NORMALIZER: f64 = 50.0;

/// Mutual follows at which the quick score saturates
const QUICK_SCORE_SATURATION: f64 = 20.0;

const QUICK_WEIGHT: f64 = 0.3;
const DETAILED_WEIGHT: f64 = 0.7;

/// Limits for the detailed analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailedOptions {
    /// Casts inspected per identity
    pub cast_limit: usize,
    /// Reactions inspected per cast
    pub reaction_limit: usize,
}

impl DetailedOptions {
    /// 100 casts per identity, 100 reactions per cast
    pub const DEFAULT: Self = Self {
        cast_limit: 100,
        reaction_limit: 100,
    };
}

impl Default for DetailedOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<&InteractionConfig> for DetailedOptions {
    fn from(config: &InteractionConfig) -> Self {
        Self {
            cast_limit: config.cast_limit,
            reaction_limit: config.reaction_limit,
        }
    }
}

/// Apply weights, reciprocity bonus and quality factor to raw counts
#[must_use]
pub fn score_interactions(counts: InteractionCounts, quality_factor: f64) -> InteractionScore {
    let mutual = f64::from(counts.mutual_follows);
    let likes = f64::from(counts.likes.total());
    let recasts = f64::from(counts.recasts.total());
    let replies = f64::from(counts.replies.total());

    let raw_score = mutual + likes + recasts + replies;
    let weighted_score = mutual * MUTUAL_FOLLOW_WEIGHT
        + likes * LIKE_WEIGHT
        + recasts * RECAST_WEIGHT
        + replies * REPLY_WEIGHT;

    let reciprocity_bonus = [
        (counts.likes, LIKE_WEIGHT),
        (counts.recasts, RECAST_WEIGHT),
        (counts.replies, REPLY_WEIGHT),
    ]
    .iter()
    .filter(|(count, _)| count.is_reciprocal())
    .map(|(_, weight)| weight)
    .sum::<f64>();

    let quality_adjusted = (weighted_score + reciprocity_bonus) * quality_factor;
    let strong_tie_score = (quality_adjusted / STRONG_TIE_NORMALIZER * 100.0).min(100.0);

    InteractionScore {
        counts,
        raw_score,
        weighted_score,
        reciprocity_bonus,
        quality_adjusted,
        strong_tie_score,
        relationship: classify_relationship(strong_tie_score, counts.mutual_follows),
    }
}

/// Strong-tie classification; either the score or the mutual count can qualify a tier
#[must_use]
pub fn classify_relationship(strong_tie_score: f64, mutual_follows: u32) -> Relationship {
    if strong_tie_score >= 60.0 || mutual_follows >= 10 {
        Relationship::Strong
    } else if strong_tie_score >= 30.0 || mutual_follows >= 3 {
        Relationship::Medium
    } else if strong_tie_score > 0.0 || mutual_follows > 0 {
        Relationship::Weak
    } else {
        Relationship::None
    }
}

/// `min(mutual_follows / 20 × 100, 100)`
#[must_use]
pub fn quick_score(mutual_follows: u32) -> f64 {
    (f64::from(mutual_follows) / QUICK_SCORE_SATURATION * 100.0).min(100.0)
}

/// Risk from mutual follows alone
#[must_use]
pub const fn quick_risk(mutual_follows: u32) -> RiskTier {
    if mutual_follows >= 10 {
        RiskTier::Low
    } else if mutual_follows >= 3 {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

/// Computes interaction scores against a social-graph provider
#[derive(Clone)]
pub struct InteractionScorer {
    graph: Arc<dyn SocialGraphClient>,
    follow_limit: usize,
    quality_factor: f64,
    options: DetailedOptions,
    batch_size: usize,
    batch_delay: Duration,
}

impl InteractionScorer {
    /// Scorer with default limits and a neutral quality factor
    #[must_use]
    pub fn new(graph: Arc<dyn SocialGraphClient>) -> Self {
        Self {
            graph,
            follow_limit: DEFAULT_FOLLOW_LIMIT,
            quality_factor: DEFAULT_QUALITY_FACTOR,
            options: DetailedOptions::DEFAULT,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }

    /// Set how many followers/following are fetched per identity
    #[must_use]
    pub const fn with_follow_limit(mut self, limit: usize) -> Self {
        self.follow_limit = limit;
        self
    }

    /// Set the quality multiplier applied to every detailed score
    #[must_use]
    pub const fn with_quality_factor(mut self, factor: f64) -> Self {
        self.quality_factor = factor;
        self
    }

    /// Set the cast/reaction limits used by hybrid and batch scoring
    #[must_use]
    pub const fn with_options(mut self, options: DetailedOptions) -> Self {
        self.options = options;
        self
    }

    /// Set batch size and pause for [`batch_compute`](Self::batch_compute);
    /// a zero batch size is rejected
    pub fn with_batch(mut self, config: &BatchConfig) -> Result<Self> {
        if config.size == 0 {
            return Err(KinshipError::InvalidArgument(
                "batch size must be at least 1".into(),
            ));
        }
        self.batch_size = config.size;
        self.batch_delay = config.delay();
        Ok(self)
    }

    /// Cast/reaction limits applied when no explicit options are given
    #[must_use]
    pub const fn options(&self) -> DetailedOptions {
        self.options
    }

    /// Pairs scored concurrently per batch
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Pause between consecutive batches
    #[must_use]
    pub const fn batch_delay(&self) -> Duration {
        self.batch_delay
    }

    /// Mutual follows between two identities
    pub async fn mutual_follows(&self, a: Fid, b: Fid) -> Result<u32> {
        let (snapshot_a, snapshot_b) =
            fetch_pair(self.graph.as_ref(), a, b, self.follow_limit).await?;
        Ok(mutual_follow_count(&snapshot_a, &snapshot_b))
    }

    /// Detailed score, surfacing fetch failures
    pub async fn try_compute_detailed(
        &self,
        a: Fid,
        b: Fid,
        options: DetailedOptions,
    ) -> Result<InteractionScore> {
        let mutual_follows = self.mutual_follows(a, b).await?;
        Ok(self.detailed_from_mutuals(a, b, mutual_follows, options))
    }

    /// Detailed score; a failed fetch yields the "no relationship" score
    pub async fn compute_detailed(
        &self,
        a: Fid,
        b: Fid,
        options: DetailedOptions,
    ) -> InteractionScore {
        match self.try_compute_detailed(a, b, options).await {
            Ok(score) => score,
            Err(e) => {
                warn!(a, b, error = %e, "interaction fetch failed, scoring pair as unconnected");
                InteractionScore::none()
            }
        }
    }

    /// Cheap mutual-follow score, blended with the detailed score when requested
    pub async fn compute_hybrid(&self, a: Fid, b: Fid, use_detailed: bool) -> HybridScore {
        let mutual_follows = match self.mutual_follows(a, b).await {
            Ok(count) => count,
            Err(e) => {
                warn!(a, b, error = %e, "mutual follow fetch failed");
                0
            }
        };

        let detailed_score =
            use_detailed.then(|| self.detailed_from_mutuals(a, b, mutual_follows, self.options));

        hybrid_from_parts(mutual_follows, detailed_score)
    }

    /// Score every pair in rate-limited batches using this scorer's batch
    /// settings (5 at a time, 1 s apart unless configured)
    pub async fn batch_compute(&self, pairs: &[ScoringPair]) -> HashMap<String, InteractionScore> {
        BatchScheduler::from_scorer(self.clone())
            .run(pairs)
            .await
            .scores
    }

    /// Build the detailed score once mutual follows are known.
    ///
    /// Cast and reaction analysis is not wired to a data source yet, so
    /// like/recast/reply counts are zero and only the mutual-follow signal
    /// contributes.
    fn detailed_from_mutuals(
        &self,
        a: Fid,
        b: Fid,
        mutual_follows: u32,
        options: DetailedOptions,
    ) -> InteractionScore {
        warn!(
            a,
            b,
            cast_limit = options.cast_limit,
            reaction_limit = options.reaction_limit,
            "cast/reaction analysis unavailable, scoring on mutual follows only"
        );

        let counts = InteractionCounts {
            mutual_follows,
            likes: DirectedCount::default(),
            recasts: DirectedCount::default(),
            replies: DirectedCount::default(),
        };
        let score = score_interactions(counts, self.quality_factor);
        debug!(
            a,
            b,
            strong_tie = score.strong_tie_score,
            relationship = ?score.relationship,
            "interaction scored"
        );
        score
    }
}

impl std::fmt::Debug for InteractionScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionScorer")
            .field("follow_limit", &self.follow_limit)
            .field("quality_factor", &self.quality_factor)
            .field("options", &self.options)
            .field("batch_size", &self.batch_size)
            .field("batch_delay", &self.batch_delay)
            .finish_non_exhaustive()
    }
}

/// Combine the quick score with an optional detailed score
#[must_use]
pub fn hybrid_from_parts(
    mutual_follows: u32,
    detailed_score: Option<InteractionScore>,
) -> HybridScore {
    let quick = quick_score(mutual_follows);
    let combined = detailed_score.as_ref().map_or(quick, |detailed| {
        quick * QUICK_WEIGHT + detailed.strong_tie_score * DETAILED_WEIGHT
    });

    HybridScore {
        mutual_follows,
        quick_score: quick,
        quick_risk: quick_risk(mutual_follows),
        detailed_score,
        combined,
    }
}
