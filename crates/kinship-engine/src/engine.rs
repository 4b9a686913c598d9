//! All scoring components wired from one configuration.

use kinship_core::{Result, SocialGraphClient};
use std::sync::Arc;

use crate::aggregator::LoanSupportAggregator;
use crate::batch::BatchScheduler;
use crate::cache::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::interaction::{DetailedOptions, InteractionScorer};
use crate::proximity::ProximityCalculator;

/// Process-wide scoring components sharing one graph client and one cache.
///
/// Create once at startup and clone freely; clones share the support cache.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    proximity: ProximityCalculator,
    support: LoanSupportAggregator,
    interactions: InteractionScorer,
    scheduler: BatchScheduler,
}

impl ScoringEngine {
    /// Build every component on the wall clock
    pub fn new(graph: Arc<dyn SocialGraphClient>, config: &EngineConfig) -> Result<Self> {
        Self::with_clock(graph, config, Arc::new(SystemClock))
    }

    /// Build every component with a caller-supplied cache clock
    pub fn with_clock(
        graph: Arc<dyn SocialGraphClient>,
        config: &EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;

        let follow_limit = config.proximity.follow_limit;
        let interactions = InteractionScorer::new(graph.clone())
            .with_follow_limit(follow_limit)
            .with_options(DetailedOptions::from(&config.interaction))
            .with_batch(&config.batch)?;
        let scheduler = BatchScheduler::from_scorer(interactions.clone());

        Ok(Self {
            proximity: ProximityCalculator::new(graph.clone()).with_follow_limit(follow_limit),
            support: LoanSupportAggregator::from_config_with_clock(graph, config, clock),
            interactions,
            scheduler,
        })
    }

    /// Pairwise proximity (interactive)
    #[must_use]
    pub const fn proximity(&self) -> &ProximityCalculator {
        &self.proximity
    }

    /// Cached loan support (interactive)
    #[must_use]
    pub const fn support(&self) -> &LoanSupportAggregator {
        &self.support
    }

    /// Detailed and hybrid interaction scores (background or pre-selected pairs)
    #[must_use]
    pub const fn interactions(&self) -> &InteractionScorer {
        &self.interactions
    }

    /// Batch precomputation (background)
    #[must_use]
    pub const fn scheduler(&self) -> &BatchScheduler {
        &self.scheduler
    }
}
