//! Rate-limited background scoring.
//!
//! Pairs are scored in fixed-size batches: concurrently within a batch, with a
//! fixed pause between batches so the graph provider's rate limits hold.

use futures_util::future::join_all;
use kinship_core::{InteractionScore, Result, ScoringPair};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::BatchConfig;
use crate::interaction::{DetailedOptions, InteractionScorer};

/// Pairs scored concurrently per batch
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Pause between consecutive batches
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_secs(1);

/// Result of one scheduler run
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// One score per loan id; failed pairs hold [`InteractionScore::none`]
    pub scores: HashMap<String, InteractionScore>,
    /// Batches executed
    pub batches: usize,
    /// Pairs whose fetch failed
    pub failures: usize,
}

/// Runs [`InteractionScorer`] over many pairs under a concurrency cap
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    scorer: InteractionScorer,
    batch_size: usize,
    delay: Duration,
    options: DetailedOptions,
}

impl BatchScheduler {
    /// Scheduler using the scorer's batch size, pause and detailed options
    /// (5 pairs, 1 s and 100/100 unless the scorer was configured)
    #[must_use]
    pub const fn from_scorer(scorer: InteractionScorer) -> Self {
        Self {
            batch_size: scorer.batch_size(),
            delay: scorer.batch_delay(),
            options: scorer.options(),
            scorer,
        }
    }

    /// Scheduler from configuration; a zero batch size is rejected
    pub fn new(scorer: InteractionScorer, config: &BatchConfig) -> Result<Self> {
        Ok(Self::from_scorer(scorer.with_batch(config)?))
    }

    /// Set cast/reaction limits for every pair
    #[must_use]
    pub const fn with_options(mut self, options: DetailedOptions) -> Self {
        self.options = options;
        self
    }

    /// Number of batches `pairs` will be split into
    #[must_use]
    pub const fn batch_count(&self, pairs: usize) -> usize {
        pairs.div_ceil(self.batch_size)
    }

    /// Score every pair, keyed by loan id.
    ///
    /// Each input pair produces exactly one entry; if two pairs share a loan
    /// id the later one wins.
    #[instrument(skip(self, pairs), fields(pairs = pairs.len(), batch_size = self.batch_size))]
    pub async fn run(&self, pairs: &[ScoringPair]) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            scores: HashMap::with_capacity(pairs.len()),
            ..BatchOutcome::default()
        };

        for (index, batch) in pairs.chunks(self.batch_size).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.delay).await;
            }

            debug!(batch = index + 1, size = batch.len(), "scoring batch");

            let results = join_all(batch.iter().map(|pair| async move {
                let result = self
                    .scorer
                    .try_compute_detailed(pair.borrower_id, pair.lender_id, self.options)
                    .await;
                (pair, result)
            }))
            .await;

            for (pair, result) in results {
                let score = result.unwrap_or_else(|e| {
                    warn!(
                        loan_id = %pair.loan_id,
                        borrower = pair.borrower_id,
                        lender = pair.lender_id,
                        error = %e,
                        "pair scoring failed, storing empty score"
                    );
                    outcome.failures += 1;
                    InteractionScore::none()
                });
                outcome.scores.insert(pair.loan_id.clone(), score);
            }

            outcome.batches += 1;
        }

        info!(
            scored = outcome.scores.len(),
            batches = outcome.batches,
            failures = outcome.failures,
            "batch run complete"
        );
        outcome
    }
}
