//! Social trust scoring engine.
//!
//! Converts social-graph relationships between a borrower and their lenders
//! into risk signals:
//!
//! - [`ProximityCalculator`] scores one pair from follower/following overlap
//! - [`LoanSupportAggregator`] rolls lender proximity up to a loan, with a TTL cache
//! - [`InteractionScorer`] computes the expensive weighted strong-tie score
//! - [`BatchScheduler`] precomputes interaction scores under rate limits
//!
//! Provider failures never reach callers: an unscoreable pair is reported as
//! `HIGH` risk, an unscoreable loan as `NONE` support.

pub mod aggregator;
pub mod batch;
pub mod cache;
pub mod config;
mod engine;
pub mod interaction;
pub mod proximity;
pub mod summary;

pub use aggregator::LoanSupportAggregator;
pub use batch::{BatchOutcome, BatchScheduler};
pub use cache::{CacheEntry, Clock, ManualClock, SystemClock, TtlCache};
pub use config::EngineConfig;
pub use engine::ScoringEngine;
pub use interaction::{DetailedOptions, InteractionScorer};
pub use proximity::ProximityCalculator;
pub use summary::{describe_proximity, describe_relationship, describe_support, Severity, Summary};
