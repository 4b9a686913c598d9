//! Social trust scoring for uncollateralized micro-loans.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use kinship::{EngineConfig, NeynarClient, ScoringEngine};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> kinship::Result<()> {
//!     let client = NeynarClient::new("your-api-key")?;
//!     let engine = ScoringEngine::new(Arc::new(client), &EngineConfig::default())?;
//!
//!     // Interactive: cached for 30 minutes per (borrower, lender set)
//!     let record = engine
//!         .support()
//!         .get_support("0xborrower", &["0xlender1".into(), "0xlender2".into()])
//!         .await;
//!     println!("{}", kinship::describe_support(&record));
//!
//!     // Pairwise proximity between two FIDs
//!     let score = engine.proximity().compute(3, 5650, None, None).await;
//!     println!("{}", kinship::describe_proximity(&score));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

// Re-export core types
pub use kinship_core::*;

// Re-export client
pub use kinship_client::{NeynarClient, NeynarClientBuilder, RateLimitConfig};

// Re-export engine
pub use kinship_engine::{
    aggregator, batch, cache, config, describe_proximity, describe_relationship,
    describe_support, interaction, proximity, summary, BatchOutcome, BatchScheduler, CacheEntry,
    Clock, DetailedOptions, EngineConfig, InteractionScorer, LoanSupportAggregator, ManualClock,
    ProximityCalculator, ScoringEngine, Severity, Summary, SystemClock, TtlCache,
};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
