//! Core types and traits for Kinship social trust scoring.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - **Types**: identities, graph snapshots, proximity/interaction scores and
//!   loan support records
//! - **Errors**: a single [`KinshipError`] with transport classification
//! - **Provider seam**: the [`SocialGraphClient`] trait implemented by graph
//!   API clients
//!
//! # Example
//!
//! ```rust,ignore
//! use kinship_core::{ProximityScore, RiskTier};
//!
//! fn gate(score: &ProximityScore) -> bool {
//!     score.risk_tier != RiskTier::High
//! }
//! ```

mod error;
mod graph;
pub mod types;

pub use error::{KinshipError, Result};
pub use graph::SocialGraphClient;
pub use types::*;
