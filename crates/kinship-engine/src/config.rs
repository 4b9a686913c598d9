//! Engine configuration.

use kinship_core::{KinshipError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the scoring engine, loadable from TOML.
///
/// Every section and field is optional in the file; missing values fall back
/// to the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pairwise proximity settings
    #[serde(default)]
    pub proximity: ProximityConfig,

    /// Loan support aggregation settings
    #[serde(default)]
    pub support: SupportConfig,

    /// Detailed interaction analysis settings
    #[serde(default)]
    pub interaction: InteractionConfig,

    /// Background batch settings
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Pairwise proximity settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProximityConfig {
    /// Followers/following fetched per identity (default: 100)
    #[serde(default = "default_follow_limit")]
    pub follow_limit: usize,
}

/// Loan support aggregation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportConfig {
    /// Lifetime of a computed support record (default: 30 minutes)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Maximum cached support records
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    /// Mutual follows at which a lender counts as connected (default: 5)
    #[serde(default = "default_connection_threshold")]
    pub connection_threshold: u32,
}

/// Detailed interaction analysis settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Casts inspected per identity
    #[serde(default = "default_cast_limit")]
    pub cast_limit: usize,

    /// Reactions inspected per cast
    #[serde(default = "default_reaction_limit")]
    pub reaction_limit: usize,
}

/// Background batch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Pairs scored concurrently per batch (default: 5)
    #[serde(default = "default_batch_size")]
    pub size: usize,

    /// Pause between batches in milliseconds (default: 1000)
    #[serde(default = "default_batch_delay")]
    pub delay_ms: u64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            follow_limit: default_follow_limit(),
        }
    }
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl(),
            cache_capacity: default_cache_capacity(),
            connection_threshold: default_connection_threshold(),
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            cast_limit: default_cast_limit(),
            reaction_limit: default_reaction_limit(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            size: default_batch_size(),
            delay_ms: default_batch_delay(),
        }
    }
}

impl SupportConfig {
    /// Record lifetime as a `Duration`
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl BatchConfig {
    /// Pause between batches as a `Duration`
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl EngineConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| KinshipError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.batch.size == 0 {
            return Err(KinshipError::Config("batch.size must be at least 1".into()));
        }
        if self.support.cache_ttl_secs == 0 {
            return Err(KinshipError::Config(
                "support.cache_ttl_secs must be at least 1".into(),
            ));
        }
        if self.proximity.follow_limit == 0 {
            return Err(KinshipError::Config(
                "proximity.follow_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// Default value functions for serde.
const fn default_follow_limit() -> usize {
    100
}

const fn default_cache_ttl() -> u64 {
    30 * 60
}

const fn default_cache_capacity() -> u64 {
    10_000
}

const fn default_connection_threshold() -> u32 {
    5
}

const fn default_cast_limit() -> usize {
    100
}

const fn default_reaction_limit() -> usize {
    100
}

const fn default_batch_size() -> usize {
    5
}

const fn default_batch_delay() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.proximity.follow_limit, 100);
        assert_eq!(config.support.cache_ttl(), Duration::from_secs(1800));
        assert_eq!(config.support.connection_threshold, 5);
        assert_eq!(config.batch.size, 5);
        assert_eq!(config.batch.delay(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml(
            r"
            [batch]
            size = 10

            [support]
            cache_ttl_secs = 60
            ",
        )
        .unwrap();
        assert_eq!(config.batch.size, 10);
        assert_eq!(config.batch.delay_ms, 1000);
        assert_eq!(config.support.cache_ttl_secs, 60);
        assert_eq!(config.support.cache_capacity, 10_000);
        assert_eq!(config.interaction.cast_limit, 100);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let err = EngineConfig::from_toml("[batch]\nsize = 0\n").unwrap_err();
        assert!(matches!(err, KinshipError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[proximity]\nfollow_limit = 250").unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.proximity.follow_limit, 250);
    }
}
