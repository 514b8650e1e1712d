//! Downcasting configuration

use crate::error::{Result, TabularError};
use crate::table::BoundPolicy;
use serde::{Deserialize, Serialize};

/// Handling of NaN and infinite values in float columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NonFinitePolicy {
    /// Ignore NaN when computing the range; infinities force the `Float64` fallback
    #[default]
    Skip,
    /// Fail with `NonFiniteValue`
    Reject,
    /// Leave the column untouched
    Keep,
}

/// What to do when no candidate type holds a column's range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Use the widest type of the column's kind
    #[default]
    Widest,
    /// Fail with `RangeOverflow`
    Reject,
}

/// Configuration for numeric downcasting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DowncastConfig {
    /// Log memory usage before and after conversion
    pub verbose: bool,

    /// Process columns in parallel
    pub parallel: bool,

    /// Number of threads for parallel processing (None = rayon's global pool)
    pub n_jobs: Option<usize>,

    /// Treatment of values sitting exactly on a type bound
    pub bounds: BoundPolicy,

    /// Treatment of NaN and infinities
    pub non_finite: NonFinitePolicy,

    /// Behavior when no candidate type fits
    pub overflow: OverflowPolicy,

    /// Only narrow floats when every value round-trips exactly
    pub lossless_floats: bool,
}

impl Default for DowncastConfig {
    fn default() -> Self {
        Self {
            verbose: true,
            parallel: true,
            n_jobs: None,
            bounds: BoundPolicy::Exclusive,
            non_finite: NonFinitePolicy::Skip,
            overflow: OverflowPolicy::Widest,
            lossless_floats: false,
        }
    }
}

impl DowncastConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_jobs == Some(0) {
            return Err(TabularError::ConfigError(
                "n_jobs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builder method to set number of threads
    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = Some(n_jobs);
        self
    }

    pub fn with_bounds(mut self, bounds: BoundPolicy) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_non_finite(mut self, policy: NonFinitePolicy) -> Self {
        self.non_finite = policy;
        self
    }

    pub fn with_overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }

    pub fn with_lossless_floats(mut self, lossless: bool) -> Self {
        self.lossless_floats = lossless;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DowncastConfig::default();
        assert!(config.verbose);
        assert!(config.parallel);
        assert_eq!(config.bounds, BoundPolicy::Exclusive);
        assert_eq!(config.non_finite, NonFinitePolicy::Skip);
    }

    #[test]
    fn test_builder_pattern() {
        let config = DowncastConfig::new()
            .with_verbose(false)
            .with_n_jobs(2)
            .with_overflow(OverflowPolicy::Reject);
        assert!(!config.verbose);
        assert_eq!(config.n_jobs, Some(2));
        assert_eq!(config.overflow, OverflowPolicy::Reject);
    }

    #[test]
    fn test_from_json_partial() {
        let config = DowncastConfig::from_json(r#"{"bounds": "Inclusive", "verbose": false}"#).unwrap();
        assert_eq!(config.bounds, BoundPolicy::Inclusive);
        assert!(!config.verbose);
        assert!(config.parallel);
    }

    #[test]
    fn test_from_json_rejects_zero_threads() {
        let result = DowncastConfig::from_json(r#"{"n_jobs": 0}"#);
        assert!(matches!(result, Err(TabularError::ConfigError(_))));
    }

    #[test]
    fn test_from_json_malformed() {
        let result = DowncastConfig::from_json("{");
        assert!(matches!(result, Err(TabularError::SerializationError(_))));
    }
}
