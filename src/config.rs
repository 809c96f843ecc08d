//! Processor configuration.
//!
//! Thresholds and policies for the ingestion pipeline, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProcessorError, Result};

/// How aggressively a higher-confidence value may replace an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverridePolicy {
    /// New value must beat the old confidence by `override_delta`.
    Conservative,
    /// New value only needs to match the old confidence.
    Permissive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Minimum assignment score for a column-to-field mapping to be kept.
    pub header_confidence_threshold: f64,
    /// Minimum fraction of core target fields that must be mapped.
    pub schema_score_threshold: f64,
    /// Minimum fraction of substantive rows that must pass validation.
    pub min_valid_rows: f64,
    pub override_policy: OverridePolicy,
    pub override_delta: f64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            header_confidence_threshold: 0.75,
            schema_score_threshold: 0.7,
            min_valid_rows: 0.6,
            override_policy: OverridePolicy::Conservative,
            override_delta: 0.1,
        }
    }
}

impl ProcessorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Thresholds are fractions and the delta is a confidence margin; values
    /// outside their ranges would silently disable a gate.
    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("header_confidence_threshold", self.header_confidence_threshold),
            ("schema_score_threshold", self.schema_score_threshold),
            ("min_valid_rows", self.min_valid_rows),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProcessorError::Config(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        if self.override_delta < 0.0 {
            return Err(ProcessorError::Config(format!(
                "override_delta must be non-negative, got {}",
                self.override_delta
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = ProcessorConfig::default();
        assert_eq!(config.header_confidence_threshold, 0.75);
        assert_eq!(config.schema_score_threshold, 0.7);
        assert_eq!(config.min_valid_rows, 0.6);
        assert_eq!(config.override_policy, OverridePolicy::Conservative);
        assert_eq!(config.override_delta, 0.1);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = ProcessorConfig::from_toml_str(
            "header_confidence_threshold = 0.8\noverride_policy = \"permissive\"\n",
        )
        .unwrap();
        assert_eq!(config.header_confidence_threshold, 0.8);
        assert_eq!(config.override_policy, OverridePolicy::Permissive);
        assert_eq!(config.min_valid_rows, 0.6);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(ProcessorConfig::from_toml_str("header_confidence_threshold = ").is_err());
    }

    #[test]
    fn test_out_of_range_threshold_is_a_config_error() {
        let result = ProcessorConfig::from_toml_str("min_valid_rows = 1.5\n");
        assert!(matches!(result, Err(ProcessorError::Config(_))));

        let result = ProcessorConfig::from_toml_str("override_delta = -0.1\n");
        assert!(matches!(result, Err(ProcessorError::Config(_))));
    }
}
