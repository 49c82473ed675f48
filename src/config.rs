//! Hyperparameters and runtime settings for a regression session.

use crate::error::{RegressionError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "house-price-regression";

/// Session configuration.
///
/// Every field has a default, so a JSON file only needs the keys it overrides:
///
/// ```
/// use house_price_regression::config::RegressionConfig;
///
/// let cfg: RegressionConfig = serde_json::from_str(r#"{ "epochs": 5 }"#).unwrap();
/// assert_eq!(cfg.epochs, 5);
/// assert_eq!(cfg.batch_size, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionConfig {
    pub learning_rate: f64,
    pub batch_size: usize,
    pub epochs: usize,
    /// Fraction of the training half held out (from its tail) for validation.
    pub validation_split: f64,
    pub shuffle_each_epoch: bool,
    /// Seed for the split shuffle and per-epoch shuffles. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub storage_key: String,
    pub prediction_line_points: usize,
    /// Log every epoch at `info` instead of `debug`.
    pub verbose: bool,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            batch_size: 32,
            epochs: 20,
            validation_split: 0.2,
            shuffle_each_epoch: true,
            seed: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            prediction_line_points: 100,
            verbose: false,
        }
    }
}

impl RegressionConfig {
    /// Reads a JSON config file and validates it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg: RegressionConfig = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(RegressionError::InvalidParameter(format!(
                "learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        if self.batch_size == 0 {
            return Err(RegressionError::InvalidParameter(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.epochs == 0 {
            return Err(RegressionError::InvalidParameter(
                "epochs must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(RegressionError::InvalidParameter(format!(
                "validation_split must lie in [0, 1), got {}",
                self.validation_split
            )));
        }
        if self.storage_key.is_empty() {
            return Err(RegressionError::InvalidParameter(
                "storage_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_validation_split(mut self, split: f64) -> Self {
        self.validation_split = split;
        self
    }

    pub fn with_shuffle_each_epoch(mut self, shuffle: bool) -> Self {
        self.shuffle_each_epoch = shuffle;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_prediction_line_points(mut self, points: usize) -> Self {
        self.prediction_line_points = points;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let cfg = RegressionConfig::default();
        assert_eq!(cfg.learning_rate, 0.1);
        assert_eq!(cfg.batch_size, 32);
        assert_eq!(cfg.epochs, 20);
        assert_eq!(cfg.validation_split, 0.2);
        assert!(cfg.shuffle_each_epoch);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.storage_key, "house-price-regression");
        assert_eq!(cfg.prediction_line_points, 100);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = RegressionConfig::default();
        assert!(base.clone().with_learning_rate(0.0).validate().is_err());
        assert!(base.clone().with_learning_rate(f64::NAN).validate().is_err());
        assert!(base.clone().with_batch_size(0).validate().is_err());
        assert!(base.clone().with_epochs(0).validate().is_err());
        assert!(base.clone().with_validation_split(1.0).validate().is_err());
        assert!(base.clone().with_validation_split(-0.1).validate().is_err());
        assert!(base.clone().with_storage_key("").validate().is_err());
        assert!(base.with_validation_split(0.0).validate().is_ok());
    }

    #[test]
    fn test_setters_chain() {
        let cfg = RegressionConfig::default()
            .with_shuffle_each_epoch(false)
            .with_prediction_line_points(25)
            .with_storage_key("kc")
            .with_verbose(true);
        assert!(!cfg.shuffle_each_epoch);
        assert_eq!(cfg.prediction_line_points, 25);
        assert_eq!(cfg.storage_key, "kc");
        assert!(cfg.verbose);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_from_json_file_partial() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "learning_rate": 0.05, "seed": 42 }}"#).unwrap();

        let cfg = RegressionConfig::from_json_file(file.path()).unwrap();
        assert_eq!(cfg.learning_rate, 0.05);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.epochs, 20);
    }

    #[test]
    fn test_from_json_file_invalid_value() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "batch_size": 0 }}"#).unwrap();

        let err = RegressionConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, RegressionError::InvalidParameter(_)));
    }
}
