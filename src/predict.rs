//! Price prediction from a living-area value.
//!
//! Raw square footage is normalized with the feature stats, passed through
//! the fitted model, denormalized with the label stats, and rounded to the
//! nearest thousand.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::error::{RegressionError, Result};
use crate::model::InferenceModel;
use crate::preprocessing::scaling::minmax::{denormalize, normalize, NormalizationStats};
use serde::{Deserialize, Serialize};

/// A single predicted price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub square_feet: f64,
    /// Denormalized model output before rounding.
    pub raw_price: f64,
    /// `raw_price` rounded to a multiple of 1000.
    pub price: f64,
}

/// Rounds to the nearest multiple of 1000. Ties round up.
///
/// ```
/// use house_price_regression::predict::round_to_thousand;
///
/// assert_eq!(round_to_thousand(532_481.0), 532_000.0);
/// assert_eq!(round_to_thousand(532_500.0), 533_000.0);
/// ```
pub fn round_to_thousand(x: f64) -> f64 {
    (x / 1000.0 + 0.5).floor() * 1000.0
}

/// Parses user text into a finite square footage.
pub fn parse_square_feet(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| RegressionError::InvalidInput(format!("'{}' is not a number", trimmed)))?;
    if !value.is_finite() {
        return Err(RegressionError::InvalidInput(format!(
            "'{}' is not a finite number",
            trimmed
        )));
    }
    Ok(value)
}

/// Fitted model paired with the stats it was trained under.
pub struct Predictor<'a, B: Backend, M> {
    model: &'a M,
    feature: NormalizationStats,
    label: NormalizationStats,
    _backend: std::marker::PhantomData<B>,
}

impl<'a, B, M> Predictor<'a, B, M>
where
    B: Backend,
    M: InferenceModel<B, InputBatch = Tensor2D<B>, OutputBatch = Tensor1D<B>>,
{
    pub fn new(model: &'a M, feature: NormalizationStats, label: NormalizationStats) -> Self {
        Self {
            model,
            feature,
            label,
            _backend: std::marker::PhantomData,
        }
    }

    /// Predicts prices for raw square footages.
    pub fn predict_values(&self, square_feet: &[f64]) -> Vec<Prediction> {
        let normalized: Vec<f64> = square_feet
            .iter()
            .map(|&x| normalize(x, self.feature.min, self.feature.max))
            .collect();
        let raw = self.forward(normalized);
        square_feet
            .iter()
            .zip(raw)
            .map(|(&square_feet, raw_price)| Prediction {
                square_feet,
                raw_price,
                price: round_to_thousand(raw_price),
            })
            .collect()
    }

    /// Predicts from text input such as `"2080"`.
    pub fn predict_str(&self, input: &str) -> Result<Prediction> {
        let square_feet = parse_square_feet(input)?;
        self.predict_values(&[square_feet])
            .pop()
            .ok_or_else(|| RegressionError::InvalidInput("empty prediction".into()))
    }

    /// `points` evenly spaced samples of the fitted line across the observed
    /// feature range, as `(square_feet, price)` pairs in raw units.
    pub fn line(&self, points: usize) -> Vec<(f64, f64)> {
        let xs = Tensor1D::<B>::linspace(0.0, 1.0, points).to_vec();
        let square_feet: Vec<f64> = xs
            .iter()
            .map(|&x| denormalize(x, self.feature.min, self.feature.max))
            .collect();
        square_feet.into_iter().zip(self.forward(xs)).collect()
    }

    fn forward(&self, normalized: Vec<f64>) -> Vec<f64> {
        let n = normalized.len();
        if n == 0 {
            return Vec::new();
        }
        let batch = Tensor2D::<B>::new(normalized, n, 1);
        self.model
            .predict_batch(&batch)
            .to_vec()
            .into_iter()
            .map(|y| denormalize(y, self.label.min, self.label.max))
            .collect()
    }
}
