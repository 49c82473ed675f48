//! Min-Max Scaler.
//!
//! Rescales one column to `[0, 1]` using the min and max observed at fit time:
//! ```text
//! x' = (x - min) / (max - min)
//! x  = x' * (max - min) + min
//! ```
//!
//! # Example
//! ```
//! use house_price_regression::backend::{CpuBackend, Tensor1D};
//! use house_price_regression::preprocessing::{FittedTransformer, MinMaxScaler, Transformer};
//!
//! let prices = Tensor1D::<CpuBackend>::new(vec![100_000.0, 300_000.0, 500_000.0]);
//! let fitted = MinMaxScaler::new("price").fit(&prices).unwrap();
//!
//! let scaled = fitted.transform(&prices).unwrap();
//! assert_eq!(scaled.to_vec(), vec![0.0, 0.5, 1.0]);
//! assert_eq!(fitted.denormalize_value(0.25), 200_000.0);
//! ```

use crate::backend::{Backend, Scalar, Tensor1D};
use crate::error::{RegressionError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// `(x - min) / (max - min)`
pub fn normalize(x: f64, min: f64, max: f64) -> f64 {
    (x - min) / (max - min)
}

/// `x' * (max - min) + min`
pub fn denormalize(x: f64, min: f64, max: f64) -> f64 {
    x * (max - min) + min
}

/// Observed bounds of one column. Serializable parameters of a fitted scaler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub min: f64,
    pub max: f64,
}

impl NormalizationStats {
    /// Checks `min < max` with both bounds finite.
    pub fn new(column: &str, min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(RegressionError::DegenerateRange {
                column: column.to_string(),
                min,
                max,
            });
        }
        Ok(Self { min, max })
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// MinMaxScaler transformer (unfitted).
#[derive(Clone)]
pub struct MinMaxScaler<B: Backend> {
    /// Column name reported in errors.
    column: String,
    _backend: PhantomData<B>,
}

impl<B: Backend> MinMaxScaler<B> {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            _backend: PhantomData,
        }
    }
}

impl<B: Backend> Transformer<B> for MinMaxScaler<B> {
    type Input = Tensor1D<B>;
    type Output = Tensor1D<B>;
    type Params = NormalizationStats;
    type Fitted = FittedMinMaxScaler<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        if data.is_empty() {
            return Err(RegressionError::EmptyDataset(format!(
                "cannot fit MinMaxScaler on empty column '{}'",
                self.column
            )));
        }

        let stats = NormalizationStats::new(
            &self.column,
            data.min().to_f64(),
            data.max().to_f64(),
        )?;

        Ok(FittedMinMaxScaler {
            stats,
            _backend: PhantomData,
        })
    }

    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Fitted MinMaxScaler ready for inference.
#[derive(Debug, Clone)]
pub struct FittedMinMaxScaler<B: Backend> {
    stats: NormalizationStats,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedMinMaxScaler<B> {
    pub fn stats(&self) -> NormalizationStats {
        self.stats
    }

    pub fn normalize_value(&self, x: f64) -> f64 {
        normalize(x, self.stats.min, self.stats.max)
    }

    pub fn denormalize_value(&self, x: f64) -> f64 {
        denormalize(x, self.stats.min, self.stats.max)
    }
}

impl<B: Backend> FittedTransformer<B> for FittedMinMaxScaler<B> {
    type Input = Tensor1D<B>;
    type Output = Tensor1D<B>;
    type Params = NormalizationStats;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let values = data.to_vec().into_iter().map(|x| self.normalize_value(x));
        Ok(Tensor1D::new(values.collect()))
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input> {
        let stretched = data.scale(&Scalar::new(self.stats.range()));
        Ok(stretched.add_scalar(&Scalar::new(self.stats.min)))
    }

    fn extract_params(&self) -> Self::Params {
        self.stats
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        // Re-validate, since params may come from disk.
        let stats = NormalizationStats::new("restored", params.min, params.max)?;
        Ok(Self {
            stats,
            _backend: PhantomData,
        })
    }
}
