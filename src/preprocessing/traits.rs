//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: configured but unfitted; learns parameters from data.
//! - [`FittedTransformer`]: holds learned parameters; ready for inference and serialization.

use crate::backend::Backend;
use crate::error::{RegressionError, Result};
use crate::serialization::SerializableParams;

/// Trait for unfitted transformers.
///
/// # Type Parameters
/// - `B`: The backend used for computation.
/// - `Input` / `Output`: data types before and after transformation.
/// - `Params`: serializable representation of learned parameters.
/// - `Fitted`: the corresponding fitted transformer type.
pub trait Transformer<B: Backend>: Clone {
    type Input;
    type Output;
    type Params: SerializableParams;
    type Fitted: FittedTransformer<
        B,
        Params = Self::Params,
        Input = Self::Input,
        Output = Self::Output,
    >;

    /// Learns parameters from `data`.
    ///
    /// # Errors
    /// Returns [`RegressionError`] if the data is empty or its values make the
    /// transformation undefined.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted>;

    /// Fit the transformer and transform the data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output>;
}

/// Trait for fitted transformers ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
pub trait FittedTransformer<B: Backend>: Clone {
    type Input;
    type Output;
    type Params: SerializableParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output>;

    /// Reverse the transformation.
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input>;

    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let bytes = self
            .extract_params()
            .to_bytes()
            .map_err(|e| RegressionError::Serialization(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| RegressionError::Serialization(e.to_string()))?;
        Self::from_params(params)
    }
}
