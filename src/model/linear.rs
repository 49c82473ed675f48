//! Bias-free linear model with compile-time state tracking.
//!
//! - [`LinearRegression`] = `LinearModel<B, Unfitted>`, used during training.
//! - `LinearModel<B, Fitted>`, inference-only and serializable.
//!
//! The model computes `y = X @ w`. There is no intercept term: the fitted
//! line always passes through the origin in normalized space.
pub use crate::backend::scalar::{Scalar, ScalarOps};
pub use crate::backend::tensor1d::Tensor1D;
pub use crate::backend::tensor2d::Tensor2D;
pub use crate::backend::Backend;
use crate::error::{RegressionError, Result};
pub use crate::model::{Fitted, InferenceModel, ParamOps, TrainableModel, Unfitted};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Trainable parameters of a linear model: one weight per feature.
#[derive(Clone)]
pub struct LinearParams<B: Backend> {
    pub weights: Tensor1D<B>,
}

/// Plain-data form of [`LinearParams`] for storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub weights: Vec<f64>,
}

impl<B: Backend> From<&LinearParams<B>> for SerializableLinearParams {
    fn from(params: &LinearParams<B>) -> Self {
        Self {
            weights: params.weights.to_vec(),
        }
    }
}

impl<B: Backend> TryFrom<SerializableLinearParams> for LinearParams<B> {
    type Error = RegressionError;

    fn try_from(value: SerializableLinearParams) -> Result<Self> {
        if value.weights.is_empty() {
            return Err(RegressionError::InvalidParameter(
                "linear model needs at least one weight".into(),
            ));
        }
        if value.weights.iter().any(|w| !w.is_finite()) {
            return Err(RegressionError::InvalidParameter(
                "linear model weights must be finite".into(),
            ));
        }
        Ok(Self {
            weights: Tensor1D::<B>::new(value.weights),
        })
    }
}

impl<B: Backend> ParamOps<B> for LinearParams<B> {
    fn add(&self, other: &Self) -> Self {
        Self {
            weights: self.weights.add(&other.weights),
        }
    }

    fn scale(&self, scalar: Scalar<B>) -> Self {
        Self {
            weights: self.weights.scale(&scalar),
        }
    }
}

/// A linear model with state encoded at the type level.
///
/// - `S = Unfitted`: implements [`TrainableModel`].
/// - `S = Fitted`: implements [`InferenceModel`].
#[derive(Clone)]
pub struct LinearModel<B: Backend, S> {
    params: LinearParams<B>,
    _state: PhantomData<S>,
}

impl<B: Backend, S> LinearModel<B, S> {
    /// Current weights copied to host memory.
    pub fn weights(&self) -> Vec<f64> {
        self.params.weights.to_vec()
    }

    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }
}

impl<B: Backend> LinearModel<B, Fitted> {
    pub fn new(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}

/// Inference for a trained model: `y = wᵀx`.
///
/// - Single sample: [`Tensor1D<B>`] → [`Scalar<B>`]
/// - Batch: [`Tensor2D<B>`] → [`Tensor1D<B>`]
impl<B: Backend> InferenceModel<B> for LinearModel<B, Fitted> {
    type InputSingle = Tensor1D<B>;
    type InputBatch = Tensor2D<B>;
    type OutputSingle = Scalar<B>;
    type OutputBatch = Tensor1D<B>;
    type ParamsRepr = SerializableLinearParams;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle {
        self.params.weights.dot(input)
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch {
        input.dot(&self.params.weights)
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self> {
        let internal_params = LinearParams::<B>::try_from(params)?;
        Ok(Self::new(internal_params))
    }
}

/// Training interface.
///
/// Forward pass: `X @ w`
/// Backward pass: `∇w = Xᵀ · grad`
impl<B: Backend> TrainableModel<B> for LinearModel<B, Unfitted> {
    type Params = LinearParams<B>;
    type Gradients = LinearParams<B>;
    type Prediction = Tensor1D<B>;
    type Input = Tensor2D<B>;
    type Output = LinearModel<B, Fitted>;

    fn forward(&self, x: &Self::Input) -> Self::Prediction {
        x.dot(&self.params.weights)
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, params: &Self::Params) {
        self.params = params.clone();
    }

    fn into_fitted(self) -> LinearModel<B, Fitted> {
        LinearModel::<B, Fitted>::new(self.params)
    }

    fn backward(&self, x: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients {
        LinearParams {
            weights: x.tdot(grad_output),
        }
    }
}

/// Alias for an **unfitted** linear regression model.
pub type LinearRegression<B> = LinearModel<B, Unfitted>;

impl<B: Backend> LinearRegression<B> {
    /// Creates a model with zero-initialized weights.
    pub fn new(n_features: usize) -> Self {
        Self {
            params: LinearParams {
                weights: Tensor1D::<B>::zeros(n_features),
            },
            _state: PhantomData,
        }
    }

    /// Constructs a model from explicit parameters (e.g. for a warm start).
    pub fn from_params(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}

/// CPU-backed linear regression.
///
/// ```rust
/// use house_price_regression::model::linear::LinearRegressor;
///
/// let model = LinearRegressor::new(1);
/// assert_eq!(model.weights(), vec![0.0]);
/// ```
#[cfg(feature = "cpu")]
pub type LinearRegressor = LinearRegression<crate::backend::CpuBackend>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn params(w: Vec<f64>) -> LinearParams<CpuBackend> {
        LinearParams {
            weights: Tensor1D::<CpuBackend>::new(w),
        }
    }

    #[test]
    fn test_param_ops() {
        let p1 = params(vec![1.0, 2.0]);
        let p2 = params(vec![0.5, -1.0]);

        assert_eq!(p1.add(&p2).weights.to_vec(), vec![1.5, 1.0]);
        assert_eq!(
            p1.scale(Scalar::<CpuBackend>::new(-0.5)).weights.to_vec(),
            vec![-0.5, -1.0]
        );
    }

    #[test]
    fn test_linear_regression_new_zero_initialized() {
        let model = LinearRegression::<CpuBackend>::new(1);
        assert_eq!(model.params().weights.to_vec(), vec![0.0]);
        assert_eq!(model.n_features(), 1);
    }

    #[test]
    fn test_forward_has_no_intercept() {
        let model = LinearRegression::<CpuBackend>::new(1);
        let x = Tensor2D::<CpuBackend>::new(vec![0.5, 1.0], 2, 1);
        assert_eq!(model.forward(&x).to_vec(), vec![0.0, 0.0]);

        let model = LinearRegression::<CpuBackend>::from_params(params(vec![3.0]));
        assert_eq!(model.forward(&x).to_vec(), vec![1.5, 3.0]);
    }

    #[test]
    fn test_backward_column() {
        let model = LinearRegression::<CpuBackend>::new(1);
        // X = [1, 2, 3]ᵀ, grad = [0.5, 0.25, -1]
        let x = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0], 3, 1);
        let grad_output = Tensor1D::<CpuBackend>::new(vec![0.5, 0.25, -1.0]);

        let grads = model.backward(&x, &grad_output);
        // 0.5 + 0.5 - 3.0
        assert!((grads.weights.to_vec()[0] - (-2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_update_params_and_into_fitted() {
        let mut model = LinearRegression::<CpuBackend>::new(1);
        model.update_params(&params(vec![2.5]));

        let fitted = model.into_fitted();
        assert_eq!(fitted.weights(), vec![2.5]);
        assert_eq!(
            fitted.predict(&Tensor1D::<CpuBackend>::new(vec![2.0])).to_f64(),
            5.0
        );
    }

    #[test]
    fn test_predict_batch() {
        let fitted = LinearModel::<CpuBackend, Fitted>::new(params(vec![0.8]));
        let batch = Tensor2D::<CpuBackend>::new(vec![0.0, 0.5, 1.0], 3, 1);
        assert_eq!(fitted.predict_batch(&batch).to_vec(), vec![0.0, 0.4, 0.8]);
    }

    #[test]
    fn test_from_params_rejects_bad_weights() {
        let empty = SerializableLinearParams { weights: vec![] };
        assert!(LinearModel::<CpuBackend, Fitted>::from_params(empty).is_err());

        let nan = SerializableLinearParams {
            weights: vec![f64::NAN],
        };
        assert!(LinearModel::<CpuBackend, Fitted>::from_params(nan).is_err());
    }

    #[test]
    fn test_linear_model_save_load() -> Result<()> {
        let model = LinearModel::<CpuBackend, Fitted>::new(params(vec![0.123456789]));

        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("model.bin");
        model.save_to_file(&path)?;

        let loaded = LinearModel::<CpuBackend, Fitted>::load_from_file(&path)?;
        assert_eq!(model.extract_params(), loaded.extract_params());
        Ok(())
    }
}
