//! Loss of a fitted model on held-out data.

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::dataset::Dataset;
use crate::error::{RegressionError, Result};
use crate::loss::Loss;
use crate::model::InferenceModel;

/// Batch size used when streaming a dataset through [`evaluate`].
pub const EVAL_BATCH_SIZE: usize = 256;

/// Mean loss of `model` over every sample in `dataset`.
///
/// Batches are weighted by their sample count, so the result equals the loss
/// over the whole set at once. The model is only borrowed.
///
/// # Errors
/// - the dataset length is unknown or zero
/// - a batch fails to load
pub fn evaluate<B, M, L, D>(model: &M, dataset: &D, loss_fn: &L) -> Result<f64>
where
    B: Backend,
    M: InferenceModel<B, InputBatch = Tensor2D<B>, OutputBatch = Tensor1D<B>>,
    L: Loss<B, Prediction = Tensor1D<B>, Target = Tensor1D<B>>,
    D: Dataset,
{
    let n_total = match dataset.len() {
        Some(0) => return Err(RegressionError::EmptyDataset("nothing to evaluate".into())),
        Some(n) => n,
        None => {
            return Err(RegressionError::InvalidParameter(
                "dataset length unknown".into(),
            ))
        }
    };

    let mut total = Scalar::<B>::new(0.0);
    for batch in dataset.batches::<B>(EVAL_BATCH_SIZE) {
        let (x, y) =
            batch.map_err(|e| RegressionError::Io(format!("failed to load batch: {:?}", e)))?;
        let weight = Scalar::<B>::new(y.len() as f64);
        total = total + loss_fn.loss(&model.predict_batch(&x), &y) * weight;
    }
    Ok((total / Scalar::<B>::new(n_total as f64)).to_f64())
}
