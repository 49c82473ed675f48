pub use crate::backend::scalar::Scalar;
pub use crate::backend::tensor1d::Tensor1D;
pub use crate::backend::tensorlike::TensorLike;
pub use crate::backend::Backend;

/// A differentiable loss function used during training.
///
/// Implementors define the scalar loss value and its gradient with respect to
/// the model's predictions. The gradient is passed to the model's `backward()`.
pub trait Loss<B: Backend> {
    type Prediction: TensorLike<B>;
    type Target: TensorLike<B>;

    /// Computes the scalar loss value.
    fn loss(&self, prediction: &Self::Prediction, target: &Self::Target) -> Scalar<B>;

    /// Computes ∂L/∂pred.
    fn grad_wrt_prediction(
        &self,
        prediction: &Self::Prediction,
        target: &Self::Target,
    ) -> Self::Prediction;
}

/// Mean Squared Error loss: `L = (1/n) * Σ(pred_i - target_i)^2`
///
/// Gradient w.r.t. prediction: `∂L/∂pred = 2(pred - target) / n`
#[derive(Debug, Clone, Copy, Default)]
pub struct MSELoss;

impl<B: Backend> Loss<B> for MSELoss {
    type Prediction = Tensor1D<B>;
    type Target = Tensor1D<B>;

    fn loss(&self, pred: &Self::Prediction, target: &Self::Target) -> Scalar<B> {
        let diff = pred.sub(target);
        diff.dot(&diff) / Scalar::<B>::new(diff.len() as f64)
    }

    fn grad_wrt_prediction(&self, pred: &Self::Prediction, target: &Self::Target) -> Tensor1D<B> {
        let diff = pred.sub(target);
        let factor = Scalar::<B>::new(2.0 / pred.len() as f64);
        diff.scale(&factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_mse_loss() {
        let pred = Tensor1D::<CpuBackend>::new(vec![3.0, 5.0]);
        let target = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]);

        let mse = MSELoss;
        let loss_val = mse.loss(&pred, &target);
        // ((3-1)^2 + (5-2)^2) / 2 = (4 + 9) / 2 = 6.5
        assert!((loss_val.to_f64() - 6.5).abs() < 1e-12);

        let grad = mse.grad_wrt_prediction(&pred, &target);
        // 2 * [2, 3] / 2
        assert_eq!(grad.to_vec(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_mse_zero_on_perfect_fit() {
        let y = Tensor1D::<CpuBackend>::new(vec![0.1, 0.7, 0.3]);
        assert_eq!(MSELoss.loss(&y, &y).to_f64(), 0.0);
        assert_eq!(MSELoss.grad_wrt_prediction(&y, &y).to_vec(), vec![0.0; 3]);
    }

    #[test]
    fn test_mse_gradient_matches_finite_difference() {
        let pred = vec![0.2, 0.9, -0.4];
        let target = Tensor1D::<CpuBackend>::new(vec![0.5, 0.5, 0.0]);
        let grad = MSELoss
            .grad_wrt_prediction(&Tensor1D::<CpuBackend>::new(pred.clone()), &target)
            .to_vec();

        let h = 1e-6;
        for i in 0..pred.len() {
            let mut up = pred.clone();
            up[i] += h;
            let mut down = pred.clone();
            down[i] -= h;
            let numeric = (MSELoss.loss(&Tensor1D::new(up), &target).to_f64()
                - MSELoss.loss(&Tensor1D::new(down), &target).to_f64())
                / (2.0 * h);
            assert!((numeric - grad[i]).abs() < 1e-6);
        }
    }
}
