use crate::backend::scalar::Scalar;
use crate::backend::Backend;
use crate::model::linear::LinearParams;

/// Trait for gradient-based optimizers.
///
/// Training logic (`Trainer`) is decoupled from the parameter update rule, so
/// any model can be paired with any optimizer without dynamic dispatch.
///
/// # Example
/// ```rust
/// use house_price_regression::optimizer::{Optimizer, SGD};
/// use house_price_regression::backend::{CpuBackend, Tensor1D};
/// use house_price_regression::model::linear::LinearParams;
///
/// let params = LinearParams { weights: Tensor1D::<CpuBackend>::new(vec![1.0]) };
/// let grads = LinearParams { weights: Tensor1D::<CpuBackend>::new(vec![0.5]) };
///
/// let sgd = SGD::<CpuBackend>::new(0.1);
/// let updated = sgd.step(&params, &grads);
/// assert!((updated.weights.to_vec()[0] - 0.95).abs() < 1e-12);
/// ```
pub trait Optimizer<B: Backend, P> {
    /// Returns `params - learning_rate * gradients` as a new value.
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Stochastic Gradient Descent: `θ ← θ - η · ∇L(θ)`.
///
/// Stateless: no momentum or adaptive learning rate.
#[derive(Clone)]
pub struct SGD<B: Backend> {
    lr: Scalar<B>,
}

impl<B: Backend> SGD<B> {
    pub fn new(lr: f64) -> Self {
        Self {
            lr: Scalar::<B>::new(lr),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr.to_f64()
    }
}

impl<B: Backend> Optimizer<B, LinearParams<B>> for SGD<B> {
    fn step(&self, params: &LinearParams<B>, grads: &LinearParams<B>) -> LinearParams<B> {
        // Scale by -lr, then add: one pass over the weights.
        let neg_lr = Scalar::<B>::new(0.0) - self.lr;
        let scaled_grad = grads.weights.scale(&neg_lr);
        LinearParams {
            weights: params.weights.add(&scaled_grad),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, Tensor1D};

    fn params(w: Vec<f64>) -> LinearParams<CpuBackend> {
        LinearParams {
            weights: Tensor1D::<CpuBackend>::new(w),
        }
    }

    #[test]
    fn test_sgd_learning_rate_accessor() {
        assert_eq!(SGD::<CpuBackend>::new(0.1).learning_rate(), 0.1);
        assert_eq!(SGD::<CpuBackend>::new(0.001).learning_rate(), 0.001);
    }

    #[test]
    fn test_sgd_step_correctness() {
        let sgd = SGD::<CpuBackend>::new(0.1);
        let updated = sgd.step(&params(vec![2.0]), &params(vec![-1.0]));
        // 2.0 - 0.1 * (-1.0)
        assert!((updated.weights.to_vec()[0] - 2.1).abs() < 1e-12);
    }

    #[test]
    fn test_sgd_step_zero_gradients() {
        let sgd = SGD::<CpuBackend>::new(0.1);
        let updated = sgd.step(&params(vec![0.7]), &params(vec![0.0]));
        assert_eq!(updated.weights.to_vec(), vec![0.7]);
    }

    #[test]
    fn test_sgd_step_does_not_mutate_inputs() {
        let sgd = SGD::<CpuBackend>::new(0.5);
        let p = params(vec![1.0]);
        let g = params(vec![1.0]);
        let _ = sgd.step(&p, &g);
        assert_eq!(p.weights.to_vec(), vec![1.0]);
        assert_eq!(g.weights.to_vec(), vec![1.0]);
    }
}
