use super::scalar::Scalar;
use super::tensor1d::Tensor1D;
use super::Backend;

/// Operations a loss function needs from its prediction and target types.
pub trait TensorLike<B: Backend> {
    fn sub(&self, other: &Self) -> Self;
    fn scale(&self, factor: &Scalar<B>) -> Self;
    fn mean_all(&self) -> Scalar<B>;
    fn len(&self) -> usize;
}

impl<B: Backend> TensorLike<B> for Tensor1D<B> {
    fn sub(&self, other: &Self) -> Self {
        Tensor1D::sub(self, other)
    }

    fn scale(&self, factor: &Scalar<B>) -> Self {
        Tensor1D::scale(self, factor)
    }

    fn mean_all(&self) -> Scalar<B> {
        self.mean()
    }

    fn len(&self) -> usize {
        Tensor1D::len(self)
    }
}
