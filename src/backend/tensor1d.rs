use super::scalar::Scalar;
use crate::backend::Backend;
use std::marker::PhantomData;

/// Backend-typed 1D tensor.
///
/// Wraps a backend's native 1D storage (`B::Tensor1D`) and carries the
/// backend as a phantom type, so tensors from different backends cannot be
/// combined.
///
/// # Example
/// ```
/// use house_price_regression::backend::{CpuBackend, Scalar, Tensor1D};
///
/// let x: Tensor1D<CpuBackend> = Tensor1D::new(vec![1.0, 2.0, 3.0]);
/// assert_eq!(x.len(), 3);
///
/// let y = x.scale(&Scalar::<CpuBackend>::new(2.0));
/// assert_eq!(y.to_vec(), vec![2.0, 4.0, 6.0]);
/// ```
#[derive(Clone)]
pub struct Tensor1D<B: Backend> {
    pub(crate) data: B::Tensor1D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor1D<B> {
    /// Creates a new 1D tensor from host values.
    pub fn new(data: Vec<f64>) -> Self {
        Self {
            data: B::from_vec_1d(data),
            backend: PhantomData,
        }
    }

    /// Creates a 1D tensor filled with zeros of specified length.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: B::zeros_1d(len),
            backend: PhantomData,
        }
    }

    /// Creates `n` evenly spaced values over `[start, stop]`, both ends included.
    ///
    /// ```
    /// use house_price_regression::backend::{CpuBackend, Tensor1D};
    ///
    /// let t = Tensor1D::<CpuBackend>::linspace(0.0, 1.0, 5);
    /// assert_eq!(t.to_vec(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    /// ```
    pub fn linspace(start: f64, stop: f64, n: usize) -> Self {
        let values = match n {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (n - 1) as f64;
                (0..n).map(|i| start + step * i as f64).collect()
            }
        };
        Self::new(values)
    }

    /// Element-wise `self + other`.
    pub fn add(&self, other: &Self) -> Self {
        Self {
            data: B::add_1d(&self.data, &other.data),
            backend: PhantomData,
        }
    }

    /// Element-wise `self - other`.
    ///
    /// # Panics
    /// If tensors have different lengths.
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            data: B::sub_1d(&self.data, &other.data),
            backend: PhantomData,
        }
    }

    /// Element-wise `self * other`.
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            data: B::mul_1d(&self.data, &other.data),
            backend: PhantomData,
        }
    }

    /// Multiplies every element by `a`.
    pub fn scale(&self, a: &Scalar<B>) -> Self {
        Self {
            data: B::mul_scalar_1d(&self.data, &a.data),
            backend: PhantomData,
        }
    }

    /// Adds `a` to every element.
    pub fn add_scalar(&self, a: &Scalar<B>) -> Self {
        Self {
            data: B::add_scalar_1d(&self.data, &a.data),
            backend: PhantomData,
        }
    }

    /// Sum of all elements.
    pub fn sum(&self) -> Scalar<B> {
        Scalar {
            data: B::sum_all_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Arithmetic mean of all elements.
    pub fn mean(&self) -> Scalar<B> {
        Scalar {
            data: B::mean_all_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Smallest element (`+inf` when empty).
    pub fn min(&self) -> Scalar<B> {
        Scalar {
            data: B::min_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Largest element (`-inf` when empty).
    pub fn max(&self) -> Scalar<B> {
        Scalar {
            data: B::max_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Dot product `Σᵢ aᵢ * bᵢ`.
    ///
    /// ```
    /// use house_price_regression::backend::{CpuBackend, Tensor1D};
    ///
    /// let a = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0]);
    /// let b = Tensor1D::<CpuBackend>::new(vec![4.0, 5.0, 6.0]);
    /// assert_eq!(a.dot(&b).to_f64(), 32.0);
    /// ```
    pub fn dot(&self, other: &Self) -> Scalar<B> {
        let prod = B::mul_1d(&self.data, &other.data);
        Scalar {
            data: B::sum_all_1d(&prod),
            backend: PhantomData,
        }
    }

    /// Copies the tensor out to host memory.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_1d(&self.data)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        B::len_1d(&self.data)
    }

    /// Returns `true` if the tensor contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_tensor1d_elementwise_ops() {
        let a = Tensor1D::<CpuBackend>::new(vec![5.0, 7.0, 9.0]);
        let b = Tensor1D::<CpuBackend>::new(vec![2.0, 3.0, 4.0]);

        assert_eq!(a.sub(&b).to_vec(), vec![3.0, 4.0, 5.0]);
        assert_eq!(a.add(&b).to_vec(), vec![7.0, 10.0, 13.0]);
        assert_eq!(a.mul(&b).to_vec(), vec![10.0, 21.0, 36.0]);
        assert_eq!(
            a.add_scalar(&Scalar::new(1.0)).to_vec(),
            vec![6.0, 8.0, 10.0]
        );
    }

    #[test]
    fn test_tensor1d_reductions() {
        let t = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0]);
        assert!((t.mean().to_f64() - 2.5).abs() < 1e-12);
        assert_eq!(t.sum().to_f64(), 10.0);
        assert_eq!(t.min().to_f64(), 1.0);
        assert_eq!(t.max().to_f64(), 4.0);
    }

    #[test]
    fn test_tensor1d_empty() {
        let empty = Tensor1D::<CpuBackend>::zeros(0);
        assert!(empty.is_empty());
        assert_eq!(empty.sum().to_f64(), 0.0);
        assert!(!Tensor1D::<CpuBackend>::zeros(1).is_empty());
    }

    #[test]
    fn test_linspace_edge_counts() {
        assert!(Tensor1D::<CpuBackend>::linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(
            Tensor1D::<CpuBackend>::linspace(0.3, 1.0, 1).to_vec(),
            vec![0.3]
        );
        let hundred = Tensor1D::<CpuBackend>::linspace(0.0, 1.0, 100).to_vec();
        assert_eq!(hundred.len(), 100);
        assert_eq!(hundred[0], 0.0);
        assert!((hundred[99] - 1.0).abs() < 1e-12);
    }
}
