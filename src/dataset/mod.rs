//! Observations and batched access to training data.
//!
//! - **Observation**: one house, `(sqft_living, price)`.
//! - **Dataset**: a source of `(X, y)` pairs where `X` is an `(n, 1)` feature
//!   matrix and `y` the target vector of length `n`.
//! - **Batch**: a contiguous subset of samples for mini-batch gradient descent.
//!
//! # Example
//!
//! ```rust
//! use house_price_regression::dataset::{Dataset, InMemoryDataset};
//! use house_price_regression::backend::CpuBackend;
//!
//! let dataset = InMemoryDataset::new(vec![0.1, 0.2], vec![0.3, 0.6]).unwrap();
//!
//! for batch in dataset.batches::<CpuBackend>(1) {
//!     let (x_batch, y_batch) = batch.unwrap();
//!     assert_eq!(x_batch.shape(), (1, 1));
//!     assert_eq!(y_batch.len(), 1);
//! }
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, ops::Range};

pub mod memory;
pub mod split;
pub use self::memory::InMemoryDataset;
pub use self::split::{shuffle_even, split_halves, SplitDataset};

/// A single house: living area in square feet and sale price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// `sqft_living`
    pub feature: f64,
    /// `price`
    pub label: f64,
}

impl Observation {
    pub fn new(feature: f64, label: f64) -> Self {
        Self { feature, label }
    }
}

/// Abstract interface for a regression dataset.
///
/// # Example Implementation
///
/// ```rust
/// use house_price_regression::dataset::Dataset;
/// use house_price_regression::backend::{Backend, Tensor1D, Tensor2D};
/// use std::ops::Range;
///
/// struct Constant;
///
/// impl Dataset for Constant {
///     type Error = String;
///
///     fn len(&self) -> Option<usize> {
///         Some(4)
///     }
///
///     fn get_batch<B: Backend>(
///         &self,
///         range: Range<usize>,
///     ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
///         let n = range.len();
///         Ok((Tensor2D::new(vec![1.0; n], n, 1), Tensor1D::new(vec![2.0; n])))
///     }
/// }
///
/// assert_eq!(Constant.len(), Some(4));
/// ```
pub trait Dataset {
    /// Error type returned when accessing data.
    type Error: Debug + 'static;

    /// Total number of samples, if known.
    fn len(&self) -> Option<usize>;

    /// `true` when `len() == Some(0)`.
    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Creates an iterator over fixed-size batches. The last batch may be smaller.
    fn batches<B: Backend>(&self, batch_size: usize) -> DatasetBatchIter<'_, B, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter {
            dataset: self,
            batch_size,
            current: 0,
            _backend: std::marker::PhantomData,
        }
    }

    /// Loads the samples in `range` as `(X, y)` tensors.
    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error>;
}

/// Iterator over dataset batches, created by [`Dataset::batches`].
///
/// Data is fetched lazily on `next()`. Errors from `get_batch` are yielded
/// as `Some(Err(e))`.
pub struct DatasetBatchIter<'a, B: Backend, D: ?Sized> {
    dataset: &'a D,
    batch_size: usize,
    /// Index of the next sample to yield.
    current: usize,
    _backend: std::marker::PhantomData<B>,
}

impl<B: Backend, D: Dataset> Iterator for DatasetBatchIter<'_, B, D> {
    type Item = Result<(Tensor2D<B>, Tensor1D<B>), D::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.dataset.len()?;
        if self.current >= total || self.batch_size == 0 {
            return None;
        }

        let end = (self.current + self.batch_size).min(total);
        let range = self.current..end;
        self.current = end;

        Some(self.dataset.get_batch::<B>(range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use std::ops::Range;

    // Mock dataset for iterator logic testing
    struct MockDataset {
        len: usize,
    }

    impl Dataset for MockDataset {
        type Error = &'static str;

        fn len(&self) -> Option<usize> {
            Some(self.len)
        }

        fn get_batch<B: Backend>(
            &self,
            range: Range<usize>,
        ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
            if range.start >= self.len || range.end > self.len {
                return Err("range out of bounds");
            }

            let n = range.len();
            let x_data: Vec<f64> = (range.start..range.end).map(|i| i as f64 * 10.0).collect();
            let y_data: Vec<f64> = (range.start..range.end).map(|i| i as f64).collect();

            Ok((Tensor2D::<B>::new(x_data, n, 1), Tensor1D::<B>::new(y_data)))
        }
    }

    #[test]
    fn test_dataset_is_empty() {
        assert!(MockDataset { len: 0 }.is_empty());
        assert!(!MockDataset { len: 1 }.is_empty());
    }

    #[test]
    fn test_batches_full() {
        let dataset = MockDataset { len: 6 };
        let mut iter = dataset.batches::<CpuBackend>(2);

        for i in 0..3 {
            let (x, y) = iter.next().unwrap().unwrap();
            assert_eq!(x.shape(), (2, 1));
            assert_eq!(y.to_vec(), vec![i as f64 * 2.0, i as f64 * 2.0 + 1.0]);
        }
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_batches_partial_last() {
        let dataset = MockDataset { len: 5 };
        let mut iter = dataset.batches::<CpuBackend>(2);

        assert_eq!(iter.next().unwrap().unwrap().0.shape(), (2, 1));
        assert_eq!(iter.next().unwrap().unwrap().0.shape(), (2, 1));
        assert_eq!(iter.next().unwrap().unwrap().0.shape(), (1, 1));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_batches_larger_than_dataset() {
        let dataset = MockDataset { len: 3 };
        let mut iter = dataset.batches::<CpuBackend>(32);

        assert_eq!(iter.next().unwrap().unwrap().0.shape(), (3, 1));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_batches_empty_dataset() {
        let dataset = MockDataset { len: 0 };
        assert!(dataset.batches::<CpuBackend>(2).next().is_none());
    }
}
