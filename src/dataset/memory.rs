use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::dataset::{Dataset, Observation};
use crate::error::{RegressionError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Range;

/// Single-feature dataset held in memory as two parallel columns.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryDataset {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl InMemoryDataset {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(RegressionError::InvalidParameter(format!(
                "x and y must have same length ({} vs {})",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(RegressionError::EmptyDataset(
                "in-memory dataset needs at least one sample".into(),
            ));
        }
        Ok(Self { x, y })
    }

    /// Builds a dataset by mapping each observation through `feature` and `label`.
    ///
    /// Used to apply normalization while converting.
    pub fn from_observations<F, L>(observations: &[Observation], feature: F, label: L) -> Result<Self>
    where
        F: Fn(f64) -> f64,
        L: Fn(f64) -> f64,
    {
        let x = observations.iter().map(|o| feature(o.feature)).collect();
        let y = observations.iter().map(|o| label(o.label)).collect();
        Self::new(x, y)
    }

    pub fn features(&self) -> &[f64] {
        &self.x
    }

    pub fn targets(&self) -> &[f64] {
        &self.y
    }

    pub fn n_samples(&self) -> usize {
        self.x.len()
    }

    /// Splits off the trailing `n - floor(n * (1 - fraction))` samples.
    ///
    /// Returns `(head, tail)`; `tail` is `None` when the fraction selects no
    /// samples. Fails if `fraction` is outside `[0, 1)` or if it would leave
    /// the head empty.
    pub fn split_tail(&self, fraction: f64) -> Result<(InMemoryDataset, Option<InMemoryDataset>)> {
        if !(0.0..1.0).contains(&fraction) {
            return Err(RegressionError::InvalidParameter(format!(
                "validation split must lie in [0, 1), got {}",
                fraction
            )));
        }
        let n = self.n_samples();
        let head_len = (n as f64 * (1.0 - fraction)).floor() as usize;
        if head_len == 0 {
            return Err(RegressionError::EmptyDataset(format!(
                "validation split {} leaves no training samples out of {}",
                fraction, n
            )));
        }
        let head = Self {
            x: self.x[..head_len].to_vec(),
            y: self.y[..head_len].to_vec(),
        };
        let tail = if head_len < n {
            Some(Self {
                x: self.x[head_len..].to_vec(),
                y: self.y[head_len..].to_vec(),
            })
        } else {
            None
        };
        Ok((head, tail))
    }

    /// Returns a copy with samples reordered by a uniform random permutation.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..self.n_samples()).collect();
        order.shuffle(rng);
        Self {
            x: order.iter().map(|&i| self.x[i]).collect(),
            y: order.iter().map(|&i| self.y[i]).collect(),
        }
    }

    /// Whole dataset as `(X, y)` tensors.
    pub fn to_tensors<B: Backend>(&self) -> (Tensor2D<B>, Tensor1D<B>) {
        (
            Tensor2D::from_column(&Tensor1D::<B>::new(self.x.clone())),
            Tensor1D::<B>::new(self.y.clone()),
        )
    }
}

impl Dataset for InMemoryDataset {
    type Error = std::convert::Infallible;

    fn len(&self) -> Option<usize> {
        Some(self.x.len())
    }

    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> std::result::Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
        let batch_x = &self.x[range.clone()];
        let batch_y = &self.y[range];

        let x_tensor = Tensor2D::from_column(&Tensor1D::<B>::new(batch_x.to_vec()));
        let y_tensor = Tensor1D::<B>::new(batch_y.to_vec());

        Ok((x_tensor, y_tensor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ramp(n: usize) -> InMemoryDataset {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v * 3.0).collect();
        InMemoryDataset::new(x, y).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(InMemoryDataset::new(vec![1.0], vec![]).is_err());
        assert!(matches!(
            InMemoryDataset::new(vec![], vec![]),
            Err(RegressionError::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_from_observations_applies_mappings() {
        let obs = vec![Observation::new(1000.0, 200_000.0), Observation::new(2000.0, 400_000.0)];
        let ds = InMemoryDataset::from_observations(&obs, |f| f / 1000.0, |l| l / 100_000.0).unwrap();
        assert_eq!(ds.features(), &[1.0, 2.0]);
        assert_eq!(ds.targets(), &[2.0, 4.0]);
    }

    #[test]
    fn test_split_tail_sizes() {
        let ds = ramp(10);
        let (head, tail) = ds.split_tail(0.2).unwrap();
        assert_eq!(head.n_samples(), 8);
        let tail = tail.unwrap();
        assert_eq!(tail.features(), &[8.0, 9.0]);

        // floor(7 * 0.8) = 5, so two samples are held out
        let (head, tail) = ramp(7).split_tail(0.2).unwrap();
        assert_eq!(head.n_samples(), 5);
        assert_eq!(tail.unwrap().n_samples(), 2);
    }

    #[test]
    fn test_split_tail_zero_fraction() {
        let (head, tail) = ramp(4).split_tail(0.0).unwrap();
        assert_eq!(head.n_samples(), 4);
        assert!(tail.is_none());
    }

    #[test]
    fn test_split_tail_errors() {
        assert!(ramp(4).split_tail(1.0).is_err());
        assert!(matches!(
            ramp(1).split_tail(0.5),
            Err(RegressionError::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_shuffled_keeps_pairs() {
        let ds = ramp(50);
        let mut rng = StdRng::seed_from_u64(7);
        let shuffled = ds.shuffled(&mut rng);

        assert_ne!(shuffled.features(), ds.features());
        for (x, y) in shuffled.features().iter().zip(shuffled.targets()) {
            assert_eq!(*y, x * 3.0);
        }
        let mut sorted = shuffled.features().to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(sorted, ds.features());
    }

    #[test]
    fn test_get_batch_and_tensors() {
        let ds = ramp(5);
        let (x, y) = ds.get_batch::<CpuBackend>(1..3).unwrap();
        assert_eq!(x.shape(), (2, 1));
        assert_eq!(y.to_vec(), vec![3.0, 6.0]);

        let (x_all, y_all) = ds.to_tensors::<CpuBackend>();
        assert_eq!(x_all.shape(), (5, 1));
        assert_eq!(y_all.len(), 5);
    }
}
