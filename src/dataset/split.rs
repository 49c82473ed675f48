//! Shuffling and halving the loaded observations into testing and training sets.

use crate::dataset::Observation;
use crate::error::{RegressionError, Result};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// The two equal halves of the shuffled dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitDataset {
    /// First half of the shuffled observations.
    pub testing: Vec<Observation>,
    /// Second half of the shuffled observations.
    pub training: Vec<Observation>,
}

impl SplitDataset {
    /// `(training, testing)` sizes.
    pub fn sizes(&self) -> (usize, usize) {
        (self.training.len(), self.testing.len())
    }
}

/// Shuffles `observations` in place and, if the count is odd, removes the last one.
///
/// Returns the dropped observation, if any.
pub fn shuffle_even<R: Rng + ?Sized>(
    observations: &mut Vec<Observation>,
    rng: &mut R,
) -> Option<Observation> {
    observations.shuffle(rng);
    if observations.len() % 2 == 1 {
        let dropped = observations.pop();
        debug!("dropped one observation to get an even count: {:?}", dropped);
        dropped
    } else {
        None
    }
}

/// Splits an even-length slice into two equal halves.
///
/// The first half becomes the testing set and the second half the training set.
///
/// ```
/// use house_price_regression::dataset::{split_halves, Observation};
///
/// let obs: Vec<_> = (0..4).map(|i| Observation::new(i as f64, 0.0)).collect();
/// let split = split_halves(&obs).unwrap();
/// assert_eq!(split.testing[0].feature, 0.0);
/// assert_eq!(split.training[0].feature, 2.0);
/// ```
pub fn split_halves(observations: &[Observation]) -> Result<SplitDataset> {
    if observations.len() < 2 {
        return Err(RegressionError::EmptyDataset(format!(
            "need at least 2 observations to split, got {}",
            observations.len()
        )));
    }
    if observations.len() % 2 != 0 {
        return Err(RegressionError::InvalidParameter(format!(
            "cannot halve an odd number of observations ({})",
            observations.len()
        )));
    }
    let (testing, training) = observations.split_at(observations.len() / 2);
    Ok(SplitDataset {
        testing: testing.to_vec(),
        training: training.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn observations(n: usize) -> Vec<Observation> {
        (0..n)
            .map(|i| Observation::new(1000.0 + i as f64, 100_000.0 + i as f64))
            .collect()
    }

    #[test]
    fn test_same_seed_same_partition() {
        let mut a = observations(101);
        let mut b = observations(101);
        shuffle_even(&mut a, &mut StdRng::seed_from_u64(42));
        shuffle_even(&mut b, &mut StdRng::seed_from_u64(42));
        assert_eq!(split_halves(&a).unwrap(), split_halves(&b).unwrap());
    }

    #[test]
    fn test_odd_count_drops_one() {
        let mut obs = observations(2 * 7 + 1);
        let dropped = shuffle_even(&mut obs, &mut StdRng::seed_from_u64(1));
        assert!(dropped.is_some());
        assert_eq!(obs.len(), 14);

        let split = split_halves(&obs).unwrap();
        assert_eq!(split.sizes(), (7, 7));
        assert!(!split.training.contains(&dropped.unwrap()));
        assert!(!split.testing.contains(&dropped.unwrap()));
    }

    #[test]
    fn test_even_count_keeps_everything() {
        let mut obs = observations(10);
        assert!(shuffle_even(&mut obs, &mut StdRng::seed_from_u64(3)).is_none());
        assert_eq!(obs.len(), 10);
    }

    #[test]
    fn test_halves_are_disjoint_and_cover_input() {
        let mut obs = observations(20);
        shuffle_even(&mut obs, &mut StdRng::seed_from_u64(9));
        let split = split_halves(&obs).unwrap();

        assert_eq!(&split.testing[..], &obs[..10]);
        assert_eq!(&split.training[..], &obs[10..]);
    }

    #[test]
    fn test_too_few_observations() {
        assert!(matches!(
            split_halves(&observations(1)),
            Err(RegressionError::EmptyDataset(_))
        ));
        assert!(split_halves(&observations(3)).is_err());

        let mut single = observations(1);
        shuffle_even(&mut single, &mut StdRng::seed_from_u64(0));
        assert!(single.is_empty());
    }
}
