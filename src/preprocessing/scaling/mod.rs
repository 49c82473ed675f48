//! Scaling transformers.

pub mod minmax;

pub use minmax::{denormalize, normalize, FittedMinMaxScaler, MinMaxScaler, NormalizationStats};
