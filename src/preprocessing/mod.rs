//! Column preprocessing.
//!
//! Transformers follow the same type-state pattern as models: an unfitted
//! [`Transformer`] holds configuration, and `fit` yields a
//! [`FittedTransformer`] carrying the learned parameters, which can be saved
//! and restored.
//!
//! The regression pipeline uses [`MinMaxScaler`] on both the feature and the
//! label column.

pub mod scaling;
pub mod traits;

pub use scaling::{FittedMinMaxScaler, MinMaxScaler, NormalizationStats};
pub use traits::{FittedTransformer, Transformer};
