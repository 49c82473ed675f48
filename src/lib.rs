//! # house-price-regression
//!
//! Single-feature linear regression of house sale price on living area
//! (`sqft_living`), trained with mini-batch SGD against mean squared error.
//!
//! ## Design
//!
//! - **Stateful Type Safety**: models carry their training state in the type
//!   system (`Unfitted` vs `Fitted`); only fitted models can predict or be saved.
//! - **Training/Inference Separation**: fitted models hold only weights; loss,
//!   optimizer and trainer are separate components.
//! - **Backend Agnosticism**: tensors go through the [`Backend`] trait, with a
//!   pure-Rust CPU backend by default and an `ndarray` one behind a feature.
//! - **Explicit session state**: the loaded data, its scaling, the current
//!   model and the model store live in one [`session::Session`] value.
//!
//! ## Quick Start
//!
//! ```rust
//! use house_price_regression::config::RegressionConfig;
//! use house_price_regression::dataset::Observation;
//! use house_price_regression::session::CpuSession;
//! use house_price_regression::storage::MemoryStore;
//!
//! let observations: Vec<Observation> = (0..200)
//!     .map(|i| {
//!         let sqft = 600.0 + 20.0 * i as f64;
//!         Observation::new(sqft, 250.0 * sqft)
//!     })
//!     .collect();
//!
//! let config = RegressionConfig::default().with_seed(7);
//! let mut session = CpuSession::start(observations, config, MemoryStore::new()).unwrap();
//!
//! let result = session.train(|_| {}).unwrap();
//! assert!(result.val_loss.unwrap() < 0.01);
//!
//! let prediction = session.predict("2000").unwrap();
//! assert_eq!(prediction.price % 1000.0, 0.0);
//! ```
//!
//! ## Module Structure
//!
//! - `backend`: tensor abstractions (`Scalar`, `Tensor1D`, `Tensor2D`)
//! - `loader`: CSV from a file or an HTTP URL
//! - `dataset`: observations, batching, shuffle and split
//! - `preprocessing`: min-max scaling
//! - `model`: bias-free linear model
//! - `loss`, `optimizer`, `trainer`: the training loop
//! - `evaluation`, `predict`: held-out loss and price prediction
//! - `storage`: model persistence
//! - `session`: the command surface tying it together

pub mod backend;

/// Runtime settings and hyperparameters.
pub mod config;

/// Observations and batched dataset access.
pub mod dataset;

/// Crate-wide error type.
pub mod error;

/// Loss of a fitted model on held-out data.
pub mod evaluation;

/// CSV loading from files and URLs.
pub mod loader;

/// Differentiable loss functions for model training.
pub mod loss;

/// Linear model with compile-time state safety.
pub mod model;

/// Optimization algorithms for parameter updates.
pub mod optimizer;

/// Price prediction and rounding.
pub mod predict;

/// Min-max scaling of feature and label columns.
pub mod preprocessing;

/// Byte encoding of fitted parameters.
pub mod serialization;

/// Startup pipeline and user commands.
pub mod session;

/// Model stores.
pub mod storage;

/// High-level training loop orchestration.
pub mod trainer;

/// Re-export of core backend types for convenient usage.
pub use backend::{Backend, ScalarOps, Tensor1D, Tensor2D};
#[cfg(feature = "cpu")]
pub use backend::CpuBackend;
pub use error::{RegressionError, Result};
