//! Error type shared by every stage of the regression pipeline.

use std::fmt;

/// Error type for loading, training, prediction and persistence.
#[derive(Debug)]
pub enum RegressionError {
    /// I/O error while reading a data file or writing the model store.
    Io(String),
    /// Fetching the dataset over HTTP failed.
    Http(String),
    /// The CSV reader rejected the input.
    Csv(String),
    /// The header row lacks a required column.
    MissingColumn(String),
    /// A data row holds a value that is not a finite number.
    MalformedRow {
        /// 1-based index of the data row (the header is not counted).
        row: usize,
        column: String,
        value: String,
    },
    /// No observations where at least some were required.
    EmptyDataset(String),
    /// A column has `min == max` (or non-finite bounds), so min-max scaling is undefined.
    DegenerateRange { column: String, min: f64, max: f64 },
    /// User-supplied text could not be used as a model input.
    InvalidInput(String),
    /// Invalid hyperparameter or configuration value.
    InvalidParameter(String),
    /// Training produced a non-finite loss or weight.
    Diverged(String),
    /// The command needs a trained or loaded model.
    ModelNotReady,
    /// No model is stored under the given key.
    ModelNotFound(String),
    /// Serialization or deserialization error.
    Serialization(String),
}

impl fmt::Display for RegressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressionError::Io(msg) => write!(f, "I/O error: {}", msg),
            RegressionError::Http(msg) => write!(f, "HTTP error: {}", msg),
            RegressionError::Csv(msg) => write!(f, "CSV error: {}", msg),
            RegressionError::MissingColumn(name) => {
                write!(f, "Missing column: '{}' not found in header", name)
            }
            RegressionError::MalformedRow { row, column, value } => {
                write!(
                    f,
                    "Malformed row {}: column '{}' has non-numeric value '{}'",
                    row, column, value
                )
            }
            RegressionError::EmptyDataset(msg) => write!(f, "Empty dataset: {}", msg),
            RegressionError::DegenerateRange { column, min, max } => {
                write!(
                    f,
                    "Degenerate range: column '{}' has min {} and max {}",
                    column, min, max
                )
            }
            RegressionError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            RegressionError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            RegressionError::Diverged(msg) => write!(f, "Training diverged: {}", msg),
            RegressionError::ModelNotReady => {
                write!(f, "Model not ready: train or load a model first")
            }
            RegressionError::ModelNotFound(key) => {
                write!(f, "No saved model found under key '{}'", key)
            }
            RegressionError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for RegressionError {}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RegressionError>;

impl From<std::io::Error> for RegressionError {
    fn from(err: std::io::Error) -> Self {
        RegressionError::Io(err.to_string())
    }
}

impl From<csv::Error> for RegressionError {
    fn from(err: csv::Error) -> Self {
        RegressionError::Csv(err.to_string())
    }
}

impl From<bincode::Error> for RegressionError {
    fn from(err: bincode::Error) -> Self {
        RegressionError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for RegressionError {
    fn from(err: serde_json::Error) -> Self {
        RegressionError::Serialization(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<ureq::Error> for RegressionError {
    fn from(err: ureq::Error) -> Self {
        RegressionError::Http(err.to_string())
    }
}
