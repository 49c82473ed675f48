//! Reading house observations from CSV, either a local file or an HTTP URL.
//!
//! Only the `sqft_living` (feature) and `price` (label) columns are consumed;
//! they are located by header name, so column order does not matter.

use crate::dataset::Observation;
use crate::error::{RegressionError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::info;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

pub const FEATURE_COLUMN: &str = "sqft_living";
pub const LABEL_COLUMN: &str = "price";

/// Where the CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Http(String),
}

impl DataSource {
    /// `http://` and `https://` locations are fetched, anything else is a file path.
    ///
    /// ```
    /// use house_price_regression::loader::DataSource;
    ///
    /// assert!(matches!(DataSource::parse("https://host/data.csv"), DataSource::Http(_)));
    /// assert!(matches!(DataSource::parse("data/kc_house_data.csv"), DataSource::File(_)));
    /// ```
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Http(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }

    /// Fetches and parses all observations from this source.
    pub fn load(&self) -> Result<Vec<Observation>> {
        let observations = match self {
            DataSource::File(path) => {
                let file = File::open(path).map_err(|e| {
                    RegressionError::Io(format!("cannot open {}: {}", path.display(), e))
                })?;
                read_observations(BufReader::new(file))?
            }
            DataSource::Http(url) => read_observations(fetch(url)?)?,
        };
        info!("loaded {} observations from {}", observations.len(), self);
        Ok(observations)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Http(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(feature = "http")]
fn fetch(url: &str) -> Result<Box<dyn Read + Send>> {
    let response = ureq::get(url).call()?;
    Ok(Box::new(response.into_reader()))
}

#[cfg(not(feature = "http"))]
fn fetch(url: &str) -> Result<Box<dyn Read + Send>> {
    Err(RegressionError::Http(format!(
        "cannot fetch {}: built without the `http` feature",
        url
    )))
}

/// Parses CSV with a header row into observations.
///
/// Fails on the first row whose `price` or `sqft_living` is missing, not a
/// number, or not finite. An input with a header but no rows is
/// [`RegressionError::EmptyDataset`].
///
/// ```
/// use house_price_regression::loader::read_observations;
///
/// let csv = "id,price,sqft_living\n1,221900,1180\n2,538000,2570\n";
/// let obs = read_observations(csv.as_bytes()).unwrap();
/// assert_eq!(obs.len(), 2);
/// assert_eq!(obs[0].feature, 1180.0);
/// assert_eq!(obs[0].label, 221900.0);
/// ```
pub fn read_observations<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let feature_idx = column_index(&headers, FEATURE_COLUMN)?;
    let label_idx = column_index(&headers, LABEL_COLUMN)?;

    let mut observations = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;
        let feature = parse_field(&record, feature_idx, row, FEATURE_COLUMN)?;
        let label = parse_field(&record, label_idx, row, LABEL_COLUMN)?;
        observations.push(Observation { feature, label });
    }

    if observations.is_empty() {
        return Err(RegressionError::EmptyDataset(
            "CSV contains a header but no data rows".into(),
        ));
    }
    Ok(observations)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| RegressionError::MissingColumn(name.to_string()))
}

fn parse_field(record: &StringRecord, idx: usize, row: usize, column: &str) -> Result<f64> {
    let raw = record.get(idx).unwrap_or("");
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RegressionError::MalformedRow {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}
