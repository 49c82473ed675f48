//! Serialization of fitted parameters.
//!
//! Parameters are plain numeric data, decoupled from backend tensors, and
//! encoded with bincode.

use std::error::Error;

/// Parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain numerical data (`Vec<f64>`,
/// scalars), never backend tensors.
///
/// ```
/// use house_price_regression::serialization::SerializableParams;
///
/// let bytes = vec![1.5f64, -2.0].to_bytes().unwrap();
/// assert_eq!(Vec::<f64>::from_bytes(&bytes).unwrap(), vec![1.5, -2.0]);
/// ```
pub trait SerializableParams: Sized {
    type Error: Error + Send + Sync + 'static;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_bytes_fail() {
        let bytes = vec![1.0f64, 2.0, 3.0].to_bytes().unwrap();
        assert!(Vec::<f64>::from_bytes(&bytes[..bytes.len() - 3]).is_err());
    }
}
