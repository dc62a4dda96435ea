//! JSON snapshot of a record sequence

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur during encoding
#[derive(Debug, Error)]
pub enum EncodeError {
  /// A record could not be represented as JSON
  #[error("failed to encode snapshot: {0}")]
  Unrepresentable(String),
}

/// Errors that can occur during decoding
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
  /// Input text is not a valid encoded record sequence
  #[error("invalid snapshot data: {0}")]
  InvalidData(String),
}

/// Serialize the whole sequence to its textual form
pub fn encode<T: Serialize>(records: &[T]) -> Result<String, EncodeError> {
  serde_json::to_string(records).map_err(|e| EncodeError::Unrepresentable(e.to_string()))
}

/// Deserialize a sequence previously produced by `encode`
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, DecodeError> {
  serde_json::from_str(text).map_err(|e| DecodeError::InvalidData(e.to_string()))
}
