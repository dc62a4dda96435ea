//! String-keyed persistence slots
//!
//! A slot holds a single string value per key and outlives any store that
//! reads or writes it. Backends are chosen from configuration.

pub mod file;
pub mod memory;

use thiserror::Error;
use tracing::info;

use crate::config::{Backend, StorageConfig};

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
  /// The write would exceed the backend's capacity
  #[error("quota exceeded: {needed} bytes needed, {quota} bytes allowed")]
  QuotaExceeded { needed: usize, quota: usize },

  /// The backend cannot be read from or written to at all
  #[error("storage unavailable: {0}")]
  Unavailable(String),

  /// The key cannot be mapped onto the backend
  #[error("invalid storage key '{0}'")]
  InvalidKey(String),
}

impl From<std::io::Error> for StorageError {
  fn from(e: std::io::Error) -> Self {
    StorageError::Unavailable(e.to_string())
  }
}

/// Get/set access to named persistence slots
pub trait Storage {
  /// Return the raw value stored under `key`, or `None` if it was never set
  fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

  /// Store `value` under `key`, replacing any prior value
  fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    (**self).get(key)
  }

  fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
    (**self).set(key, value)
  }
}

impl<S: Storage + ?Sized> Storage for &S {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    (**self).get(key)
  }

  fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
    (**self).set(key, value)
  }
}

/// Open the backend described by `config`
pub fn open(config: &StorageConfig) -> Result<Box<dyn Storage>, StorageError> {
  match config.backend {
    Backend::Memory => {
      info!("Using in-memory storage");
      let storage = match config.quota_bytes {
        Some(quota) => MemoryStorage::with_quota(quota),
        None => MemoryStorage::new(),
      };
      Ok(Box::new(storage))
    }
    Backend::File => {
      info!("Using file storage at {}", config.path);
      let storage = FileStorage::open(&config.path)?;
      Ok(Box::new(storage))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_open_memory_backend() {
    let config = StorageConfig {
      backend: Backend::Memory,
      path: String::new(),
      quota_bytes: Some(4),
    };
    let storage = open(&config).unwrap();
    assert!(storage.get("users").unwrap().is_none());
    assert!(storage.set("users", "[]".to_string()).is_ok());
    assert!(matches!(
      storage.set("users", "[1,2]".to_string()),
      Err(StorageError::QuotaExceeded { .. })
    ));
  }

  #[test]
  fn test_open_file_backend() {
    let dir = tempfile::TempDir::with_prefix("userlist-").unwrap();
    let config = StorageConfig {
      backend: Backend::File,
      path: dir.path().join("slots").to_string_lossy().into_owned(),
      quota_bytes: None,
    };
    let storage = open(&config).unwrap();
    storage.set("users", "[]".to_string()).unwrap();
    assert_eq!(storage.get("users").unwrap(), Some("[]".to_string()));
  }

  #[test]
  fn test_storage_through_reference() {
    let storage = MemoryStorage::new();
    let by_ref: &MemoryStorage = &storage;
    by_ref.set("k", "v".to_string()).unwrap();
    assert_eq!(storage.get("k").unwrap(), Some("v".to_string()));
  }
}
