use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use super::{Storage, StorageError};

/// In-memory persistence slots
///
/// Values live as long as the `MemoryStorage` itself. An optional quota caps
/// the total number of bytes held across all keys.
pub struct MemoryStorage {
  data: RwLock<HashMap<String, String>>,
  quota: Option<usize>,
  disabled: AtomicBool,
}

impl MemoryStorage {
  /// Create a new empty storage without a quota
  pub fn new() -> Self {
    Self {
      data: RwLock::new(HashMap::new()),
      quota: None,
      disabled: AtomicBool::new(false),
    }
  }

  /// Create a new empty storage holding at most `quota` bytes
  pub fn with_quota(quota: usize) -> Self {
    Self {
      quota: Some(quota),
      ..Self::new()
    }
  }

  /// Make every subsequent call fail with `StorageError::Unavailable`
  pub fn disable(&self) {
    self.disabled.store(true, Ordering::SeqCst);
  }

  /// Undo a previous `disable`
  pub fn enable(&self) {
    self.disabled.store(false, Ordering::SeqCst);
  }

  /// Total bytes currently stored across all keys
  pub fn used_bytes(&self) -> Result<usize, StorageError> {
    let data = self.data.read().map_err(|_| poisoned())?;
    Ok(data.values().map(String::len).sum())
  }

  fn check_enabled(&self) -> Result<(), StorageError> {
    if self.disabled.load(Ordering::SeqCst) {
      return Err(StorageError::Unavailable("storage is disabled".to_string()));
    }
    Ok(())
  }
}

impl Storage for MemoryStorage {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    self.check_enabled()?;
    let data = self.data.read().map_err(|_| poisoned())?;
    Ok(data.get(key).cloned())
  }

  fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
    self.check_enabled()?;
    let mut data = self.data.write().map_err(|_| poisoned())?;

    if let Some(quota) = self.quota {
      let others: usize = data
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(_, v)| v.len())
        .sum();
      let needed = others + value.len();
      if needed > quota {
        return Err(StorageError::QuotaExceeded { needed, quota });
      }
    }

    debug!("memory storage set {} ({} bytes)", key, value.len());
    data.insert(key.to_string(), value);
    Ok(())
  }
}

impl Default for MemoryStorage {
  fn default() -> Self {
    Self::new()
  }
}

fn poisoned() -> StorageError {
  StorageError::Unavailable("lock poisoned".to_string())
}
