use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Storage, StorageError};

const SLOT_EXTENSION: &str = "json";

/// Persistence slots backed by one file per key in a directory
pub struct FileStorage {
  root: PathBuf,
}

impl FileStorage {
  /// Open (creating if needed) the slot directory at `root`
  pub fn open(root: impl AsRef<Path>) -> Result<Self, StorageError> {
    let root = root.as_ref().to_path_buf();
    fs::create_dir_all(&root)?;
    info!("File storage opened at {}", root.display());
    Ok(Self { root })
  }

  /// Directory holding the slot files
  pub fn root(&self) -> &Path {
    &self.root
  }

  fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
    let valid = !key.is_empty()
      && key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
      return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(self.root.join(format!("{}.{}", key, SLOT_EXTENSION)))
  }
}

impl Storage for FileStorage {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    let path = self.slot_path(key)?;
    match fs::read_to_string(&path) {
      Ok(value) => Ok(Some(value)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
    let path = self.slot_path(key)?;
    let tmp = path.with_extension(format!("{}.tmp", SLOT_EXTENSION));

    // Rename keeps readers from ever seeing a half-written slot
    fs::write(&tmp, value.as_bytes())?;
    fs::rename(&tmp, &path)?;

    debug!("file storage set {} ({} bytes)", path.display(), value.len());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_get_missing_slot() {
    let dir = TempDir::with_prefix("userlist-").unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    assert_eq!(storage.get("users").unwrap(), None);
  }

  #[test]
  fn test_set_overwrites_and_survives_reopen() {
    let dir = TempDir::with_prefix("userlist-").unwrap();
    {
      let storage = FileStorage::open(dir.path()).unwrap();
      storage.set("users", "[\"a\"]".to_string()).unwrap();
      storage.set("users", "[\"b\"]".to_string()).unwrap();
    }

    let storage = FileStorage::open(dir.path()).unwrap();
    assert_eq!(storage.get("users").unwrap(), Some("[\"b\"]".to_string()));
    assert!(dir.path().join("users.json").exists());
    assert!(!dir.path().join("users.json.tmp").exists());
  }

  #[test]
  fn test_invalid_keys() {
    let dir = TempDir::with_prefix("userlist-").unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();

    for key in ["", "../escape", "a/b", "with space"] {
      assert!(matches!(
        storage.get(key),
        Err(StorageError::InvalidKey(_))
      ));
      assert!(matches!(
        storage.set(key, "x".to_string()),
        Err(StorageError::InvalidKey(_))
      ));
    }
  }

  #[test]
  fn test_creates_missing_root() {
    let dir = TempDir::with_prefix("userlist-").unwrap();
    let root = dir.path().join("nested").join("slots");
    let storage = FileStorage::open(&root).unwrap();
    assert_eq!(storage.root(), root.as_path());
    assert!(root.is_dir());
  }
}
