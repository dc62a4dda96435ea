//! Ordered list of user records mirrored into a persistence slot
//!
//! Every mutation updates the in-memory list first and then writes the whole
//! list back under [`USERS_KEY`]. Positions are the only identity a record
//! has.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::encoding::{self, EncodeError};
use crate::storage::{Storage, StorageError};

/// Slot key the user list is stored under
pub const USERS_KEY: &str = "users";

/// Errors returned by the mutating operations
#[derive(Debug, Error)]
pub enum StoreError {
  /// Position does not index an existing record
  #[error("position {position} out of range for {len} users")]
  OutOfRange { position: usize, len: usize },

  /// The list could not be serialized
  #[error(transparent)]
  Encode(#[from] EncodeError),

  /// The slot rejected the write; the in-memory list is already mutated
  #[error("failed to persist users: {0}")]
  PersistenceWriteFailure(#[from] StorageError),
}

/// Owner of the user list and its persisted snapshot
pub struct UserListStore<S, U = serde_json::Value> {
  storage: S,
  users: Vec<U>,
}

impl<S, U> UserListStore<S, U>
where
  S: Storage,
  U: Serialize + DeserializeOwned,
{
  /// Create the store, loading whatever list `storage` already holds
  pub fn new(storage: S) -> Self {
    let users = Self::initialize(&storage);
    Self { storage, users }
  }

  /// Read the persisted list, falling back to an empty one
  ///
  /// Absent, unreadable and malformed slots all yield `[]`. The latter two
  /// are reported through `tracing` rather than returned.
  fn initialize(storage: &S) -> Vec<U> {
    let raw = match storage.get(USERS_KEY) {
      Ok(Some(raw)) => raw,
      Ok(None) => {
        debug!("No persisted users, starting empty");
        return Vec::new();
      }
      Err(e) => {
        warn!("Failed to read persisted users, starting empty: {}", e);
        return Vec::new();
      }
    };

    match encoding::decode::<U>(&raw) {
      Ok(users) => {
        debug!("Loaded {} persisted users", users.len());
        users
      }
      Err(e) => {
        warn!("Discarding persisted users: {}", e);
        Vec::new()
      }
    }
  }

  /// Current list, in position order
  pub fn users(&self) -> &[U] {
    &self.users
  }

  /// Record at `position`, if any
  pub fn get(&self, position: usize) -> Option<&U> {
    self.users.get(position)
  }

  pub fn len(&self) -> usize {
    self.users.len()
  }

  pub fn is_empty(&self) -> bool {
    self.users.is_empty()
  }

  /// Backend the list is persisted to
  pub fn storage(&self) -> &S {
    &self.storage
  }

  /// Consume the store, returning the list
  pub fn into_users(self) -> Vec<U> {
    self.users
  }

  /// Append `user` at the end of the list
  pub fn add_user(&mut self, user: U) -> Result<(), StoreError> {
    self.users.push(user);
    debug!("Added user at position {}", self.users.len() - 1);
    self.persist()
  }

  /// Replace the record at `position` with `updated_user`
  pub fn update_user(&mut self, position: usize, updated_user: U) -> Result<(), StoreError> {
    self.check_position(position)?;
    self.users[position] = updated_user;
    debug!("Updated user at position {}", position);
    self.persist()
  }

  /// Remove the record at `position`, shifting later records down by one
  pub fn remove_user(&mut self, position: usize) -> Result<(), StoreError> {
    self.check_position(position)?;
    self.users.remove(position);
    debug!("Removed user at position {}", position);
    self.persist()
  }

  fn check_position(&self, position: usize) -> Result<(), StoreError> {
    if position >= self.users.len() {
      return Err(StoreError::OutOfRange {
        position,
        len: self.users.len(),
      });
    }
    Ok(())
  }

  /// Write the whole list to the slot, overwriting the previous snapshot
  fn persist(&self) -> Result<(), StoreError> {
    let snapshot = encoding::encode(&self.users)?;
    if let Err(e) = self.storage.set(USERS_KEY, snapshot) {
      warn!("Persisted users are now stale: {}", e);
      return Err(e.into());
    }
    Ok(())
  }
}
