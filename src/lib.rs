//! Ordered list of user records kept in memory and mirrored, as a full
//! snapshot, into a string-keyed persistence slot after every mutation.

pub mod config;
pub mod encoding;
pub mod storage;
pub mod user_store;

pub use storage::{Storage, StorageError};
pub use user_store::{StoreError, USERS_KEY, UserListStore};
