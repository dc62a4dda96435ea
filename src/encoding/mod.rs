//! Snapshot encoding/decoding for storage
//!
//! This module turns the full user list into the text held by a persistence
//! slot and back.

pub mod snapshot;

pub use snapshot::{DecodeError, EncodeError, decode, encode};
