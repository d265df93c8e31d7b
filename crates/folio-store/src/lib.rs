//! Persistent key-value store abstraction for Folio.
//!
//! Provides the [`KeyValueStore`] trait: durable, asynchronous
//! get/set/remove of string-keyed string values. The session layer keeps
//! its persisted user snapshot behind this trait, so it never knows
//! whether the bytes live in memory, on disk, or in a platform keychain.
//!
//! # Feature Flags
//!
//! - `fs` (default) — [`FileStore`], one file per key in a directory

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "fs")]
mod file;
mod memory;

pub use error::StoreError;
#[cfg(feature = "fs")]
pub use file::FileStore;
pub use memory::MemoryStore;

use std::future::Future;

/// Durable string-keyed storage.
///
/// All three operations are async because real backends (files, mobile
/// storage APIs) are. Implementations must be shareable across tasks,
/// hence `Send + Sync + 'static`.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the value stored under `key`, or `Ok(None)` if there is none.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes the value under `key`.
    ///
    /// Removing a key that doesn't exist is not an error.
    fn remove(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Checks that a key is usable as a portable file name.
///
/// Every backend applies the same rule so that moving from
/// [`MemoryStore`] to [`FileStore`] never changes which keys are valid.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
