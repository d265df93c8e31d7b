//! User directory for Folio.
//!
//! This crate defines who a user is and how Folio talks to the remote
//! service that stores them:
//!
//! - **Types** ([`User`], [`UserId`], [`NewUser`], [`Credentials`]) —
//!   the records that travel on the wire and into the session snapshot.
//! - **Contract** ([`DirectoryService`]) — existence check, credential
//!   lookup, and create.
//! - **Implementations** — [`HttpDirectory`] for the real REST service,
//!   [`InMemoryDirectory`] for tests and offline demos.
//! - **Errors** ([`DirectoryError`]).
//!
//! # Architecture
//!
//! ```text
//! Session Layer (above)  ← logs users in via find_by_credentials
//! Registration (above)   ← email_exists, then create
//!     ↕
//! Directory Layer (this crate)
//!     ↕
//! Remote REST service    ← GET/POST {base}/users
//! ```
//!
//! # Feature Flags
//!
//! - `http` (default) — [`HttpDirectory`] via `reqwest`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "http")]
mod http;
mod memory;
mod types;

pub use error::DirectoryError;
#[cfg(feature = "http")]
pub use http::{DEFAULT_BASE_URL, DirectoryConfig, HttpDirectory};
pub use memory::{DirectoryCalls, InMemoryDirectory};
pub use types::{Credentials, NewUser, User, UserId, parse_dob};

use std::future::Future;

/// A remote collection of [`User`] records.
///
/// Folio never owns the data: it asks whether an email is taken, looks a
/// user up by credentials, and asks the service to create new records.
/// The service is the identifier authority, so `create` returns whatever
/// it echoes back.
pub trait DirectoryService: Send + Sync + 'static {
    /// Returns `true` iff at least one record has exactly this email.
    fn email_exists(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<bool, DirectoryError>> + Send;

    /// Returns the first record matching both email and password, if any.
    ///
    /// Zero matches is `Ok(None)`, not an error; deciding that this means
    /// "invalid credentials" is the caller's business.
    fn find_by_credentials(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Option<User>, DirectoryError>> + Send;

    /// Creates a record and returns it as stored by the service.
    fn create(
        &self,
        new_user: &NewUser,
    ) -> impl Future<Output = Result<User, DirectoryError>> + Send;
}

/// Parses a response body that should be a JSON array of user records.
pub(crate) fn decode_records(body: &[u8]) -> Result<Vec<User>, DirectoryError> {
    serde_json::from_slice(body)
        .map_err(|e| DirectoryError::Malformed(e.to_string()))
}

/// Counts the records in a JSON array without interpreting them.
pub(crate) fn count_records(body: &[u8]) -> Result<usize, DirectoryError> {
    serde_json::from_slice::<Vec<serde::de::IgnoredAny>>(body)
        .map(|records| records.len())
        .map_err(|e| DirectoryError::Malformed(e.to_string()))
}

/// Parses a response body that should be a single user record.
pub(crate) fn decode_record(body: &[u8]) -> Result<User, DirectoryError> {
    serde_json::from_slice(body)
        .map_err(|e| DirectoryError::Malformed(e.to_string()))
}
