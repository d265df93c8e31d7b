//! Error types for the session layer.

use folio_directory::DirectoryError;
use folio_store::StoreError;

/// Errors that can occur while running a session action.
///
/// Actions never return these directly: a failed login settles as
/// [`Session::AuthenticationFailed`](crate::Session::AuthenticationFailed)
/// carrying the error's message. The enum exists so the message text has
/// one source of truth and so lower-level helpers can use `?`.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The directory had no record for the given email/password pair.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Reading or writing the persisted snapshot failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The directory could not be reached or answered nonsense.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The user could not be serialized into a snapshot.
    #[error("could not encode session snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
