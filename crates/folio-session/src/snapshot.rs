//! The persisted session snapshot.
//!
//! A snapshot is just the logged-in [`User`] serialized as JSON under a
//! single store key. There is no version field and no migration: if a
//! snapshot doesn't parse, it's treated as if it weren't there.

use folio_directory::User;

use crate::SessionError;

/// Serializes a user for persistence.
///
/// # Errors
/// Returns [`SessionError::Snapshot`] if serialization fails.
pub fn encode_snapshot(user: &User) -> Result<String, SessionError> {
    Ok(serde_json::to_string(user)?)
}

/// Parses a persisted snapshot. Malformed input yields `None`.
pub fn decode_snapshot(raw: &str) -> Option<User> {
    match serde_json::from_str(raw) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::debug!(error = %e, "session snapshot does not parse");
            None
        }
    }
}
