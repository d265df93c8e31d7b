//! Unified error type for the Folio client.

use folio_directory::DirectoryError;
use folio_router::RouterError;
use folio_session::SessionError;
use folio_store::StoreError;

use crate::registration::RegistrationError;
use crate::validation::ValidationError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `folio` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant generates the `From` impls, so `?` converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    /// The key-value store failed (I/O, bad key, unavailable).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The remote directory failed (transport, status, malformed body).
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// A session-level error (snapshot encoding, invalid credentials).
    ///
    /// Folio's own login and logout never return this: their failures
    /// are reported in [`Settled`](folio_session::Settled). It exists so
    /// callers using `folio_session` directly, such as
    /// [`encode_snapshot`](folio_session::encode_snapshot), can `?` into
    /// `FolioError`.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A navigation request the current screen set can't satisfy.
    #[error(transparent)]
    Router(#[from] RouterError),

    /// A form was rejected before anything was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Registration didn't go through.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

impl FolioError {
    /// Returns the message to put in front of the user.
    ///
    /// Form and registration errors carry their own wording; anything else
    /// is shown as its `Display` text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Registration(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_store_error() {
        let err = StoreError::Unavailable("gone".into());
        let folio_err: FolioError = err.into();
        assert!(matches!(folio_err, FolioError::Store(_)));
        assert!(folio_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_directory_error() {
        let err = DirectoryError::Status(503);
        let folio_err: FolioError = err.into();
        assert!(matches!(folio_err, FolioError::Directory(_)));
        assert_eq!(folio_err.to_string(), "request failed with status code 503");
    }

    #[test]
    fn test_from_session_error() {
        let folio_err: FolioError = SessionError::InvalidCredentials.into();
        assert!(matches!(folio_err, FolioError::Session(_)));
        assert_eq!(folio_err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_session_error_converts_with_question_mark() {
        fn snapshot() -> Result<String, FolioError> {
            let user = folio_directory::User::new(
                folio_directory::UserId::Number(1),
                "a@x.com",
            );
            Ok(folio_session::encode_snapshot(&user)?)
        }

        assert!(snapshot().unwrap().contains("a@x.com"));
    }

    #[test]
    fn test_from_router_error() {
        let folio_err: FolioError = RouterError::Closed.into();
        assert!(matches!(folio_err, FolioError::Router(_)));
    }

    #[test]
    fn test_from_validation_error() {
        let folio_err: FolioError = ValidationError::MissingCredentials.into();
        assert_eq!(
            folio_err.user_message(),
            "Please enter both email and password"
        );
    }

    #[test]
    fn test_registration_user_message_hides_directory_detail() {
        let err = RegistrationError::Directory(DirectoryError::Status(500));
        let folio_err: FolioError = err.into();

        assert_eq!(
            folio_err.user_message(),
            "Registration failed. Please try again."
        );
    }
}
