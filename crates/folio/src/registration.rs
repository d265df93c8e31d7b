//! Account registration against the user directory.
//!
//! Registration doesn't touch the session: a new account still has to log
//! in. The flow is
//!
//! ```text
//! validate form → email_exists? ──yes──→ AlreadyRegistered
//!                      │
//!                      no
//!                      ▼
//!                   create → User
//! ```
//!
//! The existence check and the create are two separate requests, so two
//! clients registering the same email at the same moment can both pass
//! the check. The directory doesn't enforce uniqueness; nothing here can
//! close that gap.

use chrono::NaiveDate;
use folio_directory::{DirectoryError, DirectoryService, User};

use crate::validation::{RegistrationForm, ValidationError};

/// Why a registration didn't go through.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// The form was rejected; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The email already belongs to a directory record. No create was
    /// issued.
    #[error("Email is already registered")]
    AlreadyRegistered,

    /// The existence check or the create failed.
    #[error("registration failed: {0}")]
    Directory(#[from] DirectoryError),
}

impl RegistrationError {
    /// Returns the message to show on the registration screen.
    ///
    /// Directory failures are collapsed into a generic retry prompt; the
    /// underlying error is still available through `source()`.
    pub fn user_message(&self) -> String {
        match self {
            Self::Directory(_) => "Registration failed. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Registers a new account in `directory`.
///
/// Returns the record as the directory created it, including its assigned
/// id. `today` bounds the date of birth.
pub async fn register<D: DirectoryService>(
    directory: &D,
    form: &RegistrationForm,
    today: NaiveDate,
) -> Result<User, RegistrationError> {
    let new_user = form.validate(today)?;

    if directory.email_exists(&new_user.email).await? {
        tracing::info!(email = %new_user.email, "email already registered");
        return Err(RegistrationError::AlreadyRegistered);
    }

    let user = directory.create(&new_user).await?;
    tracing::info!(id = %user.id, email = %user.email, "account registered");
    Ok(user)
}
