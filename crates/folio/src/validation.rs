//! Login and registration forms, checked before any action is dispatched.
//!
//! A form that fails here never reaches the session store or the
//! directory; the caller shows the error's message and waits for the user
//! to fix the input.

use chrono::NaiveDate;
use folio_directory::{Credentials, NewUser};

/// Why a form was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Login form with an empty email or password.
    #[error("Please enter both email and password")]
    MissingCredentials,

    /// Registration form with an empty field.
    #[error("Please fill all fields")]
    MissingFields,

    /// Registration form with a date of birth after today.
    #[error("Date of birth can't be in the future")]
    DobInFuture,
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

// ---------------------------------------------------------------------------
// LoginForm
// ---------------------------------------------------------------------------

/// What the login screen collects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Checks both fields are filled and returns the credentials to log in
    /// with. Values are passed through as typed.
    pub fn validate(&self) -> Result<Credentials, ValidationError> {
        if blank(&self.email) || blank(&self.password) {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(Credentials::new(&self.email, &self.password))
    }
}

// ---------------------------------------------------------------------------
// RegistrationForm
// ---------------------------------------------------------------------------

/// What the registration screen collects.
///
/// `username` becomes the directory record's `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub dob: Option<NaiveDate>,
    pub password: String,
}

impl RegistrationForm {
    /// Checks every field is filled and the date of birth isn't after
    /// `today`, and returns the record to create.
    pub fn validate(&self, today: NaiveDate) -> Result<NewUser, ValidationError> {
        let Some(dob) = self.dob else {
            return Err(ValidationError::MissingFields);
        };
        if blank(&self.username) || blank(&self.email) || blank(&self.password) {
            return Err(ValidationError::MissingFields);
        }
        if dob > today {
            return Err(ValidationError::DobInFuture);
        }

        Ok(NewUser {
            name: self.username.clone(),
            email: self.email.clone(),
            dob: Some(dob),
            password: self.password.clone(),
        })
    }
}
