//! Core directory types: the records that travel between Folio and the
//! remote user directory, and that end up in the persisted snapshot.
//!
//! The remote service is loosely typed (it happily echoes whatever JSON it
//! was given), so everything here is parsed strictly at the boundary:
//! a record either becomes a [`User`] or is rejected as malformed.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The directory's identifier for a user.
///
/// The service is the identifier authority and isn't consistent about the
/// JSON type: depending on the backend an id arrives as `1` or as `"1"`.
/// `#[serde(untagged)]` lets serde try each variant in order, and we
/// re-serialize in the same shape we received, so a snapshot written today
/// is byte-compatible with what the service sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    /// A numeric id, e.g. `42`.
    Number(u64),
    /// A string id, e.g. `"42"` or `"a1b2"`.
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "U-{n}"),
            Self::Text(s) => write!(f, "U-{s}"),
        }
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A user record as stored by the directory.
///
/// Only `id` and `email` are required. Older records and hand-written
/// snapshots routinely omit the rest, and a missing display name is not a
/// reason to refuse a login.
///
/// The `password` field is what the remote service echoes back on lookup.
/// It is kept so the snapshot mirrors the record, but `Debug` never prints
/// it and nothing in Folio reads it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Directory-assigned identifier.
    pub id: UserId,

    /// Display name (the "username" field of the registration form).
    /// Missing and `null` both read as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    /// Login email. Expected unique within the directory.
    pub email: String,

    /// Date of birth, `YYYY-MM-DD` on the wire.
    #[serde(
        default,
        with = "dob_format",
        skip_serializing_if = "Option::is_none"
    )]
    pub dob: Option<NaiveDate>,

    /// Plaintext password as echoed by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl User {
    /// Creates a user with just the required fields.
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            name: String::new(),
            email: email.into(),
            dob: None,
            password: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the date of birth.
    pub fn with_dob(mut self, dob: NaiveDate) -> Self {
        self.dob = Some(dob);
        self
    }

    /// Sets the stored password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("dob", &self.dob)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// NewUser
// ---------------------------------------------------------------------------

/// The body of a create request.
///
/// No `id`: the directory assigns one and echoes the full record back.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default, with = "dob_format")]
    pub dob: Option<NaiveDate>,
    pub password: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("dob", &self.dob)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// An email/password pair presented at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Date-of-birth wire format
// ---------------------------------------------------------------------------

/// Parses a date of birth as the directory sends it.
///
/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp (which
/// is truncated to its date). Returns `None` for anything else.
pub fn parse_dob(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

mod dob_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub(super) fn serialize<S>(
        dob: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dob {
            Some(date) => {
                serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
            }
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_dob(s).map(Some).ok_or_else(|| {
                de::Error::custom(format!("invalid date of birth {s:?}"))
            }),
        }
    }
}
