//! Session types: the client's belief about who is logged in.

use std::fmt;

use folio_directory::User;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`SessionStore`](crate::SessionStore).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Store key the logged-in user's snapshot is persisted under.
    ///
    /// Default: `"user"`.
    pub snapshot_key: String,

    /// Whether an action that settles after a newer action was dispatched
    /// should be thrown away.
    ///
    /// With `true` (the default), every action gets a sequence number and
    /// only the most recently dispatched one may change the session. A
    /// slow login that comes back after the user already pressed logout is
    /// dropped instead of logging them back in.
    ///
    /// With `false`, whichever action settles last wins, stale or not.
    pub discard_stale: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            snapshot_key: "user".to_string(),
            discard_stale: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The current session.
///
/// ```text
///   Unauthenticated ──login()──→ Authenticating ──success──→ Authenticated
///         ↑                           │                          │
///         │                        failure                       │
///         │                           ▼                          │
///         ├────────logout()──── AuthenticationFailed             │
///         │                           │                          │
///         │                        login()──→ Authenticating     │
///         └─────────────────────────logout()─────────────────────┘
///
///   (start) ──load_session()──→ Authenticated    snapshot present
///   (start) ──load_session()──→ Unauthenticated  snapshot absent/invalid
/// ```
///
/// There's no terminal state; the machine cycles for the life of the
/// process. The session holds its own copy of the [`User`], not a live
/// link to the remote record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// Nobody is logged in.
    #[default]
    Unauthenticated,

    /// A login is in flight.
    Authenticating,

    /// A user is logged in.
    Authenticated(User),

    /// The last login failed. Carries a message fit for showing the user.
    AuthenticationFailed(String),
}

impl Session {
    /// Returns the logged-in user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Returns `true` while a login is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Authenticating)
    }

    /// Returns the failure message of the last login, if it failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::AuthenticationFailed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Returns `true` if a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Unauthenticated"),
            Self::Authenticating => write!(f, "Authenticating"),
            Self::Authenticated(user) => write!(f, "Authenticated({})", user.id),
            Self::AuthenticationFailed(reason) => {
                write!(f, "AuthenticationFailed({reason})")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Settled
// ---------------------------------------------------------------------------

/// What a session action reports once it has settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    /// The action's sequence number (monotonic per store).
    pub seq: u64,

    /// `false` if a newer action had already been dispatched, so this
    /// action's result was discarded.
    pub applied: bool,

    /// The session as it stands right after settling.
    pub session: Session,
}
