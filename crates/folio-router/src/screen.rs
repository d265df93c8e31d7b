//! Screens and the sets they're grouped into.

use std::fmt;

use folio_session::Session;

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// A screen the app can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Register,
    Home,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "Login"),
            Self::Register => write!(f, "Register"),
            Self::Home => write!(f, "Home"),
        }
    }
}

// ---------------------------------------------------------------------------
// ScreenSet
// ---------------------------------------------------------------------------

/// A group of screens reachable together.
///
/// - **Auth**: shown while nobody is logged in. Root: Login.
/// - **App**: shown while a user is logged in. Root: Home.
///
/// Only one set is active at a time; switching sets throws away the
/// navigation stack of the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenSet {
    Auth,
    App,
}

impl ScreenSet {
    /// Picks the set for a session: `App` iff it holds a user.
    ///
    /// `Authenticating` and `AuthenticationFailed` keep the Auth set, so
    /// the login screen stays up while a login is pending or after it
    /// failed.
    pub fn for_session(session: &Session) -> Self {
        if session.user().is_some() {
            Self::App
        } else {
            Self::Auth
        }
    }

    /// The screen a freshly entered set starts on.
    pub fn root(self) -> Screen {
        match self {
            Self::Auth => Screen::Login,
            Self::App => Screen::Home,
        }
    }

    /// Every screen in this set, root first.
    pub fn screens(self) -> &'static [Screen] {
        match self {
            Self::Auth => &[Screen::Login, Screen::Register],
            Self::App => &[Screen::Home],
        }
    }

    /// Returns `true` if `screen` belongs to this set.
    pub fn contains(self, screen: Screen) -> bool {
        self.screens().contains(&screen)
    }
}

impl fmt::Display for ScreenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth => write!(f, "Auth"),
            Self::App => write!(f, "App"),
        }
    }
}
