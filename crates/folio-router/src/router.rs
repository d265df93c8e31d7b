//! The router: active screen set plus a navigation stack inside it.

use folio_session::Session;
use tokio::sync::watch;

use crate::{RouterError, Screen, ScreenSet};

/// Tracks which screen is showing.
///
/// ## Lifecycle
///
/// ```text
/// from_session() ──→ [Auth: Login] ──navigate(Register)──→ [Auth: Login, Register]
///                         │                                        │
///                         └──────── session gains a user ──────────┘
///                                           │
///                                           ▼
///                                     [App: Home] ──session loses user──→ [Auth: Login]
/// ```
///
/// Screens navigate freely inside the active set. Leaving the set is
/// never a navigation call: it happens only when the followed session
/// changes.
#[derive(Debug, Clone)]
pub struct Router {
    set: ScreenSet,
    /// Root first, current screen last. Never empty.
    stack: Vec<Screen>,
}

impl Router {
    /// Creates a router positioned at the root of the set for `session`.
    pub fn from_session(session: &Session) -> Self {
        let set = ScreenSet::for_session(session);
        Self {
            set,
            stack: vec![set.root()],
        }
    }

    /// The active screen set.
    pub fn screen_set(&self) -> ScreenSet {
        self.set
    }

    /// The screen on top of the stack.
    pub fn current(&self) -> Screen {
        // The stack always holds at least the set's root.
        self.stack.last().copied().unwrap_or_else(|| self.set.root())
    }

    /// The navigation stack, root first.
    pub fn stack(&self) -> &[Screen] {
        &self.stack
    }

    /// Reacts to a session value.
    ///
    /// If the session calls for a different screen set, switches to it,
    /// resets the stack to the new set's root, and returns the new set.
    /// Otherwise does nothing and returns `None`.
    pub fn observe(&mut self, session: &Session) -> Option<ScreenSet> {
        let target = ScreenSet::for_session(session);
        if target == self.set {
            return None;
        }
        tracing::info!(from = %self.set, to = %target, "switching screen set");
        self.set = target;
        self.stack.clear();
        self.stack.push(target.root());
        Some(target)
    }

    /// Waits for the next session change and applies it.
    ///
    /// Returns the new screen set if the change switched sets.
    ///
    /// # Errors
    /// Returns [`RouterError::Closed`] once the session store is dropped.
    pub async fn follow(
        &mut self,
        sessions: &mut watch::Receiver<Session>,
    ) -> Result<Option<ScreenSet>, RouterError> {
        sessions.changed().await.map_err(|_| RouterError::Closed)?;
        let session = sessions.borrow_and_update().clone();
        Ok(self.observe(&session))
    }

    /// Pushes `screen` on top of the stack.
    ///
    /// # Errors
    /// Returns [`RouterError::Unreachable`] if `screen` isn't in the active set.
    pub fn navigate(&mut self, screen: Screen) -> Result<(), RouterError> {
        self.check_reachable(screen)?;
        if self.current() != screen {
            self.stack.push(screen);
        }
        tracing::debug!(%screen, "navigated");
        Ok(())
    }

    /// Replaces the top of the stack with `screen`.
    ///
    /// Replacing the root makes `screen` the new root.
    ///
    /// # Errors
    /// Returns [`RouterError::Unreachable`] if `screen` isn't in the active set.
    pub fn replace(&mut self, screen: Screen) -> Result<(), RouterError> {
        self.check_reachable(screen)?;
        self.stack.pop();
        self.stack.push(screen);
        tracing::debug!(%screen, "replaced current screen");
        Ok(())
    }

    /// Pops the current screen. The root is never popped.
    ///
    /// Returns `true` if the router moved.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    fn check_reachable(&self, screen: Screen) -> Result<(), RouterError> {
        if self.set.contains(screen) {
            Ok(())
        } else {
            Err(RouterError::Unreachable {
                screen,
                set: self.set,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_directory::{User, UserId};

    fn authenticated() -> Session {
        Session::Authenticated(User::new(UserId::Number(1), "a@x.com"))
    }

    #[test]
    fn test_from_session_starts_at_set_root() {
        let logged_out = Router::from_session(&Session::Unauthenticated);
        let logged_in = Router::from_session(&authenticated());

        assert_eq!(logged_out.current(), Screen::Login);
        assert_eq!(logged_in.current(), Screen::Home);
        assert_eq!(logged_in.screen_set(), ScreenSet::App);
    }

    #[test]
    fn test_navigate_within_set_pushes() {
        let mut router = Router::from_session(&Session::Unauthenticated);

        router.navigate(Screen::Register).unwrap();

        assert_eq!(router.stack(), &[Screen::Login, Screen::Register]);
    }

    #[test]
    fn test_navigate_to_current_screen_is_noop() {
        let mut router = Router::from_session(&Session::Unauthenticated);

        router.navigate(Screen::Login).unwrap();

        assert_eq!(router.stack(), &[Screen::Login]);
    }

    #[test]
    fn test_navigate_outside_set_is_rejected() {
        let mut router = Router::from_session(&Session::Unauthenticated);

        let result = router.navigate(Screen::Home);

        assert_eq!(
            result,
            Err(RouterError::Unreachable {
                screen: Screen::Home,
                set: ScreenSet::Auth,
            })
        );
        assert_eq!(router.current(), Screen::Login);
    }

    #[test]
    fn test_replace_swaps_top() {
        let mut router = Router::from_session(&Session::Unauthenticated);
        router.navigate(Screen::Register).unwrap();

        router.replace(Screen::Login).unwrap();

        assert_eq!(router.stack(), &[Screen::Login, Screen::Login]);
    }

    #[test]
    fn test_replace_outside_set_is_rejected() {
        let mut router = Router::from_session(&authenticated());

        assert!(router.replace(Screen::Login).is_err());
        assert_eq!(router.stack(), &[Screen::Home]);
    }

    #[test]
    fn test_back_never_pops_root() {
        let mut router = Router::from_session(&Session::Unauthenticated);
        router.navigate(Screen::Register).unwrap();

        assert!(router.back());
        assert!(!router.back());
        assert_eq!(router.current(), Screen::Login);
    }

    #[test]
    fn test_observe_login_switches_to_app_and_resets_stack() {
        let mut router = Router::from_session(&Session::Unauthenticated);
        router.navigate(Screen::Register).unwrap();

        let switched = router.observe(&authenticated());

        assert_eq!(switched, Some(ScreenSet::App));
        assert_eq!(router.stack(), &[Screen::Home]);
    }

    #[test]
    fn test_observe_pending_and_failed_logins_stay_put() {
        let mut router = Router::from_session(&Session::Unauthenticated);
        router.navigate(Screen::Register).unwrap();

        assert_eq!(router.observe(&Session::Authenticating), None);
        assert_eq!(
            router.observe(&Session::AuthenticationFailed("no".into())),
            None
        );
        assert_eq!(router.current(), Screen::Register);
    }

    #[test]
    fn test_observe_logout_returns_to_login() {
        let mut router = Router::from_session(&authenticated());

        let switched = router.observe(&Session::Unauthenticated);

        assert_eq!(switched, Some(ScreenSet::Auth));
        assert_eq!(router.current(), Screen::Login);
    }
}
