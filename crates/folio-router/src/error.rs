//! Error types for the routing layer.

use crate::{Screen, ScreenSet};

/// Errors that can occur while navigating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    /// The screen isn't part of the active screen set (e.g. navigating to
    /// Home while logged out).
    #[error("screen {screen} is not reachable from the {set} screen set")]
    Unreachable { screen: Screen, set: ScreenSet },

    /// The session store being followed has been dropped.
    #[error("session store closed")]
    Closed,
}
