//! Session-gated routing for Folio.
//!
//! The app has two screen sets and the session decides which one is
//! reachable:
//!
//! ```text
//!   Session has a user?   no  → Auth set: Login ⇄ Register
//!                         yes → App set:  Home
//! ```
//!
//! The router doesn't render anything. It tracks which set is active and
//! the navigation stack inside it, and switches sets whenever the session
//! it follows gains or loses a user.

mod error;
mod router;
mod screen;

pub use error::RouterError;
pub use router::Router;
pub use screen::{Screen, ScreenSet};
