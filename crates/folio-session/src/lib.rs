//! Client session management for Folio.
//!
//! This crate answers one question for the rest of the app: *who, if
//! anyone, is logged in right now?*
//!
//! 1. **State** — the [`Session`] state machine (unauthenticated,
//!    authenticating, authenticated, failed)
//! 2. **Actions** — [`SessionStore::load_session`], [`SessionStore::login`],
//!    [`SessionStore::logout`], each an async unit of work
//! 3. **Persistence** — the logged-in user survives restarts as a JSON
//!    snapshot in a [`KeyValueStore`](folio_store::KeyValueStore)
//!
//! # How it fits in the stack
//!
//! ```text
//! Router / Facade (above)  ← observe the session, dispatch actions
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Store + Directory (below) ← snapshot persistence, credential lookup
//! ```

mod error;
mod session;
mod snapshot;
mod store;

pub use error::SessionError;
pub use session::{Session, SessionConfig, Settled};
pub use snapshot::{decode_snapshot, encode_snapshot};
pub use store::SessionStore;
