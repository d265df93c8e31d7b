//! The session store: owns the current [`Session`] and runs the actions
//! that change it.
//!
//! # Concurrency note
//!
//! Actions are not queued and can't be cancelled. Several may be in
//! flight at once (a slow login still pending when logout is pressed).
//! Each action takes a sequence number the moment it's dispatched; when
//! [`SessionConfig::discard_stale`] is on, only the latest-dispatched
//! action may publish its result. Snapshot writes and removals are
//! additionally ordered by `persist_lock`, so a superseded login can't
//! write the snapshot back after a logout has removed it.
//!
//! With `discard_stale` off, the last action to *settle* wins.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use folio_directory::{Credentials, DirectoryService, User};
use folio_store::KeyValueStore;
use tokio::sync::{Mutex, watch};

use crate::{
    Session, SessionConfig, SessionError, Settled, decode_snapshot,
    encode_snapshot,
};

/// Owns the process's session.
///
/// There is exactly one session value per store, published through a
/// `watch` channel: [`subscribe`](Self::subscribe) to be told about every
/// transition, or call [`session`](Self::session) for the current value.
///
/// Pass the store (usually in an `Arc`) to whatever needs it; there is no
/// global instance.
///
/// ## Actions
///
/// Each action is dispatched by calling the method and settles when the
/// returned future completes:
///
/// ```text
/// load_session()  read snapshot   → Authenticated | Unauthenticated
/// login(creds)    Authenticating  → Authenticated | AuthenticationFailed
/// logout()        remove snapshot → Unauthenticated
/// ```
pub struct SessionStore<S: KeyValueStore, D: DirectoryService> {
    store: S,
    directory: D,
    config: SessionConfig,

    /// Publishes the current session to subscribers.
    state: watch::Sender<Session>,

    /// Highest sequence number handed out so far.
    issued: AtomicU64,

    /// Orders snapshot writes (login) against removals (logout).
    persist_lock: Mutex<()>,
}

impl<S: KeyValueStore, D: DirectoryService> SessionStore<S, D> {
    /// Creates a store in the `Unauthenticated` state.
    ///
    /// Nothing is read from `store` until [`load_session`](Self::load_session)
    /// is called.
    pub fn new(store: S, directory: D, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(Session::Unauthenticated);
        Self {
            store,
            directory,
            config,
            state,
            issued: AtomicU64::new(0),
            persist_lock: Mutex::new(()),
        }
    }

    /// Returns a copy of the current session.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Returns a receiver that observes every session transition.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Returns the store's configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the key-value store holding the snapshot.
    pub fn key_value_store(&self) -> &S {
        &self.store
    }

    /// Returns the directory used for logins.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    // -- Actions ----------------------------------------------------------

    /// Restores the session from the persisted snapshot.
    ///
    /// A snapshot that's present and parses gives `Authenticated`; one
    /// that's absent, malformed, or unreadable gives `Unauthenticated`.
    /// Never fails. Calling it twice in a row gives the same result.
    pub fn load_session(&self) -> impl Future<Output = Settled> + Send + '_ {
        let seq = self.issue();
        async move {
            let next = match self.store.get(&self.config.snapshot_key).await {
                Ok(Some(raw)) => match decode_snapshot(&raw) {
                    Some(user) => Session::Authenticated(user),
                    None => {
                        tracing::warn!(
                            key = %self.config.snapshot_key,
                            "ignoring malformed session snapshot"
                        );
                        Session::Unauthenticated
                    }
                },
                Ok(None) => Session::Unauthenticated,
                Err(e) => {
                    tracing::warn!(error = %e, "could not read session snapshot");
                    Session::Unauthenticated
                }
            };

            let settled = self.apply(seq, next);
            tracing::info!(seq, session = %settled.session, "session loaded");
            settled
        }
    }

    /// Logs in with the given credentials.
    ///
    /// The session becomes `Authenticating` before this method returns,
    /// i.e. before anything is awaited. The returned future then looks the
    /// credentials up in the directory:
    ///
    /// - a match persists the user as the snapshot (overwriting any
    ///   previous one) and settles `Authenticated`;
    /// - no match settles `AuthenticationFailed("Invalid credentials")`
    ///   and leaves the snapshot untouched;
    /// - a directory or store failure settles `AuthenticationFailed` with
    ///   that failure's message.
    ///
    /// Nothing is retried, and credentials aren't validated here; reject
    /// empty fields before calling.
    pub fn login(
        &self,
        credentials: Credentials,
    ) -> impl Future<Output = Settled> + Send + '_ {
        let seq = self.issue();
        self.apply(seq, Session::Authenticating);
        tracing::info!(seq, email = %credentials.email, "login started");

        async move {
            let next = match self.directory.find_by_credentials(&credentials).await {
                Ok(Some(user)) => match self.persist(seq, &user).await {
                    Ok(true) => Session::Authenticated(user),
                    Ok(false) => return self.superseded(seq),
                    Err(e) => {
                        tracing::warn!(seq, error = %e, "could not persist session");
                        Session::AuthenticationFailed(e.to_string())
                    }
                },
                Ok(None) => Session::AuthenticationFailed(
                    SessionError::InvalidCredentials.to_string(),
                ),
                Err(e) => {
                    let e = SessionError::from(e);
                    tracing::warn!(seq, error = %e, "login lookup failed");
                    Session::AuthenticationFailed(e.to_string())
                }
            };

            let settled = self.apply(seq, next);
            tracing::info!(
                seq,
                applied = settled.applied,
                session = %settled.session,
                "login settled"
            );
            settled
        }
    }

    /// Logs out.
    ///
    /// Removes the snapshot, then sets `Unauthenticated`. If the removal
    /// fails the failure is logged and the session is still cleared: the
    /// in-memory logout is authoritative.
    pub fn logout(&self) -> impl Future<Output = Settled> + Send + '_ {
        let seq = self.issue();
        async move {
            {
                let _guard = self.persist_lock.lock().await;
                if let Err(e) = self.store.remove(&self.config.snapshot_key).await {
                    tracing::warn!(
                        seq,
                        error = %e,
                        "could not remove session snapshot, logging out anyway"
                    );
                }
            }

            let settled = self.apply(seq, Session::Unauthenticated);
            tracing::info!(seq, applied = settled.applied, "logged out");
            settled
        }
    }

    // -- Internals --------------------------------------------------------

    /// Hands out the next sequence number.
    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns `true` if the action `seq` may still change the session.
    fn is_current(&self, seq: u64) -> bool {
        !self.config.discard_stale || self.issued.load(Ordering::SeqCst) == seq
    }

    /// Publishes `next` unless action `seq` has been superseded.
    ///
    /// The check and the write happen under the watch channel's lock, so
    /// no subscriber ever sees a half-applied transition.
    fn apply(&self, seq: u64, next: Session) -> Settled {
        let mut applied = false;
        self.state.send_if_modified(|current| {
            if !self.is_current(seq) {
                return false;
            }
            applied = true;
            if *current == next {
                return false;
            }
            *current = next;
            true
        });

        if !applied {
            tracing::debug!(seq, "discarding stale session result");
        }
        Settled {
            seq,
            applied,
            session: self.session(),
        }
    }

    fn superseded(&self, seq: u64) -> Settled {
        tracing::debug!(seq, "login superseded before persisting");
        Settled {
            seq,
            applied: false,
            session: self.session(),
        }
    }

    /// Writes the snapshot for a successful login.
    ///
    /// Returns `Ok(false)` without writing if the login was superseded.
    async fn persist(&self, seq: u64, user: &User) -> Result<bool, SessionError> {
        let raw = encode_snapshot(user)?;
        let _guard = self.persist_lock.lock().await;
        if !self.is_current(seq) {
            return Ok(false);
        }
        self.store.set(&self.config.snapshot_key, &raw).await?;
        Ok(true)
    }
}

// =========================================================================
// Tests
// =========================================================================
