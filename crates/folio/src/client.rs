//! `FolioClient` builder and the client itself.
//!
//! This is the entry point for an app embedding Folio. It ties together
//! all the layers: store → directory → session → router.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use folio_directory::{DirectoryConfig, DirectoryService, HttpDirectory, User};
use folio_router::Router;
use folio_session::{Session, SessionConfig, SessionStore, Settled};
use folio_store::{FileStore, KeyValueStore, MemoryStore, StoreError};
use tokio::sync::{Mutex, watch};

use crate::registration::register;
use crate::validation::{LoginForm, RegistrationForm};
use crate::FolioError;

/// Builder for a client talking to the REST directory.
///
/// # Example
///
/// ```rust,ignore
/// use folio::prelude::*;
///
/// let client = FolioClient::builder()
///     .data_dir("/var/lib/folio")
///     .timeout(Duration::from_secs(10))
///     .build_http()?;
/// client.start().await;
/// ```
pub struct FolioClientBuilder {
    directory: DirectoryConfig,
    session: SessionConfig,
    data_dir: Option<PathBuf>,
}

impl FolioClientBuilder {
    /// Creates a builder pointed at the hosted directory, with no data
    /// directory and default session settings.
    pub fn new() -> Self {
        Self {
            directory: DirectoryConfig::default(),
            session: SessionConfig::default(),
            data_dir: None,
        }
    }

    /// Sets the directory service root.
    pub fn base_url(mut self, url: &str) -> Self {
        self.directory.base_url = url.to_string();
        self
    }

    /// Sets a per-request timeout for directory calls.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.directory.timeout = Some(timeout);
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session = config;
        self
    }

    /// Persists the session snapshot as files under `path`.
    ///
    /// Without one, the snapshot is kept in memory and gone on restart.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Builds a client backed by [`HttpDirectory`].
    ///
    /// The session starts `Unauthenticated`; call
    /// [`start`](FolioClient::start) to restore a persisted one.
    pub fn build_http(
        self,
    ) -> Result<FolioClient<AnyStore, HttpDirectory>, FolioError> {
        let store = match self.data_dir {
            Some(path) => AnyStore::File(FileStore::new(path)?),
            None => AnyStore::Memory(MemoryStore::new()),
        };
        let directory = HttpDirectory::new(self.directory)?;
        Ok(FolioClient::new(store, directory, self.session))
    }
}

impl Default for FolioClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The store picked by [`FolioClientBuilder::build_http`].
#[derive(Debug, Clone)]
pub enum AnyStore {
    File(FileStore),
    Memory(MemoryStore),
}

impl KeyValueStore for AnyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Self::File(store) => store.get(key).await,
            Self::Memory(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            Self::File(store) => store.set(key, value).await,
            Self::Memory(store) => store.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match self {
            Self::File(store) => store.remove(key).await,
            Self::Memory(store) => store.remove(key).await,
        }
    }
}

// ---------------------------------------------------------------------------
// FolioClient
// ---------------------------------------------------------------------------

/// A Folio client: one session plus the flows that change it.
///
/// Cheap to share: wrap it in an `Arc` and hand it to every screen.
pub struct FolioClient<S: KeyValueStore, D: DirectoryService> {
    sessions: Arc<SessionStore<S, D>>,

    /// Held for the whole check-then-create of a registration.
    registering: Mutex<()>,
}

impl FolioClient<AnyStore, HttpDirectory> {
    /// Creates a new builder.
    pub fn builder() -> FolioClientBuilder {
        FolioClientBuilder::new()
    }
}

impl<S: KeyValueStore, D: DirectoryService> FolioClient<S, D> {
    /// Creates a client from explicit parts.
    pub fn new(store: S, directory: D, config: SessionConfig) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new(store, directory, config)),
            registering: Mutex::new(()),
        }
    }

    /// Restores the persisted session. Call once at launch.
    pub async fn start(&self) -> Settled {
        tracing::info!("Folio client starting");
        self.sessions.load_session().await
    }

    /// Validates `form` and logs in.
    ///
    /// A rejected form returns an error without dispatching anything, so
    /// the session is left as it was. Otherwise the outcome is in the
    /// returned [`Settled`]; a failed login is not an `Err`.
    pub async fn login(&self, form: &LoginForm) -> Result<Settled, FolioError> {
        let credentials = form.validate()?;
        Ok(self.sessions.login(credentials).await)
    }

    /// Logs out. Always ends `Unauthenticated`.
    pub async fn logout(&self) -> Settled {
        self.sessions.logout().await
    }

    /// Registers a new account.
    ///
    /// Registrations through the same client run one at a time, so a
    /// double-submitted form can't create the account twice.
    pub async fn register(
        &self,
        form: &RegistrationForm,
        today: NaiveDate,
    ) -> Result<User, FolioError> {
        let _guard = self.registering.lock().await;
        Ok(register(self.sessions.directory(), form, today).await?)
    }

    /// Returns a copy of the current session.
    pub fn session(&self) -> Session {
        self.sessions.session()
    }

    /// Returns a receiver that observes every session transition.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.sessions.subscribe()
    }

    /// Returns a router seeded from the current session.
    pub fn router(&self) -> Router {
        Router::from_session(&self.sessions.session())
    }

    /// Returns the underlying session store.
    pub fn session_store(&self) -> &Arc<SessionStore<S, D>> {
        &self.sessions
    }
}
