//! # Folio
//!
//! Client-side session management for a mobile photo app.
//!
//! Folio keeps one belief about who is logged in, persists it across
//! restarts, checks credentials against a remote user directory, and
//! decides which set of screens the app may show. The layers:
//!
//! | crate             | role                                          |
//! |-------------------|-----------------------------------------------|
//! | `folio-store`     | string key-value persistence                  |
//! | `folio-directory` | user model and the remote directory client    |
//! | `folio-session`   | the session state machine and its actions     |
//! | `folio-router`    | auth/app screen sets gated by the session     |
//! | `folio`           | forms, registration, gallery, and this facade |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use folio::prelude::*;
//!
//! # async fn run() -> Result<(), FolioError> {
//! let client = FolioClient::builder()
//!     .data_dir("./folio-data")
//!     .build_http()?;
//!
//! client.start().await;
//! if !client.session().is_authenticated() {
//!     client.login(&LoginForm::new("a@x.com", "pw")).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
pub mod gallery;
pub mod registration;
pub mod validation;

pub use client::{AnyStore, FolioClient, FolioClientBuilder};
pub use error::FolioError;

// Sub-crates, for code that needs more than the prelude.
pub use folio_directory as directory;
pub use folio_router as router;
pub use folio_session as session;
pub use folio_store as store;

pub mod prelude {
    //! Common imports for apps embedding Folio.

    pub use crate::gallery::{
        Gallery, ImagePicker, PickedAsset, PickerOptions, PickerResponse,
        greeting,
    };
    pub use crate::registration::RegistrationError;
    pub use crate::validation::{LoginForm, RegistrationForm, ValidationError};
    pub use crate::{FolioClient, FolioClientBuilder, FolioError};
    pub use folio_directory::{
        Credentials, DirectoryService, HttpDirectory, InMemoryDirectory, User,
        UserId,
    };
    pub use folio_router::{Router, Screen, ScreenSet};
    pub use folio_session::{Session, SessionConfig, Settled};
    pub use folio_store::{FileStore, KeyValueStore, MemoryStore};
}
