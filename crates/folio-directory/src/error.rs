//! Error types for the directory layer.
//!
//! The remote service has no structured error taxonomy, so neither do we:
//! the variants only distinguish "couldn't talk to it", "it said no", and
//! "it said something we can't read".

/// Errors that can occur while talking to a user directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The request never produced a response (DNS, TLS, connection reset,
    /// timeout, ...).
    #[cfg(feature = "http")]
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The service answered with a non-2xx status code.
    #[error("request failed with status code {0}")]
    Status(u16),

    /// The response body isn't a record (or list of records) we recognise.
    ///
    /// Payloads that fail to parse into a [`User`](crate::User) stop here
    /// instead of leaking untyped JSON into the session layer.
    #[error("malformed directory response: {0}")]
    Malformed(String),

    /// The configured base URL doesn't parse.
    #[error("invalid directory base URL {0:?}")]
    InvalidBaseUrl(String),

    /// The directory is unreachable for a non-HTTP reason (used by
    /// [`InMemoryDirectory`](crate::InMemoryDirectory) to simulate outages).
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}
