/// Errors that can occur in the store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be used by this store (empty, or contains
    /// characters the backend can't represent).
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),

    /// The store is not usable right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
