//! Store errors.

use std::io;

use thiserror::Error;

/// Failure of the local store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("local storage i/o error")]
    Io(#[from] io::Error),

    /// Stored content could not be encoded.
    #[error("failed to encode local storage")]
    Encode(#[from] serde_json::Error),

    /// A writer panicked while holding the store lock.
    #[error("local storage lock poisoned")]
    Poisoned,
}
