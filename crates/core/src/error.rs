//! Unified error model (§7 "Error Handling Design").
//!
//! The spec names error *kinds*, not concrete types: `Aborted`, `NotFound`,
//! `StoreFatal`, `InvalidUsage`. Those map directly onto the variants below.
//! `Io`/`Serialization` are ambient additions for the reference store
//! implementation (`tictoc_storage::memory`), which is not itself part of
//! the spec's scope but needs somewhere to report failures.

use std::io;
use thiserror::Error;

/// Result type alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds produced by the transactional core and its reference store.
#[derive(Debug, Error)]
pub enum Error {
    /// Validation failed at commit time; the transaction is terminal.
    ///
    /// Per spec §7: returned from `commit`, never from a lower-level call.
    #[error("transaction aborted: {0}")]
    Aborted(String),

    /// A lookup found no value for the key.
    ///
    /// Per spec §7: this is not an error condition for the transaction,
    /// which remains `Active` afterwards.
    #[error("key not found")]
    NotFound,

    /// The underlying store failed during the commit write phase (§4.4.3
    /// step 3). The transaction has already been validated and cannot be
    /// un-stamped, so this is unrecoverable without leaving a partial write.
    #[error("store write failed after commit validation: {0}")]
    StoreFatal(String),

    /// A programmer error such as an `Update` following a `Delete` on the
    /// same key within one transaction (§4.3 `local_write`).
    #[error("invalid transaction usage: {0}")]
    InvalidUsage(String),

    /// I/O failure in the reference store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Encoding/decoding failure in the tuple codec or reference store.
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl Error {
    /// True if this is a validation abort rather than a hard failure.
    ///
    /// Callers use this to decide whether retrying the whole transaction
    /// (not just the commit call) is sensible.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Error::Aborted(_))
    }

    /// True if this is the fatal, unrecoverable store-write-error kind.
    pub fn is_store_fatal(&self) -> bool {
        matches!(self, Error::StoreFatal(_))
    }
}
