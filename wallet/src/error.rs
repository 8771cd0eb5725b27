//! Crate-level error type.
//!
//! Each module reports failures in its own vocabulary ([`ShamirError`],
//! [`CodecError`], [`SealingError`], [`StoreError`]). [`WalletError`] is what
//! the facade returns, and [`ErrorKind`] is the coarse classification the
//! application layer branches on.

use thiserror::Error;

use crate::crypto::SealingError;
use crate::identity::IdentityError;
use crate::recovery::{CodecError, ShamirError};
use crate::storage::StoreError;

/// Coarse failure classes exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad threshold/total, empty secret, malformed identity, unusable KDF settings.
    InvalidParameters,
    /// Fewer shares than the threshold.
    InsufficientShares,
    /// Shares disagree on threshold, total, length, or carry bad/duplicate indices.
    InconsistentShares,
    /// A share string failed to decode.
    MalformedShare,
    /// Wrong passphrase or tampered ciphertext.
    DecryptionFailed,
    /// The store could not be opened, read, or written.
    StorageUnavailable,
    /// Unknown DID or credential id.
    NotFound,
    /// The operation needs an unlocked identity.
    Locked,
}

/// Errors returned by [`WalletFacade`](crate::vault::WalletFacade).
#[derive(Debug, Error)]
pub enum WalletError {
    /// Secret splitting or reconstruction failed.
    #[error(transparent)]
    Shamir(#[from] ShamirError),

    /// A share string could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Private key sealing or unsealing failed.
    #[error(transparent)]
    Sealing(#[from] SealingError),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The identity handed in is unusable (bad DID syntax, empty key).
    #[error("invalid identity: {0}")]
    InvalidIdentity(#[from] IdentityError),

    /// The credential handed in can't be stored (no id).
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// The requested record doesn't exist.
    #[error("{what} not found: {key}")]
    NotFound {
        /// Record type, e.g. "identity" or "credential".
        what: &'static str,
        /// The key that was looked up.
        key: String,
    },

    /// `initialize()` hasn't been called, or the wallet was closed.
    #[error("wallet not initialized")]
    NotInitialized,

    /// The operation requires an unlocked identity.
    #[error("wallet is locked")]
    Locked,
}

impl WalletError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::Shamir(e) => e.kind(),
            WalletError::Codec(_) => ErrorKind::MalformedShare,
            WalletError::Sealing(e) => match e {
                SealingError::DecryptionFailed => ErrorKind::DecryptionFailed,
                SealingError::InvalidParameters(_) | SealingError::EncryptFailed => {
                    ErrorKind::InvalidParameters
                }
            },
            WalletError::Store(e) => e.kind(),
            WalletError::InvalidIdentity(_) | WalletError::InvalidCredential(_) => {
                ErrorKind::InvalidParameters
            }
            WalletError::NotFound { .. } => ErrorKind::NotFound,
            WalletError::NotInitialized => ErrorKind::StorageUnavailable,
            WalletError::Locked => ErrorKind::Locked,
        }
    }
}

/// Shorthand used throughout the facade.
pub type WalletResult<T> = Result<T, WalletError>;
