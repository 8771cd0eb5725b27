//! Error types for secret splitting and reconstruction.

use thiserror::Error;

use crate::crypto::gf256::FieldError;
use crate::error::ErrorKind;

/// Errors that can occur during secret sharing operations.
#[derive(Debug, Error)]
pub enum ShamirError {
    /// The threshold must be at least 2 (1-of-n is just copies).
    #[error("threshold must be >= 2, got {0}")]
    ThresholdTooLow(u8),

    /// The number of shares must be at least equal to the threshold.
    #[error("total shares ({total}) must be >= threshold ({threshold})")]
    ThresholdExceedsTotal {
        /// The requested threshold.
        threshold: u8,
        /// The requested total.
        total: u8,
    },

    /// The secret is empty; nothing to split.
    #[error("secret must not be empty")]
    EmptySecret,

    /// Reconstruction was called with no shares at all.
    #[error("no shares provided")]
    NoShares,

    /// Fewer shares than the threshold. Reconstructing anyway would return
    /// garbage that looks exactly like a key, so we refuse.
    #[error("need {required} shares for reconstruction, got {provided}")]
    InsufficientShares {
        /// Threshold recorded in the shares.
        required: u8,
        /// Number of shares supplied.
        provided: usize,
    },

    /// The shares' own header is impossible (threshold < 2 or total < threshold).
    #[error("share carries invalid parameters: threshold {threshold}, total {total}")]
    InvalidShareParameters {
        /// Threshold recorded in the share.
        threshold: u8,
        /// Total recorded in the share.
        total: u8,
    },

    /// A share disagrees with the first share on threshold or total.
    #[error("share {index} was produced by a different split (threshold/total mismatch)")]
    ParameterMismatch {
        /// Index of the offending share.
        index: u8,
    },

    /// Shares have inconsistent data lengths.
    #[error("share data lengths are inconsistent: expected {expected}, got {got}")]
    LengthMismatch {
        /// Expected length from the first share.
        expected: usize,
        /// Actual length of the offending share.
        got: usize,
    },

    /// Shares carry no data.
    #[error("shares carry no data")]
    EmptyShare,

    /// Index 0 is the secret itself; indices above `total` were never issued.
    #[error("share index {index} is outside 1..={total}")]
    InvalidShareIndex {
        /// The offending index.
        index: u8,
        /// Total recorded in the share.
        total: u8,
    },

    /// Duplicate share indices were provided.
    #[error("duplicate share index: {0}")]
    DuplicateShareIndex(u8),

    /// Field arithmetic failed. Validation above should make this unreachable.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl ShamirError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShamirError::ThresholdTooLow(_)
            | ShamirError::ThresholdExceedsTotal { .. }
            | ShamirError::EmptySecret
            | ShamirError::Field(_) => ErrorKind::InvalidParameters,
            ShamirError::NoShares | ShamirError::InsufficientShares { .. } => {
                ErrorKind::InsufficientShares
            }
            ShamirError::InvalidShareParameters { .. }
            | ShamirError::ParameterMismatch { .. }
            | ShamirError::LengthMismatch { .. }
            | ShamirError::EmptyShare
            | ShamirError::InvalidShareIndex { .. }
            | ShamirError::DuplicateShareIndex(_) => ErrorKind::InconsistentShares,
        }
    }
}
