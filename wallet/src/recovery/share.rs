//! Share and configuration types.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::error::ShamirError;
use crate::config::MIN_THRESHOLD;

/// Configuration for Shamir's Secret Sharing.
///
/// Any `threshold` of the `total` shares reconstruct the secret;
/// `threshold - 1` shares reveal nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShamirConfig {
    threshold: u8,
    total: u8,
}

impl ShamirConfig {
    /// Create a new configuration, validating the parameters.
    ///
    /// # Constraints
    ///
    /// - `threshold >= 2` (1-of-n is just copying)
    /// - `total >= threshold`
    /// - `total <= 255` holds by construction: indices are non-zero bytes
    pub fn new(threshold: u8, total: u8) -> Result<Self, ShamirError> {
        if threshold < MIN_THRESHOLD {
            return Err(ShamirError::ThresholdTooLow(threshold));
        }
        if total < threshold {
            return Err(ShamirError::ThresholdExceedsTotal { threshold, total });
        }
        Ok(Self { threshold, total })
    }

    /// Minimum number of shares required to reconstruct the secret.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Total number of shares generated.
    pub fn total(&self) -> u8 {
        self.total
    }
}

/// A single share of a split secret.
///
/// Each share has a unique index (1-255) and a data vector the same length
/// as the original secret, and remembers the policy it was issued under.
/// Share data is wiped when the share is dropped and never printed by
/// `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RecoveryShare {
    /// The x-coordinate of this share's evaluation point (1-based).
    pub index: u8,
    /// Shares needed to reconstruct.
    pub threshold: u8,
    /// Shares issued by the split.
    pub total: u8,
    /// One byte per byte of the original secret.
    pub data: Vec<u8>,
}

impl RecoveryShare {
    /// Assemble a share from its parts. No validation; reconstruction and
    /// decoding check consistency.
    pub fn new(index: u8, threshold: u8, total: u8, data: Vec<u8>) -> Self {
        Self {
            index,
            threshold,
            total,
            data,
        }
    }

    /// Length of the secret this share belongs to.
    pub fn secret_len(&self) -> usize {
        self.data.len()
    }
}

impl fmt::Debug for RecoveryShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoveryShare")
            .field("index", &self.index)
            .field("threshold", &self.threshold)
            .field("total", &self.total)
            .field("data", &format_args!("<{} bytes redacted>", self.data.len()))
            .finish()
    }
}
