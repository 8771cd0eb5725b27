//! Text encoding for recovery shares, plus the recovery-kit export document.
//!
//! A share travels as standard padded base64 over this byte layout:
//!
//! ```text
//! version   u8        SHARE_CODEC_VERSION
//! index     u8
//! length    u16 BE
//! payload   [u8; length]
//! threshold u8
//! total     u8
//! checksum  [u8; 4]   blake3(everything above)[..4]
//! ```
//!
//! The checksum catches transcription errors (a mistyped character on a
//! printed share), not tampering.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use super::share::RecoveryShare;
use crate::config::{MIN_THRESHOLD, SHARE_CHECKSUM_LENGTH, SHARE_CODEC_VERSION};
use crate::error::WalletResult;

/// Fixed bytes around the payload: version, index, length, threshold, total, checksum.
const FRAME_OVERHEAD: usize = 1 + 1 + 2 + 1 + 1 + SHARE_CHECKSUM_LENGTH;

/// Reasons a share string can't be decoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Not valid standard base64.
    #[error("share is not valid base64")]
    InvalidBase64,

    /// Version byte we don't understand.
    #[error("unsupported share version {0:#04x}")]
    UnsupportedVersion(u8),

    /// Shorter than the header or than the declared payload.
    #[error("share is truncated")]
    Truncated,

    /// Bytes left over after the checksum.
    #[error("share has {0} unexpected trailing bytes")]
    TrailingBytes(usize),

    /// Declared payload length of zero.
    #[error("share payload is empty")]
    EmptyPayload,

    /// Payload longer than the length field can express.
    #[error("share payload of {0} bytes is too large to encode")]
    PayloadTooLarge(usize),

    /// Checksum doesn't match; the string was mistyped or damaged.
    #[error("share checksum mismatch")]
    ChecksumMismatch,

    /// Header decodes but describes a share no split could have produced.
    #[error("share header is invalid: index {index}, threshold {threshold}, total {total}")]
    InvalidHeader {
        /// Decoded index.
        index: u8,
        /// Decoded threshold.
        threshold: u8,
        /// Decoded total.
        total: u8,
    },

    /// The recovery kit document is not valid JSON of the expected shape,
    /// or its header disagrees with its shares.
    #[error("recovery kit is malformed: {0}")]
    InvalidKit(String),
}

fn checksum(bytes: &[u8]) -> [u8; SHARE_CHECKSUM_LENGTH] {
    let digest = blake3::hash(bytes);
    let mut out = [0u8; SHARE_CHECKSUM_LENGTH];
    out.copy_from_slice(&digest.as_bytes()[..SHARE_CHECKSUM_LENGTH]);
    out
}

/// Encode a share as a printable string.
///
/// # Errors
///
/// [`CodecError::PayloadTooLarge`] when the share carries more than
/// `u16::MAX` bytes.
pub fn encode_share(share: &RecoveryShare) -> Result<String, CodecError> {
    let len = u16::try_from(share.data.len())
        .map_err(|_| CodecError::PayloadTooLarge(share.data.len()))?;

    let mut buf = Zeroizing::new(Vec::with_capacity(FRAME_OVERHEAD + share.data.len()));
    buf.push(SHARE_CODEC_VERSION);
    buf.push(share.index);
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(&share.data);
    buf.push(share.threshold);
    buf.push(share.total);
    let sum = checksum(&buf);
    buf.extend_from_slice(&sum);

    Ok(STANDARD.encode(buf.as_slice()))
}

/// Decode a share string produced by [`encode_share`].
///
/// Surrounding whitespace is ignored, so shares pasted from a file or
/// terminal decode as-is.
pub fn decode_share(encoded: &str) -> Result<RecoveryShare, CodecError> {
    let bytes = Zeroizing::new(
        STANDARD
            .decode(encoded.trim())
            .map_err(|_| CodecError::InvalidBase64)?,
    );

    let version = *bytes.first().ok_or(CodecError::Truncated)?;
    if version != SHARE_CODEC_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }
    if bytes.len() < FRAME_OVERHEAD {
        return Err(CodecError::Truncated);
    }

    let len = u16::from_be_bytes([bytes[2], bytes[3]]) as usize;
    let expected = FRAME_OVERHEAD + len;
    if bytes.len() < expected {
        return Err(CodecError::Truncated);
    }
    if bytes.len() > expected {
        return Err(CodecError::TrailingBytes(bytes.len() - expected));
    }

    let (body, sum) = bytes.split_at(expected - SHARE_CHECKSUM_LENGTH);
    if checksum(body).as_slice() != sum {
        return Err(CodecError::ChecksumMismatch);
    }
    if len == 0 {
        return Err(CodecError::EmptyPayload);
    }

    let index = bytes[1];
    let payload = &bytes[4..4 + len];
    let threshold = bytes[4 + len];
    let total = bytes[5 + len];

    if index == 0 || threshold < MIN_THRESHOLD || total < threshold || index > total {
        return Err(CodecError::InvalidHeader {
            index,
            threshold,
            total,
        });
    }

    Ok(RecoveryShare::new(index, threshold, total, payload.to_vec()))
}

/// Decode a batch of share strings, stopping at the first bad one.
pub fn decode_shares<S: AsRef<str>>(encoded: &[S]) -> Result<Vec<RecoveryShare>, CodecError> {
    encoded.iter().map(|s| decode_share(s.as_ref())).collect()
}

/// A downloadable bundle of encoded shares for one identity.
///
/// This is what a user saves or prints when backing up a wallet: the DID the
/// shares belong to, the policy, and one string per share. It holds no key
/// material beyond the shares themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryKit {
    /// DID of the identity whose key was split.
    pub did: String,
    /// Shares needed to recover.
    pub threshold: u8,
    /// Shares issued.
    pub total: u8,
    /// Encoded share strings, one per share.
    pub shares: Vec<String>,
    /// When the kit was exported.
    pub created_at: DateTime<Utc>,
}

impl RecoveryKit {
    /// Bundle already-encoded shares.
    pub fn new(did: impl Into<String>, threshold: u8, total: u8, shares: Vec<String>) -> Self {
        Self {
            did: did.into(),
            threshold,
            total,
            shares,
            created_at: Utc::now(),
        }
    }

    /// Pretty-printed JSON, suitable for writing to a file.
    pub fn to_json(&self) -> Result<String, CodecError> {
        serde_json::to_string_pretty(self).map_err(|e| CodecError::InvalidKit(e.to_string()))
    }

    /// Parse a kit written by [`to_json`](Self::to_json). Shares are not
    /// decoded until [`decode_shares`](Self::decode_shares).
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        serde_json::from_str(json).map_err(|e| CodecError::InvalidKit(e.to_string()))
    }

    /// Decode every share in the kit. Each share's policy must match the
    /// kit's `threshold` and `total`, else [`CodecError::InvalidKit`].
    pub fn decode_shares(&self) -> Result<Vec<RecoveryShare>, CodecError> {
        let shares = decode_shares(&self.shares)?;
        if let Some(share) = shares
            .iter()
            .find(|s| s.threshold != self.threshold || s.total != self.total)
        {
            return Err(CodecError::InvalidKit(format!(
                "share {} is {}-of-{} but the kit says {}-of-{}",
                share.index, share.threshold, share.total, self.threshold, self.total
            )));
        }
        Ok(shares)
    }

    /// Decode the kit's shares and reconstruct the secret.
    pub fn recover(&self) -> WalletResult<Zeroizing<Vec<u8>>> {
        let shares = self.decode_shares()?;
        Ok(super::reconstruct::recover_secret(&shares)?)
    }
}
