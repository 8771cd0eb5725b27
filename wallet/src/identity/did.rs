//! # Digital Identity
//!
//! The wallet holder's DID and key pair. Key generation and DID creation
//! happen elsewhere; the wallet only stores, seals, and recovers what it is
//! handed.
//!
//! ## DID Format
//!
//! ```text
//! did:<method>:<method-specific-id>
//! ```
//!
//! The method is one or more lowercase letters or digits. The identifier is
//! any non-empty run of non-whitespace characters. Nothing is resolved; the
//! check only stops obviously wrong strings from becoming storage keys.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use zeroize::Zeroizing;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when building an identity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The DID string does not match `did:<method>:<id>`.
    #[error("invalid DID format: {0}")]
    InvalidDid(String),

    /// There is no private key to protect.
    #[error("private key must not be empty")]
    EmptyPrivateKey,
}

/// Check that `did` is syntactically `did:<method>:<id>`.
pub fn validate_did(did: &str) -> Result<(), IdentityError> {
    let mut parts = did.splitn(3, ':');
    let (scheme, method, id) = match (parts.next(), parts.next(), parts.next()) {
        (Some(s), Some(m), Some(i)) => (s, m, i),
        _ => {
            return Err(IdentityError::InvalidDid(
                "DID must have format 'did:<method>:<identifier>'".into(),
            ))
        }
    };

    if scheme != "did" {
        return Err(IdentityError::InvalidDid(format!(
            "scheme must be 'did', got '{scheme}'"
        )));
    }
    if method.is_empty()
        || !method
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(IdentityError::InvalidDid(format!(
            "method must be lowercase alphanumeric, got '{method}'"
        )));
    }
    if id.is_empty() || id.chars().any(char::is_whitespace) {
        return Err(IdentityError::InvalidDid(
            "method-specific identifier must be non-empty with no whitespace".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// Raw key material. The algorithm is opaque to the wallet.
///
/// The private half is wiped on drop and never shown by `Debug`.
#[derive(Clone)]
pub struct KeyPair {
    /// Public key bytes, safe to display.
    pub public_key: Vec<u8>,
    /// Private key bytes. Sealed at rest, split for recovery.
    pub private_key: Zeroizing<Vec<u8>>,
}

impl KeyPair {
    /// Take ownership of both halves. The private half moves into a
    /// zeroizing buffer.
    pub fn new(public_key: Vec<u8>, private_key: Vec<u8>) -> Self {
        Self {
            public_key,
            private_key: Zeroizing::new(private_key),
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &hex::encode(&self.public_key))
            .field("private_key", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// DigitalIdentity
// ---------------------------------------------------------------------------

/// A DID together with the key pair that controls it.
#[derive(Debug, Clone)]
pub struct DigitalIdentity {
    /// `did:<method>:<id>`.
    pub did: String,
    /// Keys controlling the DID.
    pub key_pair: KeyPair,
    /// When the identity was first stored in a wallet.
    pub created_at: DateTime<Utc>,
}

impl DigitalIdentity {
    /// Build an identity stamped with the current time.
    ///
    /// # Errors
    ///
    /// [`IdentityError::InvalidDid`] for a malformed DID,
    /// [`IdentityError::EmptyPrivateKey`] when there's no key to store.
    pub fn new(
        did: impl Into<String>,
        public_key: Vec<u8>,
        private_key: Vec<u8>,
    ) -> Result<Self, IdentityError> {
        Self::with_created_at(did, KeyPair::new(public_key, private_key), Utc::now())
    }

    /// Build an identity with an explicit creation time (used when loading
    /// or recovering a stored identity).
    pub fn with_created_at(
        did: impl Into<String>,
        key_pair: KeyPair,
        created_at: DateTime<Utc>,
    ) -> Result<Self, IdentityError> {
        let did = did.into();
        validate_did(&did)?;
        if key_pair.private_key.is_empty() {
            return Err(IdentityError::EmptyPrivateKey);
        }
        Ok(Self {
            did,
            key_pair,
            created_at,
        })
    }

    /// Public key as lowercase hex.
    pub fn public_key_hex(&self) -> String {
        hex::encode(&self.key_pair.public_key)
    }
}
