//! # AES-256-GCM Encryption
//!
//! The AEAD primitive under the key-sealing layer. Callers hand in a 32-byte
//! key (derived from a passphrase by [`crate::crypto::kdf`]), the plaintext,
//! and associated data that must match at decryption time.
//!
//! ## Nonce management
//!
//! GCM is notoriously unforgiving about nonce reuse: two messages under the
//! same key and nonce leak the XOR of the plaintexts and let an attacker
//! forge tags. Every call here draws a fresh random 96-bit nonce from the OS
//! CSPRNG. On top of that, the sealing layer derives a fresh key per
//! encryption (fresh salt), so a key never sees more than one nonce anyway.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use thiserror::Error;

use crate::config::{AES_KEY_LENGTH, AES_NONCE_LENGTH};

/// Errors that can occur during encryption/decryption.
///
/// Kept vague on purpose. The difference between "wrong key" and
/// "corrupted ciphertext" is none of an attacker's business.
#[derive(Debug, Error)]
pub enum EncryptionError {
    /// The cipher rejected the input.
    #[error("encryption failed")]
    EncryptFailed,

    /// Wrong key, wrong AAD, or a modified ciphertext.
    #[error("decryption failed")]
    DecryptFailed,

    /// The stored nonce isn't 12 bytes.
    #[error("invalid nonce length: expected {AES_NONCE_LENGTH} bytes")]
    InvalidNonceLength,
}

/// Encrypt with Additional Authenticated Data (AAD).
///
/// The AAD is authenticated but NOT encrypted. Returns `(nonce, ciphertext)`
/// where the ciphertext carries the 16-byte tag at its end.
pub fn encrypt_with_aad(
    key: &[u8; AES_KEY_LENGTH],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<([u8; AES_NONCE_LENGTH], Vec<u8>), EncryptionError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::EncryptFailed)?;

    let mut nonce_bytes = [0u8; AES_NONCE_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| EncryptionError::EncryptFailed)?;

    Ok((nonce_bytes, ciphertext))
}

/// Decrypt ciphertext produced by [`encrypt_with_aad`].
///
/// The nonce and AAD must match the values used during encryption. Any
/// mismatch, a wrong key, or a flipped bit all fail the same way.
pub fn decrypt_with_aad(
    key: &[u8; AES_KEY_LENGTH],
    nonce: &[u8],
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, EncryptionError> {
    if nonce.len() != AES_NONCE_LENGTH {
        return Err(EncryptionError::InvalidNonceLength);
    }
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| EncryptionError::DecryptFailed)?;

    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| EncryptionError::DecryptFailed)
}
