//! # Private Key Sealing
//!
//! [`KeyEncryptionService`] is what stands between a stolen wallet file and
//! a stolen identity. It wraps raw private key bytes into an
//! [`EncryptedBlob`]:
//!
//! ```text
//! passphrase ──Argon2id(salt, params)──► 32-byte key
//! private key ──AES-256-GCM(key, nonce, aad)──► ciphertext || tag
//! aad = DOMAIN || params || salt || context
//! ```
//!
//! Salt and nonce are fresh for every call. The KDF parameters and salt are
//! authenticated as associated data, as is an optional caller-supplied
//! context (the wallet passes the DID), so a record can't be downgraded to
//! cheaper KDF settings or transplanted onto another identity without the
//! tag check failing.
//!
//! ## Failure reporting
//!
//! Every decryption failure surfaces as [`SealingError::DecryptionFailed`]
//! with one fixed message. Wrong passphrase, flipped ciphertext bit, edited
//! salt: indistinguishable to the caller, visible only at `debug` level in
//! the internal log.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use super::encryption::{decrypt_with_aad, encrypt_with_aad};
use super::kdf::{derive_key, KdfParams};
use crate::config::KDF_SALT_LENGTH;

/// Domain separator for sealed private keys.
const SEAL_DOMAIN: &[u8] = b"veriskill/private-key/v1";

/// Errors from sealing and unsealing private keys.
#[derive(Debug, Error)]
pub enum SealingError {
    /// Empty key material or unusable KDF parameters.
    #[error("invalid key encryption parameters: {0}")]
    InvalidParameters(String),

    /// The cipher refused to encrypt. Should never happen with valid inputs.
    #[error("private key encryption failed")]
    EncryptFailed,

    /// Wrong passphrase or tampered record. Deliberately no more detail.
    #[error("decryption failed")]
    DecryptionFailed,
}

/// A private key encrypted under a passphrase-derived key.
///
/// This is the exact shape persisted in the identity table, so field
/// names and types are part of the on-disk format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBlob {
    /// AES-256-GCM ciphertext with the 16-byte tag appended.
    pub ciphertext: Vec<u8>,
    /// 96-bit GCM nonce.
    pub nonce: Vec<u8>,
    /// Argon2id salt.
    pub kdf_salt: Vec<u8>,
    /// Argon2id cost parameters used for this blob.
    pub kdf_params: KdfParams,
}

/// Passphrase-based encryption of raw private key bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyEncryptionService {
    params: KdfParams,
}

impl KeyEncryptionService {
    /// A service that seals new blobs under `params`.
    ///
    /// Decryption always uses the parameters stored in the blob, so this
    /// only affects what new records look like.
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    /// Parameters applied to newly sealed blobs.
    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Encrypt `private_key` under `passphrase`.
    pub fn encrypt(
        &self,
        private_key: &[u8],
        passphrase: &str,
    ) -> Result<EncryptedBlob, SealingError> {
        self.encrypt_bound(private_key, passphrase, &[])
    }

    /// Decrypt a blob produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(
        &self,
        blob: &EncryptedBlob,
        passphrase: &str,
    ) -> Result<Zeroizing<Vec<u8>>, SealingError> {
        self.decrypt_bound(blob, passphrase, &[])
    }

    /// Encrypt `private_key`, additionally binding `context` into the tag.
    /// The same context must be supplied to [`decrypt_bound`](Self::decrypt_bound).
    pub fn encrypt_bound(
        &self,
        private_key: &[u8],
        passphrase: &str,
        context: &[u8],
    ) -> Result<EncryptedBlob, SealingError> {
        if private_key.is_empty() {
            return Err(SealingError::InvalidParameters(
                "private key must not be empty".into(),
            ));
        }
        self.params
            .validate()
            .map_err(|e| SealingError::InvalidParameters(e.to_string()))?;

        let mut salt = [0u8; KDF_SALT_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut salt);

        let key = derive_key(passphrase, &salt, &self.params)
            .map_err(|e| SealingError::InvalidParameters(e.to_string()))?;
        let aad = associated_data(&self.params, &salt, context);

        let (nonce, ciphertext) =
            encrypt_with_aad(&key, private_key, &aad).map_err(|_| SealingError::EncryptFailed)?;

        tracing::debug!(
            memory_cost_kib = self.params.memory_cost_kib,
            iterations = self.params.iterations,
            "private key sealed"
        );

        Ok(EncryptedBlob {
            ciphertext,
            nonce: nonce.to_vec(),
            kdf_salt: salt.to_vec(),
            kdf_params: self.params,
        })
    }

    /// Decrypt a blob sealed with [`encrypt_bound`](Self::encrypt_bound).
    pub fn decrypt_bound(
        &self,
        blob: &EncryptedBlob,
        passphrase: &str,
        context: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, SealingError> {
        // The stored parameters are untrusted until the tag verifies.
        blob.kdf_params.check_limits().map_err(|e| {
            tracing::debug!(error = %e, "unseal rejected: stored KDF parameters over limit");
            SealingError::DecryptionFailed
        })?;

        let key = derive_key(passphrase, &blob.kdf_salt, &blob.kdf_params).map_err(|e| {
            tracing::debug!(error = %e, "unseal rejected: stored KDF parameters unusable");
            SealingError::DecryptionFailed
        })?;
        let aad = associated_data(&blob.kdf_params, &blob.kdf_salt, context);

        decrypt_with_aad(&key, &blob.nonce, &blob.ciphertext, &aad)
            .map(Zeroizing::new)
            .map_err(|e| {
                tracing::debug!(error = %e, "unseal rejected: authentication failed");
                SealingError::DecryptionFailed
            })
    }
}

fn associated_data(params: &KdfParams, salt: &[u8], context: &[u8]) -> Vec<u8> {
    let mut aad = Vec::with_capacity(SEAL_DOMAIN.len() + 13 + salt.len() + context.len());
    aad.extend_from_slice(SEAL_DOMAIN);
    aad.extend_from_slice(&params.to_aad_bytes());
    aad.extend_from_slice(salt);
    aad.extend_from_slice(context);
    aad
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> KeyEncryptionService {
        KeyEncryptionService::new(KdfParams::low_memory())
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let key = [0x42u8; 32];
        let blob = service().encrypt(&key, "correct-horse").unwrap();
        let recovered = service().decrypt(&blob, "correct-horse").unwrap();
        assert_eq!(recovered.as_slice(), &key);
    }

    #[test]
    fn wrong_passphrase_fails() {
        let blob = service().encrypt(&[1, 2, 3, 4], "correct-horse").unwrap();
        assert!(matches!(
            service().decrypt(&blob, "wrong"),
            Err(SealingError::DecryptionFailed)
        ));
    }

    #[test]
    fn ciphertext_is_not_plaintext() {
        let key = [0x42u8; 32];
        let blob = service().encrypt(&key, "pw").unwrap();
        assert_ne!(&blob.ciphertext[..32], &key);
    }

    #[test]
    fn fresh_salt_and_nonce_per_encryption() {
        let a = service().encrypt(&[9u8; 32], "pw").unwrap();
        let b = service().encrypt(&[9u8; 32], "pw").unwrap();
        assert_ne!(a.kdf_salt, b.kdf_salt);
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let mut blob = service().encrypt(&[9u8; 32], "pw").unwrap();
        blob.ciphertext[3] ^= 0x80;
        assert!(matches!(
            service().decrypt(&blob, "pw"),
            Err(SealingError::DecryptionFailed)
        ));
    }

    #[test]
    fn tampered_nonce_fails() {
        let mut blob = service().encrypt(&[9u8; 32], "pw").unwrap();
        blob.nonce[0] ^= 0x01;
        assert!(service().decrypt(&blob, "pw").is_err());

        blob.nonce.truncate(4);
        assert!(matches!(
            service().decrypt(&blob, "pw"),
            Err(SealingError::DecryptionFailed)
        ));
    }

    #[test]
    fn tampered_salt_fails() {
        let mut blob = service().encrypt(&[9u8; 32], "pw").unwrap();
        blob.kdf_salt[0] ^= 0x01;
        assert!(service().decrypt(&blob, "pw").is_err());
    }

    #[test]
    fn downgraded_params_fail() {
        let strong = KeyEncryptionService::new(KdfParams::new(2048, 2, 1));
        let mut blob = strong.encrypt(&[9u8; 32], "pw").unwrap();
        blob.kdf_params = KdfParams::low_memory();
        assert!(matches!(
            strong.decrypt(&blob, "pw"),
            Err(SealingError::DecryptionFailed)
        ));
    }

    #[test]
    fn decrypt_uses_params_stored_in_blob() {
        let old = KeyEncryptionService::new(KdfParams::new(2048, 2, 1));
        let blob = old.encrypt(&[5u8; 16], "pw").unwrap();
        let recovered = service().decrypt(&blob, "pw").unwrap();
        assert_eq!(recovered.as_slice(), &[5u8; 16]);
    }

    #[test]
    fn oversized_stored_params_fail_without_hashing() {
        let blob = service().encrypt(&[9u8; 32], "pw").unwrap();
        for params in [
            KdfParams::new(1024, u32::MAX, 1),
            KdfParams::new(u32::MAX, 1, 1),
            KdfParams::new(1024, 1, u32::MAX),
        ] {
            let mut tampered = blob.clone();
            tampered.kdf_params = params;

            let started = std::time::Instant::now();
            assert!(matches!(
                service().decrypt(&tampered, "pw"),
                Err(SealingError::DecryptionFailed)
            ));
            assert!(started.elapsed() < std::time::Duration::from_secs(5));
        }
    }

    #[test]
    fn oversized_params_rejected_at_encrypt() {
        let greedy = KeyEncryptionService::new(KdfParams::new(u32::MAX, 1, 1));
        assert!(matches!(
            greedy.encrypt(&[1u8; 32], "pw"),
            Err(SealingError::InvalidParameters(_))
        ));
    }

    #[test]
    fn bound_context_must_match() {
        let blob = service()
            .encrypt_bound(&[7u8; 32], "pw", b"did:example:alice")
            .unwrap();
        assert!(service()
            .decrypt_bound(&blob, "pw", b"did:example:alice")
            .is_ok());
        assert!(matches!(
            service().decrypt_bound(&blob, "pw", b"did:example:mallory"),
            Err(SealingError::DecryptionFailed)
        ));
    }

    #[test]
    fn empty_private_key_rejected() {
        assert!(matches!(
            service().encrypt(&[], "pw"),
            Err(SealingError::InvalidParameters(_))
        ));
    }

    #[test]
    fn invalid_params_rejected_at_encrypt() {
        let broken = KeyEncryptionService::new(KdfParams::new(1024, 0, 1));
        assert!(matches!(
            broken.encrypt(&[1u8; 32], "pw"),
            Err(SealingError::InvalidParameters(_))
        ));
    }

    #[test]
    fn decryption_error_message_is_uniform() {
        let blob = service().encrypt(&[1u8; 32], "pw").unwrap();
        let wrong_pass = service().decrypt(&blob, "nope").unwrap_err().to_string();

        let mut tampered = blob.clone();
        tampered.ciphertext[0] ^= 1;
        let corrupted = service().decrypt(&tampered, "pw").unwrap_err().to_string();

        assert_eq!(wrong_pass, corrupted);
    }
}
