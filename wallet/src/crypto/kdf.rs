//! # Passphrase Key Derivation
//!
//! Turns a human passphrase into a 32-byte AES key with Argon2id (v1.3).
//! Argon2id is memory-hard: every guess costs the attacker the configured
//! amount of RAM, which is what makes offline brute force of a stolen
//! wallet file painful.
//!
//! Parameters travel with every ciphertext ([`KdfParams`] is part of the
//! persisted record), so raising the defaults later never strands wallets
//! encrypted under the old ones.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::{
    AES_KEY_LENGTH, ARGON2_DEFAULT_ITERATIONS, ARGON2_DEFAULT_MEMORY_KIB,
    ARGON2_DEFAULT_PARALLELISM, ARGON2_MAX_ITERATIONS, ARGON2_MAX_MEMORY_KIB,
    ARGON2_MAX_PARALLELISM, ARGON2_RECOMMENDED_ITERATIONS, ARGON2_RECOMMENDED_MEMORY_KIB,
    KDF_SALT_LENGTH,
};

/// Key derivation failures.
#[derive(Debug, Error)]
pub enum KdfError {
    /// The cost parameters are outside what Argon2 accepts.
    #[error("invalid KDF parameters: {0}")]
    InvalidParams(String),

    /// The salt has the wrong length.
    #[error("invalid KDF salt length: expected {KDF_SALT_LENGTH} bytes, got {0}")]
    InvalidSalt(usize),

    /// Argon2 itself refused to run.
    #[error("key derivation failed: {0}")]
    Derivation(String),
}

/// Password hashing algorithm recorded alongside each ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KdfAlgorithm {
    /// Argon2id, version 0x13.
    Argon2id,
}

impl KdfAlgorithm {
    /// Stable one-byte tag, bound into the AEAD associated data.
    pub fn tag(self) -> u8 {
        match self {
            KdfAlgorithm::Argon2id => 0x01,
        }
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Hash algorithm.
    pub algorithm: KdfAlgorithm,
    /// Memory cost in KiB.
    pub memory_cost_kib: u32,
    /// Number of passes over memory.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::new(
            ARGON2_DEFAULT_MEMORY_KIB,
            ARGON2_DEFAULT_ITERATIONS,
            ARGON2_DEFAULT_PARALLELISM,
        )
    }
}

impl KdfParams {
    /// Argon2id parameters. Not validated until use; see [`KdfParams::validate`].
    pub const fn new(memory_cost_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            algorithm: KdfAlgorithm::Argon2id,
            memory_cost_kib,
            iterations,
            parallelism,
        }
    }

    /// 1 MiB, single pass. Fast enough for test suites and constrained
    /// devices; far too cheap for a wallet that might be stolen.
    pub const fn low_memory() -> Self {
        Self::new(1024, 1, 1)
    }

    /// Reject costs above the wallet's ceilings. Argon2 itself accepts up to
    /// `u32::MAX` passes and KiB, which would stall or exhaust the machine.
    pub fn check_limits(&self) -> Result<(), KdfError> {
        if self.memory_cost_kib > ARGON2_MAX_MEMORY_KIB {
            return Err(KdfError::InvalidParams(format!(
                "memory cost {} KiB exceeds limit of {ARGON2_MAX_MEMORY_KIB} KiB",
                self.memory_cost_kib
            )));
        }
        if self.iterations > ARGON2_MAX_ITERATIONS {
            return Err(KdfError::InvalidParams(format!(
                "iteration count {} exceeds limit of {ARGON2_MAX_ITERATIONS}",
                self.iterations
            )));
        }
        if self.parallelism > ARGON2_MAX_PARALLELISM {
            return Err(KdfError::InvalidParams(format!(
                "parallelism {} exceeds limit of {ARGON2_MAX_PARALLELISM}",
                self.parallelism
            )));
        }
        Ok(())
    }

    /// Check the parameters against the wallet's ceilings and Argon2's hard
    /// limits, and warn when they fall below what we'd recommend in production.
    pub fn validate(&self) -> Result<(), KdfError> {
        self.argon2_params()?;

        if self.memory_cost_kib < ARGON2_RECOMMENDED_MEMORY_KIB {
            tracing::warn!(
                memory_cost_kib = self.memory_cost_kib,
                recommended = ARGON2_RECOMMENDED_MEMORY_KIB,
                "argon2 memory cost below recommended production value"
            );
        }
        if self.iterations < ARGON2_RECOMMENDED_ITERATIONS {
            tracing::warn!(
                iterations = self.iterations,
                recommended = ARGON2_RECOMMENDED_ITERATIONS,
                "argon2 iterations below recommended production value"
            );
        }
        Ok(())
    }

    /// Stable byte encoding of the parameters, bound into AEAD associated
    /// data so an attacker can't quietly downgrade a stored record.
    pub fn to_aad_bytes(&self) -> [u8; 13] {
        let mut out = [0u8; 13];
        out[0] = self.algorithm.tag();
        out[1..5].copy_from_slice(&self.memory_cost_kib.to_be_bytes());
        out[5..9].copy_from_slice(&self.iterations.to_be_bytes());
        out[9..13].copy_from_slice(&self.parallelism.to_be_bytes());
        out
    }

    fn argon2_params(&self) -> Result<Params, KdfError> {
        self.check_limits()?;
        Params::new(
            self.memory_cost_kib,
            self.iterations,
            self.parallelism,
            Some(AES_KEY_LENGTH),
        )
        .map_err(|e| KdfError::InvalidParams(e.to_string()))
    }
}

/// Derive a 32-byte key from `passphrase` and `salt`.
///
/// The returned key is wiped from memory when dropped.
pub fn derive_key(
    passphrase: &str,
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; AES_KEY_LENGTH]>, KdfError> {
    if salt.len() != KDF_SALT_LENGTH {
        return Err(KdfError::InvalidSalt(salt.len()));
    }

    let argon2 = match params.algorithm {
        KdfAlgorithm::Argon2id => {
            Argon2::new(Algorithm::Argon2id, Version::V0x13, params.argon2_params()?)
        }
    };

    let mut key = Zeroizing::new([0u8; AES_KEY_LENGTH]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, key.as_mut())
        .map_err(|e| KdfError::Derivation(e.to_string()))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: [u8; KDF_SALT_LENGTH] = [0x5A; KDF_SALT_LENGTH];

    #[test]
    fn derivation_is_deterministic() {
        let params = KdfParams::low_memory();
        let a = derive_key("correct-horse", &SALT, &params).unwrap();
        let b = derive_key("correct-horse", &SALT, &params).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn different_passphrases_give_different_keys() {
        let params = KdfParams::low_memory();
        let a = derive_key("correct-horse", &SALT, &params).unwrap();
        let b = derive_key("battery-staple", &SALT, &params).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn different_salts_give_different_keys() {
        let params = KdfParams::low_memory();
        let a = derive_key("correct-horse", &SALT, &params).unwrap();
        let b = derive_key("correct-horse", &[0xA5; KDF_SALT_LENGTH], &params).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn different_params_give_different_keys() {
        let a = derive_key("pw", &SALT, &KdfParams::new(1024, 1, 1)).unwrap();
        let b = derive_key("pw", &SALT, &KdfParams::new(1024, 2, 1)).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn wrong_salt_length_rejected() {
        let result = derive_key("pw", &[0u8; 8], &KdfParams::low_memory());
        assert!(matches!(result, Err(KdfError::InvalidSalt(8))));
    }

    #[test]
    fn zero_iterations_rejected() {
        let params = KdfParams::new(1024, 0, 1);
        assert!(matches!(params.validate(), Err(KdfError::InvalidParams(_))));
        assert!(derive_key("pw", &SALT, &params).is_err());
    }

    #[test]
    fn oversized_params_rejected_before_hashing() {
        for params in [
            KdfParams::new(1024, u32::MAX, 1),
            KdfParams::new(u32::MAX, 1, 1),
            KdfParams::new(1024, 1, u32::MAX),
            KdfParams::new(ARGON2_MAX_MEMORY_KIB + 1, 1, 1),
        ] {
            assert!(matches!(params.check_limits(), Err(KdfError::InvalidParams(_))));
            assert!(matches!(params.validate(), Err(KdfError::InvalidParams(_))));
            assert!(matches!(
                derive_key("pw", &SALT, &params),
                Err(KdfError::InvalidParams(_))
            ));
        }
    }

    #[test]
    fn params_at_the_limits_pass_the_check() {
        let params = KdfParams::new(
            ARGON2_MAX_MEMORY_KIB,
            ARGON2_MAX_ITERATIONS,
            ARGON2_MAX_PARALLELISM,
        );
        assert!(params.check_limits().is_ok());
    }

    #[test]
    fn default_params_are_valid() {
        assert!(KdfParams::default().validate().is_ok());
        assert_eq!(KdfParams::default().algorithm, KdfAlgorithm::Argon2id);
    }

    #[test]
    fn aad_bytes_encode_every_field() {
        let a = KdfParams::new(1024, 1, 1).to_aad_bytes();
        assert_ne!(a, KdfParams::new(2048, 1, 1).to_aad_bytes());
        assert_ne!(a, KdfParams::new(1024, 2, 1).to_aad_bytes());
        assert_ne!(a, KdfParams::new(1024, 1, 2).to_aad_bytes());
        assert_eq!(a[0], KdfAlgorithm::Argon2id.tag());
    }

    #[test]
    fn params_serialize_with_algorithm_name() {
        let json = serde_json::to_value(KdfParams::low_memory()).unwrap();
        assert_eq!(json["algorithm"], "argon2id");
        assert_eq!(json["memory_cost_kib"], 1024);
    }
}
