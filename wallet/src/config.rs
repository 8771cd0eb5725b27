//! # Wallet Configuration & Constants
//!
//! Every magic number in the wallet lives here. Some of these values are
//! baked into persisted records and exported share strings, so changing them
//! after release breaks every wallet already on disk. Choose wisely.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::KdfParams;

// ---------------------------------------------------------------------------
// Symmetric Encryption
// ---------------------------------------------------------------------------

/// AES-256-GCM protects private keys at rest. 256-bit keys, 96-bit nonces,
/// 128-bit authentication tags.
pub const SYMMETRIC_ALGORITHM: &str = "AES-256-GCM";

/// AES-256-GCM key length in bytes.
pub const AES_KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce length in bytes. Twelve. Not sixteen.
pub const AES_NONCE_LENGTH: usize = 12;

/// AES-256-GCM authentication tag length in bytes.
pub const AES_TAG_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Key Derivation
// ---------------------------------------------------------------------------

/// Salt length for passphrase derivation. Fresh per encryption.
pub const KDF_SALT_LENGTH: usize = 16;

/// Default Argon2id memory cost: 64 MiB. Expensive enough to hurt GPU
/// farms, cheap enough for a laptop unlocking its wallet once per session.
pub const ARGON2_DEFAULT_MEMORY_KIB: u32 = 64 * 1024;

/// Default Argon2id pass count.
pub const ARGON2_DEFAULT_ITERATIONS: u32 = 3;

/// Default Argon2id lane count.
pub const ARGON2_DEFAULT_PARALLELISM: u32 = 1;

/// Below this memory cost we still work, but complain loudly in the logs.
pub const ARGON2_RECOMMENDED_MEMORY_KIB: u32 = 19 * 1024;

/// Below this pass count we still work, but complain loudly in the logs.
pub const ARGON2_RECOMMENDED_ITERATIONS: u32 = 2;

/// Largest memory cost we will run Argon2id with: 1 GiB. Stored records are
/// read before they are authenticated, so their parameters must be capped.
pub const ARGON2_MAX_MEMORY_KIB: u32 = 1024 * 1024;

/// Largest pass count we will run Argon2id with.
pub const ARGON2_MAX_ITERATIONS: u32 = 32;

/// Largest lane count we will run Argon2id with.
pub const ARGON2_MAX_PARALLELISM: u32 = 16;

// ---------------------------------------------------------------------------
// Secret Sharing
// ---------------------------------------------------------------------------

/// Smallest meaningful threshold. 1-of-n is just handing out copies.
pub const MIN_THRESHOLD: u8 = 2;

/// Default recovery policy offered at onboarding: any 2 of 3 shares.
pub const DEFAULT_RECOVERY_THRESHOLD: u8 = 2;

/// See [`DEFAULT_RECOVERY_THRESHOLD`].
pub const DEFAULT_RECOVERY_TOTAL: u8 = 3;

/// Version byte leading every encoded share. Bump on layout changes only.
pub const SHARE_CODEC_VERSION: u8 = 0x01;

/// Truncated BLAKE3 checksum appended to every encoded share. Catches
/// typos and truncation when shares are copied off paper.
pub const SHARE_CHECKSUM_LENGTH: usize = 4;

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// sled tree holding one record per DID.
pub const IDENTITY_TREE: &str = "identity";

/// sled tree holding one record per credential id.
pub const CREDENTIALS_TREE: &str = "credentials";

/// Directory name under the data dir where the sled database lives.
pub const DB_DIR_NAME: &str = "wallet-db";

// ---------------------------------------------------------------------------
// Runtime Configuration
// ---------------------------------------------------------------------------

/// Where the wallet keeps its records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageBackend {
    /// Plain in-process maps. Gone when the process exits.
    #[default]
    Memory,
    /// A sled database in a temporary location, removed on drop.
    Temporary,
    /// A sled database at the given directory.
    Sled {
        /// Database directory. Created if missing.
        path: PathBuf,
    },
}

/// Runtime configuration for a [`WalletFacade`](crate::vault::WalletFacade).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Storage engine and location.
    pub storage: StorageBackend,
    /// Argon2id cost parameters for newly encrypted identities.
    pub kdf: KdfParams,
    /// Threshold used when the caller doesn't pick one.
    pub default_threshold: u8,
    /// Share count used when the caller doesn't pick one.
    pub default_total: u8,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            kdf: KdfParams::default(),
            default_threshold: DEFAULT_RECOVERY_THRESHOLD,
            default_total: DEFAULT_RECOVERY_TOTAL,
        }
    }
}

impl WalletConfig {
    /// Configuration for an on-disk wallet rooted at `data_dir`.
    pub fn on_disk(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageBackend::Sled {
                path: data_dir.into().join(DB_DIR_NAME),
            },
            ..Self::default()
        }
    }

    /// Replace the KDF parameters.
    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    /// Replace the storage backend.
    pub fn with_storage(mut self, storage: StorageBackend) -> Self {
        self.storage = storage;
        self
    }

    /// Replace the default recovery policy.
    pub fn with_recovery_policy(mut self, threshold: u8, total: u8) -> Self {
        self.default_threshold = threshold;
        self.default_total = total;
        self
    }

    /// The `(threshold, total)` to split with, filling in whichever the
    /// caller left out from this config's defaults. Validation happens at
    /// split time.
    pub fn recovery_policy(&self, threshold: Option<u8>, total: Option<u8>) -> (u8, u8) {
        (
            threshold.unwrap_or(self.default_threshold),
            total.unwrap_or(self.default_total),
        )
    }
}
