// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # VeriSkill Wallet: Core Library
//!
//! The secret-recovery core of the VeriSkill credential wallet. It keeps a
//! user's DID key pair sealed at rest, holds their verifiable credentials,
//! and lets them back up the root key as Shamir shares they can hand to
//! people or places they trust.
//!
//! ## Architecture
//!
//! - **crypto** - GF(256) arithmetic, Argon2id, AES-256-GCM, key sealing.
//! - **recovery** - Shamir split/reconstruct and the printable share format.
//! - **identity** - DIDs, key pairs, and opaque verifiable credentials.
//! - **storage** - The `WalletStore` trait with sled and in-memory engines.
//! - **vault** - `WalletFacade`, the state machine the application drives.
//! - **config** - Constants and runtime `WalletConfig`.
//! - **error** - `WalletError` and the `ErrorKind` classification.
//!
//! ## Example
//!
//! ```
//! use veriskill_wallet::{DigitalIdentity, KdfParams, WalletConfig, WalletFacade};
//!
//! let config = WalletConfig::default().with_kdf(KdfParams::low_memory());
//! let mut wallet = WalletFacade::new(config);
//! wallet.initialize().unwrap();
//!
//! let identity = DigitalIdentity::new("did:example:alice", vec![2; 32], vec![7; 32]).unwrap();
//! wallet.store_identity(&identity, "correct horse battery staple").unwrap();
//! wallet.unlock("did:example:alice", "correct horse battery staple").unwrap();
//!
//! let shares = wallet.export_recovery_shares(2, 3).unwrap();
//! wallet.lock().unwrap();
//!
//! wallet.recover_identity(&shares[1..], "did:example:alice", vec![2; 32]).unwrap();
//! assert_eq!(wallet.identity().unwrap().key_pair.private_key.as_slice(), &[7; 32]);
//! ```
//!
//! ## Ground Rules
//!
//! 1. No secret byte or passphrase is ever logged.
//! 2. Secret buffers are `Zeroizing` and wiped on drop.
//! 3. Decryption failures all look the same from the outside.

pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod recovery;
pub mod storage;
pub mod vault;

pub use config::{StorageBackend, WalletConfig};
pub use crypto::{EncryptedBlob, KdfParams, KeyEncryptionService};
pub use error::{ErrorKind, WalletError, WalletResult};
pub use identity::{DigitalIdentity, KeyPair, VerifiableCredential};
pub use recovery::{RecoveryKit, RecoveryShare};
pub use vault::{WalletFacade, WalletState, WalletSummary};
