//! # Cryptographic Primitives
//!
//! Everything security-relevant in the wallet flows through here:
//!
//! - **gf256** - GF(2^8) arithmetic for the secret-sharing scheme.
//!   Constant-time, because its operands are key bytes.
//! - **kdf** - Argon2id passphrase stretching.
//! - **encryption** - AES-256-GCM authenticated encryption.
//! - **sealing** - passphrase-sealed private keys built from the two above.
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't, except for GF(256), which is eight shifts and XORs and has
//! an exhaustive test against a table oracle. Everything else is a thin,
//! type-safe wrapper around audited implementations.

pub mod encryption;
pub mod gf256;
pub mod kdf;
pub mod sealing;

pub use kdf::{KdfAlgorithm, KdfParams};
pub use sealing::{EncryptedBlob, KeyEncryptionService, SealingError};
