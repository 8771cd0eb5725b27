//! # Secret Recovery
//!
//! Shamir's Secret Sharing over GF(256) for backing up the wallet's root key.
//! The private key is split into `total` shares, any `threshold` of which
//! reconstruct it. Shares are handed to the user as printable strings
//! ([`codec`]) and never persisted by the wallet.
//!
//! Each byte of the secret gets its own random polynomial
//!
//! ```text
//! f(x) = s + a1*x + a2*x^2 + ... + a(t-1)*x^(t-1)
//! ```
//!
//! evaluated at x = 1..=total. Reconstruction interpolates back to f(0).
//! With fewer than `threshold` points every value of `s` is equally likely,
//! so partial share sets leak nothing.
//!
//! ## Example
//!
//! ```
//! use veriskill_wallet::recovery::{recover_secret, split_secret};
//!
//! let secret = b"my-32-byte-private-key-material!";
//! let shares = split_secret(secret, 3, 5).unwrap();
//!
//! let recovered = recover_secret(&[shares[0].clone(), shares[2].clone(), shares[4].clone()]).unwrap();
//! assert_eq!(recovered.as_slice(), secret);
//! ```

pub mod codec;
pub mod error;
pub mod reconstruct;
pub mod share;
pub mod split;

pub use codec::{decode_share, decode_shares, encode_share, CodecError, RecoveryKit};
pub use error::ShamirError;
pub use reconstruct::recover_secret;
pub use share::{RecoveryShare, ShamirConfig};
pub use split::{split_secret, split_secret_with_rng};
