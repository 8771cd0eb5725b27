//! # Identity Module
//!
//! What the wallet holds on the user's behalf:
//!
//! 1. **DigitalIdentity**: a DID plus the key pair that controls it. The
//!    private key is the secret that gets sealed at rest and split into
//!    recovery shares.
//! 2. **VerifiableCredential**: W3C credentials issued to that DID, stored
//!    as opaque JSON.
//!
//! Generating keys, creating DIDs, and issuing or verifying credentials all
//! happen outside the wallet.

pub mod credential;
pub mod did;

pub use credential::VerifiableCredential;
pub use did::{validate_did, DigitalIdentity, IdentityError, KeyPair};
