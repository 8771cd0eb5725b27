//! # Vault Module: The Wallet Facade
//!
//! Where the pieces meet. The facade seals identities with
//! [`KeyEncryptionService`](crate::crypto::KeyEncryptionService), persists
//! them through a [`WalletStore`](crate::storage::WalletStore), and splits
//! or reassembles private keys with the [`recovery`](crate::recovery)
//! module.
//!
//! ## Architecture
//!
//! ```text
//! state.rs    - WalletState lifecycle enum
//! facade.rs   - WalletFacade: every operation the application layer calls
//! summary.rs  - WalletSummary: public wallet info for display/export
//! ```
//!
//! ## Design Principles
//!
//! 1. **The facade never generates keys.** It receives a finished
//!    [`DigitalIdentity`](crate::identity::DigitalIdentity) and only stores,
//!    seals, splits, and recovers it.
//!
//! 2. **Shares are never persisted.** They exist to leave the device.
//!
//! 3. **Errors have a kind.** Every failure is a
//!    [`WalletError`](crate::error::WalletError) whose
//!    [`kind()`](crate::error::WalletError::kind) the caller can branch on.

pub mod facade;
pub mod state;
pub mod summary;

pub use facade::WalletFacade;
pub use state::WalletState;
pub use summary::WalletSummary;
