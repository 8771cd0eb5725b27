//! Wallet lifecycle states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a [`WalletFacade`](super::WalletFacade) is in its lifecycle.
///
/// ```text
/// Uninitialized ──initialize──► Open ──store_identity──► Locked ◄──lock── Unlocked
///                                 │                        │                 ▲
///                                 └──recover_identity──► Recovering ─────────┘
///                                                          (unlock / recovery succeeded)
/// ```
///
/// `close()` returns to `Uninitialized` from anywhere; `wipe()` returns to
/// `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletState {
    /// No store is open.
    Uninitialized,
    /// Store open, no identity loaded or sealed yet this session.
    Open,
    /// An identity is stored but its private key is not in memory.
    Locked,
    /// The private key is decrypted and held in memory.
    Unlocked,
    /// Shares are being decoded and combined.
    Recovering,
}

impl WalletState {
    /// Whether a store is open in this state.
    pub fn is_open(self) -> bool {
        !matches!(self, WalletState::Uninitialized)
    }

    /// Whether an identity is held in memory.
    pub fn is_unlocked(self) -> bool {
        matches!(self, WalletState::Unlocked)
    }

    /// Lowercase name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            WalletState::Uninitialized => "uninitialized",
            WalletState::Open => "open",
            WalletState::Locked => "locked",
            WalletState::Unlocked => "unlocked",
            WalletState::Recovering => "recovering",
        }
    }
}

impl fmt::Display for WalletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
