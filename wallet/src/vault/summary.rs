//! Public, shareable view of a wallet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::WalletState;

/// What the wallet can say about itself without touching secrets.
///
/// `did`, `public_key_hex` and `created_at` come from the unlocked identity
/// if there is one, otherwise from the first stored identity record, and
/// are `None` for an empty wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    /// DID of the identity described.
    pub did: Option<String>,
    /// Its public key as lowercase hex.
    pub public_key_hex: Option<String>,
    /// When it was first stored.
    pub created_at: Option<DateTime<Utc>>,
    /// Identity records in the store.
    pub identity_count: usize,
    /// Credentials in the store.
    pub credential_count: usize,
    /// Lifecycle state at the time of the call.
    pub state: WalletState,
}

impl WalletSummary {
    /// Pretty-printed JSON for display or export.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
