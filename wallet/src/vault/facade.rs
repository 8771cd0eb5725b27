//! # Wallet Facade
//!
//! The single entry point the application layer talks to. A
//! [`WalletFacade`] owns the store, the sealing service, and (while
//! unlocked) the decrypted identity, and enforces the lifecycle in
//! [`WalletState`].
//!
//! ## Secrets in memory
//!
//! The plaintext private key lives in memory only between a successful
//! `unlock`/`recover_identity` and the next `lock`, `wipe`, `close`, or
//! drop. It sits in a `Zeroizing` buffer, so every one of those paths wipes
//! it. Storing an identity never caches its key.

use chrono::Utc;
use zeroize::Zeroizing;

use super::state::WalletState;
use super::summary::WalletSummary;
use crate::config::WalletConfig;
use crate::crypto::KeyEncryptionService;
use crate::error::{WalletError, WalletResult};
use crate::identity::{validate_did, DigitalIdentity, IdentityError, KeyPair, VerifiableCredential};
use crate::recovery::{self, RecoveryKit};
use crate::storage::records::{self, IdentityRecord};
use crate::storage::{open_store, Table, WalletStore};

/// The wallet's public surface.
///
/// All state transitions take `&mut self`, so one facade has exactly one
/// writer. Share one across threads behind a `Mutex` if you must.
#[derive(Debug)]
pub struct WalletFacade {
    config: WalletConfig,
    sealer: KeyEncryptionService,
    store: Option<Box<dyn WalletStore>>,
    state: WalletState,
    identity: Option<DigitalIdentity>,
}

impl WalletFacade {
    /// A facade in the `Uninitialized` state. Nothing is opened until
    /// [`initialize`](Self::initialize).
    pub fn new(config: WalletConfig) -> Self {
        let sealer = KeyEncryptionService::new(config.kdf);
        Self {
            config,
            sealer,
            store: None,
            state: WalletState::Uninitialized,
            identity: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WalletState {
        self.state
    }

    /// The configuration this wallet was built with.
    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Shorthand for `state() == WalletState::Unlocked`.
    pub fn is_unlocked(&self) -> bool {
        self.state.is_unlocked()
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Open the configured store. Calling it again while open is a no-op.
    pub fn initialize(&mut self) -> WalletResult<()> {
        if self.store.is_some() {
            return Ok(());
        }
        let store = open_store(&self.config.storage).map_err(|e| {
            tracing::error!(error = %e, "failed to open wallet store");
            e
        })?;
        self.store = Some(store);
        self.state = WalletState::Open;
        tracing::info!(backend = ?self.config.storage, "wallet initialized");
        Ok(())
    }

    /// Flush and release the store, dropping any unlocked identity.
    pub fn close(&mut self) -> WalletResult<()> {
        self.identity = None;
        self.state = WalletState::Uninitialized;
        if let Some(store) = self.store.take() {
            store.flush()?;
            tracing::info!("wallet closed");
        }
        Ok(())
    }

    /// Delete every identity and credential and forget the unlocked identity.
    pub fn wipe(&mut self) -> WalletResult<()> {
        let store = self.store()?;
        for table in Table::ALL {
            store.clear(table)?;
        }
        store.flush()?;
        self.identity = None;
        self.state = WalletState::Open;
        tracing::warn!("wallet wiped");
        Ok(())
    }

    // -- Identity -----------------------------------------------------------

    /// Seal `identity`'s private key under `passphrase` and persist it,
    /// replacing any record for the same DID.
    ///
    /// The plaintext key is not cached. The wallet moves to `Locked`,
    /// unless this identity is the one currently unlocked, in which case it
    /// stays `Unlocked`.
    pub fn store_identity(
        &mut self,
        identity: &DigitalIdentity,
        passphrase: &str,
    ) -> WalletResult<()> {
        validate_did(&identity.did)?;
        if identity.key_pair.private_key.is_empty() {
            return Err(IdentityError::EmptyPrivateKey.into());
        }
        let store = self.store()?;

        let blob = self.sealer.encrypt_bound(
            &identity.key_pair.private_key,
            passphrase,
            identity.did.as_bytes(),
        )?;
        let record = IdentityRecord {
            did: identity.did.clone(),
            public_key: identity.key_pair.public_key.clone(),
            encrypted_private_key: blob,
            created_at: identity.created_at,
        };
        records::put_identity(store, &record)?;

        let same_identity_unlocked = self.state == WalletState::Unlocked
            && self.identity.as_ref().map(|i| i.did.as_str()) == Some(identity.did.as_str());
        if !same_identity_unlocked {
            self.identity = None;
            self.state = WalletState::Locked;
        }

        tracing::info!(did = %identity.did, state = %self.state, "identity stored");
        Ok(())
    }

    /// Decrypt the stored identity for `did` and hold it in memory.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown DID. A wrong passphrase or a damaged record
    /// both give `DecryptionFailed` and leave the wallet `Locked`.
    pub fn unlock(&mut self, did: &str, passphrase: &str) -> WalletResult<()> {
        let record =
            records::get_identity(self.store()?, did)?.ok_or_else(|| WalletError::NotFound {
                what: "identity",
                key: did.to_string(),
            })?;

        let private_key = match self.sealer.decrypt_bound(
            &record.encrypted_private_key,
            passphrase,
            did.as_bytes(),
        ) {
            Ok(key) => key,
            Err(e) => {
                self.identity = None;
                self.state = WalletState::Locked;
                tracing::warn!(did, "unlock failed");
                return Err(e.into());
            }
        };

        self.identity = Some(DigitalIdentity {
            did: record.did,
            key_pair: KeyPair {
                public_key: record.public_key,
                private_key,
            },
            created_at: record.created_at,
        });
        self.state = WalletState::Unlocked;
        tracing::info!(did, "wallet unlocked");
        Ok(())
    }

    /// Forget the in-memory identity.
    pub fn lock(&mut self) -> WalletResult<()> {
        self.store()?;
        self.identity = None;
        self.state = WalletState::Locked;
        tracing::info!("wallet locked");
        Ok(())
    }

    /// The unlocked identity.
    pub fn identity(&self) -> WalletResult<&DigitalIdentity> {
        self.store()?;
        self.identity.as_ref().ok_or(WalletError::Locked)
    }

    /// DIDs of every stored identity.
    pub fn stored_identities(&self) -> WalletResult<Vec<String>> {
        Ok(records::identity_dids(self.store()?)?)
    }

    /// Re-seal the unlocked identity under a new passphrase. The usual
    /// follow-up to [`recover_identity`](Self::recover_identity).
    pub fn reseal(&mut self, passphrase: &str) -> WalletResult<()> {
        let identity = self.identity()?.clone();
        self.store_identity(&identity, passphrase)
    }

    // -- Recovery -----------------------------------------------------------

    /// Split the unlocked private key into `total` shares, any `threshold`
    /// of which recover it. The shares are returned encoded and are never
    /// stored.
    pub fn export_recovery_shares(&self, threshold: u8, total: u8) -> WalletResult<Vec<String>> {
        let identity = self.identity()?;
        let shares = recovery::split_secret(&identity.key_pair.private_key, threshold, total)?;
        let encoded = shares
            .iter()
            .map(recovery::encode_share)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(did = %identity.did, threshold, total, "recovery shares exported");
        Ok(encoded)
    }

    /// Same as [`export_recovery_shares`](Self::export_recovery_shares),
    /// bundled with the DID and policy for saving to a file.
    pub fn export_recovery_kit(&self, threshold: u8, total: u8) -> WalletResult<RecoveryKit> {
        let shares = self.export_recovery_shares(threshold, total)?;
        let did = self.identity()?.did.clone();
        Ok(RecoveryKit::new(did, threshold, total, shares))
    }

    /// Rebuild an identity from encoded shares and unlock it.
    ///
    /// Nothing is persisted; call [`reseal`](Self::reseal) or
    /// [`store_identity`](Self::store_identity) afterwards to keep it. On
    /// failure the wallet returns to the state it was in before the call.
    pub fn recover_identity<S: AsRef<str>>(
        &mut self,
        encoded_shares: &[S],
        did: &str,
        public_key: Vec<u8>,
    ) -> WalletResult<()> {
        self.store()?;
        validate_did(did)?;

        let previous = self.state;
        self.state = WalletState::Recovering;
        tracing::info!(did, supplied = encoded_shares.len(), "recovering identity from shares");

        match self.rebuild_identity(encoded_shares, did, public_key) {
            Ok(identity) => {
                self.identity = Some(identity);
                self.state = WalletState::Unlocked;
                tracing::info!(did, "identity recovered");
                Ok(())
            }
            Err(e) => {
                self.state = previous;
                tracing::warn!(did, error = %e, "identity recovery failed");
                Err(e)
            }
        }
    }

    fn rebuild_identity<S: AsRef<str>>(
        &self,
        encoded_shares: &[S],
        did: &str,
        public_key: Vec<u8>,
    ) -> WalletResult<DigitalIdentity> {
        let shares = recovery::decode_shares(encoded_shares)?;
        let private_key: Zeroizing<Vec<u8>> = recovery::recover_secret(&shares)?;

        // Keep the original creation time if this DID was stored before.
        let created_at = records::get_identity(self.store()?, did)?
            .map(|r| r.created_at)
            .unwrap_or_else(Utc::now);

        Ok(DigitalIdentity {
            did: did.to_string(),
            key_pair: KeyPair {
                public_key,
                private_key,
            },
            created_at,
        })
    }

    // -- Credentials --------------------------------------------------------

    /// Store a credential under its id, replacing any with the same id.
    pub fn store_credential(&mut self, credential: &VerifiableCredential) -> WalletResult<()> {
        if credential.id.trim().is_empty() {
            return Err(WalletError::InvalidCredential(
                "credential id must not be empty".into(),
            ));
        }
        records::put_credential(self.store()?, credential)?;
        tracing::debug!(id = %credential.id, "credential stored");
        Ok(())
    }

    /// Every stored credential, in id order.
    pub fn get_credentials(&self) -> WalletResult<Vec<VerifiableCredential>> {
        Ok(records::get_credentials(self.store()?)?)
    }

    /// One credential by id, or `NotFound`.
    pub fn get_credential(&self, id: &str) -> WalletResult<VerifiableCredential> {
        records::get_credential(self.store()?, id)?.ok_or_else(|| WalletError::NotFound {
            what: "credential",
            key: id.to_string(),
        })
    }

    // -- Summary ------------------------------------------------------------

    /// Public information about the wallet. Never includes secrets.
    pub fn summary(&self) -> WalletResult<WalletSummary> {
        let store = self.store()?;
        let identity_count = store.count(Table::Identity)?;
        let credential_count = store.count(Table::Credentials)?;

        let (did, public_key_hex, created_at) = match &self.identity {
            Some(identity) => (
                Some(identity.did.clone()),
                Some(identity.public_key_hex()),
                Some(identity.created_at),
            ),
            None => match records::identity_dids(store)?.first() {
                Some(did) => match records::get_identity(store, did)? {
                    Some(record) => (
                        Some(record.did),
                        Some(hex::encode(&record.public_key)),
                        Some(record.created_at),
                    ),
                    None => (None, None, None),
                },
                None => (None, None, None),
            },
        };

        Ok(WalletSummary {
            did,
            public_key_hex,
            created_at,
            identity_count,
            credential_count,
            state: self.state,
        })
    }

    fn store(&self) -> WalletResult<&dyn WalletStore> {
        self.store.as_deref().ok_or(WalletError::NotInitialized)
    }
}
