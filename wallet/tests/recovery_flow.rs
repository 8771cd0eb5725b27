//! End-to-end tests for the wallet's backup and recovery flow.
//!
//! These drive the public API the way an application would: seal an
//! identity, unlock it, export shares, lose the wallet, and come back from
//! the shares. Each test owns its own store; nothing is shared.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use veriskill_wallet::recovery::{recover_secret, split_secret, RecoveryKit, RecoveryShare};
use veriskill_wallet::storage::records;
use veriskill_wallet::storage::{SledStore, Table, WalletStore};
use veriskill_wallet::{
    DigitalIdentity, ErrorKind, KdfParams, StorageBackend, VerifiableCredential, WalletConfig,
    WalletError, WalletFacade, WalletState,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn memory_wallet() -> WalletFacade {
    let mut wallet =
        WalletFacade::new(WalletConfig::default().with_kdf(KdfParams::low_memory()));
    wallet.initialize().expect("memory store opens");
    wallet
}

fn disk_config(dir: &std::path::Path) -> WalletConfig {
    WalletConfig::on_disk(dir).with_kdf(KdfParams::low_memory())
}

/// A real Ed25519 identity, as the DID layer would hand it over.
fn ed25519_identity() -> (DigitalIdentity, SigningKey) {
    let signing_key = SigningKey::generate(&mut OsRng);
    let public = signing_key.verifying_key().to_bytes().to_vec();
    let did = format!("did:key:z{}", hex::encode(&public));
    let identity =
        DigitalIdentity::new(did, public, signing_key.to_bytes().to_vec()).expect("valid identity");
    (identity, signing_key)
}

fn pick(shares: &[RecoveryShare], indices: &[u8]) -> Vec<RecoveryShare> {
    indices
        .iter()
        .map(|&i| shares.iter().find(|s| s.index == i).unwrap().clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn zero_secret_3_of_5_recovers_from_shares_1_3_4() {
    let secret = [0u8; 32];
    let shares = split_secret(&secret, 3, 5).unwrap();
    let recovered = recover_secret(&pick(&shares, &[1, 3, 4])).unwrap();
    assert_eq!(recovered.as_slice(), &secret);
}

#[test]
fn zero_secret_3_of_5_refuses_shares_1_3() {
    let shares = split_secret(&[0u8; 32], 3, 5).unwrap();
    let err: WalletError = recover_secret(&pick(&shares, &[1, 3])).unwrap_err().into();
    assert_eq!(err.kind(), ErrorKind::InsufficientShares);
}

#[test]
fn threshold_of_one_is_invalid() {
    let err: WalletError = split_secret(&[0u8; 32], 1, 5).unwrap_err().into();
    assert_eq!(err.kind(), ErrorKind::InvalidParameters);
}

#[test]
fn correct_passphrase_unlocks_wrong_one_fails() {
    let mut wallet = memory_wallet();
    let (identity, _) = ed25519_identity();

    wallet.store_identity(&identity, "correct-horse").unwrap();
    wallet.unlock(&identity.did, "correct-horse").unwrap();
    assert_eq!(
        wallet.identity().unwrap().key_pair.private_key.as_slice(),
        identity.key_pair.private_key.as_slice()
    );

    let err = wallet.unlock(&identity.did, "wrong").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecryptionFailed);
    assert_eq!(wallet.state(), WalletState::Locked);
}

// ---------------------------------------------------------------------------
// Full flows
// ---------------------------------------------------------------------------

#[test]
fn recovered_ed25519_key_still_signs() {
    let mut wallet = memory_wallet();
    let (identity, original_key) = ed25519_identity();

    wallet.store_identity(&identity, "pw").unwrap();
    wallet.unlock(&identity.did, "pw").unwrap();
    let shares = wallet.export_recovery_shares(3, 5).unwrap();

    // The device is lost. A fresh wallet and three friends.
    let mut fresh = memory_wallet();
    fresh
        .recover_identity(
            &[&shares[1], &shares[3], &shares[4]],
            &identity.did,
            identity.key_pair.public_key.clone(),
        )
        .unwrap();
    assert_eq!(fresh.state(), WalletState::Unlocked);

    let recovered = fresh.identity().unwrap();
    let key_bytes: [u8; 32] = recovered.key_pair.private_key.as_slice().try_into().unwrap();
    let signing_key = SigningKey::from_bytes(&key_bytes);
    assert_eq!(signing_key.verifying_key(), original_key.verifying_key());

    let message = b"credential presentation nonce 42";
    let signature = signing_key.sign(message);
    let verifying_key =
        VerifyingKey::from_bytes(&recovered.key_pair.public_key.as_slice().try_into().unwrap())
            .unwrap();
    assert!(verifying_key.verify(message, &signature).is_ok());

    // Persist under a new passphrase and come back to it.
    fresh.reseal("new passphrase").unwrap();
    fresh.lock().unwrap();
    fresh.unlock(&identity.did, "new passphrase").unwrap();
}

#[test]
fn recovery_kit_file_round_trip() {
    let mut wallet = memory_wallet();
    let (identity, _) = ed25519_identity();
    wallet.store_identity(&identity, "pw").unwrap();
    wallet.unlock(&identity.did, "pw").unwrap();

    let json = wallet.export_recovery_kit(2, 3).unwrap().to_json().unwrap();
    let kit = RecoveryKit::from_json(&json).unwrap();

    let mut fresh = memory_wallet();
    fresh
        .recover_identity(&kit.shares[..2], &kit.did, identity.key_pair.public_key.clone())
        .unwrap();
    assert_eq!(
        fresh.identity().unwrap().key_pair.private_key.as_slice(),
        identity.key_pair.private_key.as_slice()
    );
}

#[test]
fn shares_from_two_exports_do_not_mix() {
    let mut wallet = memory_wallet();
    let (identity, _) = ed25519_identity();
    wallet.store_identity(&identity, "pw").unwrap();
    wallet.unlock(&identity.did, "pw").unwrap();

    let first = wallet.export_recovery_shares(2, 3).unwrap();
    let second = wallet.export_recovery_shares(2, 4).unwrap();
    wallet.lock().unwrap();

    let err = wallet
        .recover_identity(
            &[&first[0], &second[1]],
            &identity.did,
            identity.key_pair.public_key.clone(),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InconsistentShares);
    assert_eq!(wallet.state(), WalletState::Locked);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn sled_wallet_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let (identity, _) = ed25519_identity();
    let vc = VerifiableCredential::new(
        "urn:vc:rust-cert",
        vec!["VerifiableCredential".into(), "SkillCredential".into()],
        "did:web:academy.example",
        "2026-06-01T00:00:00Z",
        serde_json::json!({ "id": identity.did, "skill": "Rust" }),
    );

    {
        let mut wallet = WalletFacade::new(disk_config(dir.path()));
        wallet.initialize().unwrap();
        wallet.store_identity(&identity, "pw").unwrap();
        wallet.store_credential(&vc).unwrap();
        wallet.close().unwrap();
    }

    let mut wallet = WalletFacade::new(disk_config(dir.path()));
    wallet.initialize().unwrap();
    assert_eq!(wallet.stored_identities().unwrap(), vec![identity.did.clone()]);
    assert_eq!(wallet.get_credential("urn:vc:rust-cert").unwrap(), vc);

    wallet.unlock(&identity.did, "pw").unwrap();
    assert_eq!(
        wallet.identity().unwrap().created_at,
        identity.created_at
    );
}

#[test]
fn stored_record_never_contains_plaintext_key() {
    let dir = tempfile::tempdir().unwrap();
    let (identity, _) = ed25519_identity();
    {
        let mut wallet = WalletFacade::new(disk_config(dir.path()));
        wallet.initialize().unwrap();
        wallet.store_identity(&identity, "pw").unwrap();
        wallet.close().unwrap();
    }

    let store = SledStore::open(dir.path().join("wallet-db")).unwrap();
    let raw = store.get(Table::Identity, &identity.did).unwrap().unwrap();
    let secret = identity.key_pair.private_key.as_slice();
    assert!(!raw.windows(secret.len()).any(|w| w == secret));
}

#[test]
fn tampered_record_fails_like_a_wrong_passphrase() {
    let dir = tempfile::tempdir().unwrap();
    let (identity, _) = ed25519_identity();
    {
        let mut wallet = WalletFacade::new(disk_config(dir.path()));
        wallet.initialize().unwrap();
        wallet.store_identity(&identity, "pw").unwrap();
        wallet.close().unwrap();
    }

    {
        let store = SledStore::open(dir.path().join("wallet-db")).unwrap();
        let mut record = records::get_identity(&store, &identity.did)
            .unwrap()
            .unwrap();
        record.encrypted_private_key.ciphertext[0] ^= 0x80;
        records::put_identity(&store, &record).unwrap();
    }

    let mut wallet = WalletFacade::new(disk_config(dir.path()));
    wallet.initialize().unwrap();
    let err = wallet.unlock(&identity.did, "pw").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecryptionFailed);
    assert_eq!(err.to_string(), "decryption failed");
}

#[test]
fn inflated_kdf_cost_in_record_fails_promptly() {
    let dir = tempfile::tempdir().unwrap();
    let (identity, _) = ed25519_identity();
    {
        let mut wallet = WalletFacade::new(disk_config(dir.path()));
        wallet.initialize().unwrap();
        wallet.store_identity(&identity, "pw").unwrap();
        wallet.close().unwrap();
    }

    for (memory_cost_kib, iterations) in [(1024, u32::MAX), (u32::MAX, 1)] {
        {
            let store = SledStore::open(dir.path().join("wallet-db")).unwrap();
            let mut record = records::get_identity(&store, &identity.did)
                .unwrap()
                .unwrap();
            record.encrypted_private_key.kdf_params.memory_cost_kib = memory_cost_kib;
            record.encrypted_private_key.kdf_params.iterations = iterations;
            records::put_identity(&store, &record).unwrap();
        }

        let path = dir.path().to_path_buf();
        let did = identity.did.clone();
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let mut wallet = WalletFacade::new(disk_config(&path));
            wallet.initialize().unwrap();
            let kind = wallet.unlock(&did, "pw").unwrap_err().kind();
            let state = wallet.state();
            wallet.close().unwrap();
            tx.send((kind, state)).unwrap();
        });

        let (kind, state) = rx
            .recv_timeout(std::time::Duration::from_secs(15))
            .expect("unlock returned");
        assert_eq!(kind, ErrorKind::DecryptionFailed);
        assert_eq!(state, WalletState::Locked);
    }
}

#[test]
fn unopenable_store_is_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let config = WalletConfig::default().with_storage(StorageBackend::Sled {
        path: blocker.join("db"),
    });
    let mut wallet = WalletFacade::new(config);
    let err = wallet.initialize().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
    assert_eq!(wallet.state(), WalletState::Uninitialized);
}
