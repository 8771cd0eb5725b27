//! Typed records and their byte encodings.
//!
//! Stores deal in raw bytes. The helpers here put typed records in and get
//! them back out, so every [`WalletStore`] engine sees the same bytes for
//! the same record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{StoreError, StoreResult, Table, WalletStore};
use crate::crypto::EncryptedBlob;
use crate::identity::VerifiableCredential;

/// An identity at rest: the public half in the clear, the private key sealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Storage key.
    pub did: String,
    /// Public key bytes.
    pub public_key: Vec<u8>,
    /// Private key sealed under the wallet passphrase, bound to `did`.
    pub encrypted_private_key: EncryptedBlob,
    /// When the identity was first stored.
    pub created_at: DateTime<Utc>,
}

impl IdentityRecord {
    /// bincode encoding, as written to the identity table.
    pub fn to_bytes(&self) -> StoreResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Inverse of [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> StoreResult<Self> {
        bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

// -- Identity table ----------------------------------------------------------

/// Persist an identity record under its DID, replacing any previous one.
pub fn put_identity(store: &dyn WalletStore, record: &IdentityRecord) -> StoreResult<()> {
    store.put(Table::Identity, &record.did, &record.to_bytes()?)
}

/// Load the identity record for `did`, if any.
pub fn get_identity(store: &dyn WalletStore, did: &str) -> StoreResult<Option<IdentityRecord>> {
    store
        .get(Table::Identity, did)?
        .map(|bytes| IdentityRecord::from_bytes(&bytes))
        .transpose()
}

/// DIDs of every stored identity, in key order.
pub fn identity_dids(store: &dyn WalletStore) -> StoreResult<Vec<String>> {
    Ok(store
        .get_all(Table::Identity)?
        .into_iter()
        .map(|(did, _)| did)
        .collect())
}

// -- Credentials table -------------------------------------------------------

/// Persist a credential under its id, replacing any previous one.
pub fn put_credential(store: &dyn WalletStore, credential: &VerifiableCredential) -> StoreResult<()> {
    let bytes = credential
        .to_json_bytes()
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    store.put(Table::Credentials, &credential.id, &bytes)
}

/// Load one credential by id, if any.
pub fn get_credential(
    store: &dyn WalletStore,
    id: &str,
) -> StoreResult<Option<VerifiableCredential>> {
    store
        .get(Table::Credentials, id)?
        .map(|bytes| decode_credential(&bytes))
        .transpose()
}

/// Every stored credential, ordered by id.
pub fn get_credentials(store: &dyn WalletStore) -> StoreResult<Vec<VerifiableCredential>> {
    store
        .get_all(Table::Credentials)?
        .iter()
        .map(|(_, bytes)| decode_credential(bytes))
        .collect()
}

fn decode_credential(bytes: &[u8]) -> StoreResult<VerifiableCredential> {
    VerifiableCredential::from_json_bytes(bytes)
        .map_err(|e| StoreError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{KdfParams, KeyEncryptionService};
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn record(did: &str) -> IdentityRecord {
        let sealer = KeyEncryptionService::new(KdfParams::low_memory());
        IdentityRecord {
            did: did.to_string(),
            public_key: vec![0x02; 32],
            encrypted_private_key: sealer.encrypt(&[0x07; 32], "passphrase").unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn identity_record_bincode_round_trip() {
        let original = record("did:example:alice");
        let bytes = original.to_bytes().unwrap();
        assert_eq!(IdentityRecord::from_bytes(&bytes).unwrap(), original);
    }

    #[test]
    fn corrupt_identity_bytes_are_a_serialization_error() {
        assert!(matches!(
            IdentityRecord::from_bytes(&[0xFF, 0x00]),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn identities_listed_by_did() {
        let store = MemoryStore::new();
        put_identity(&store, &record("did:example:bob")).unwrap();
        put_identity(&store, &record("did:example:alice")).unwrap();

        assert_eq!(
            identity_dids(&store).unwrap(),
            ["did:example:alice", "did:example:bob"]
        );
        let alice = get_identity(&store, "did:example:alice").unwrap().unwrap();
        assert_eq!(alice.public_key, vec![0x02; 32]);
        assert!(get_identity(&store, "did:example:carol").unwrap().is_none());
    }

    #[test]
    fn credentials_round_trip_through_json() {
        let store = MemoryStore::new();
        let vc: VerifiableCredential = serde_json::from_value(json!({
            "id": "urn:vc:42",
            "type": ["VerifiableCredential"],
            "issuer": "did:web:issuer.example",
            "issuanceDate": "2026-05-01T00:00:00Z",
            "credentialSubject": { "skill": "cryptography" },
            "evidence": [{ "kind": "exam", "score": 97 }]
        }))
        .unwrap();

        put_credential(&store, &vc).unwrap();
        assert_eq!(get_credential(&store, "urn:vc:42").unwrap(), Some(vc.clone()));
        assert_eq!(get_credentials(&store).unwrap(), vec![vc]);
        assert!(get_credential(&store, "urn:vc:missing").unwrap().is_none());
    }
}
