//! Verifiable credentials as the wallet stores them.
//!
//! The wallet does not verify or interpret credentials. It keeps the
//! W3C-shaped fields it needs for indexing and display and carries every
//! other field through storage untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A W3C verifiable credential, held opaquely.
///
/// Unknown top-level fields (`@context`, `credentialStatus`,
/// `expirationDate`, ...) land in `extra` and are written back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    /// Storage key. Must be non-empty.
    pub id: String,
    /// The `type` array, e.g. `["VerifiableCredential", "SkillCredential"]`.
    #[serde(rename = "type", default)]
    pub types: Vec<String>,
    /// A URI string or an issuer object.
    pub issuer: Value,
    /// Issuance timestamp as written by the issuer. Not parsed.
    pub issuance_date: String,
    /// Claims about the holder.
    pub credential_subject: Value,
    /// Issuer's proof, kept as-is. The wallet never verifies it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Value>,
    /// Every other top-level field.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerifiableCredential {
    /// A minimal credential with no proof and no extra fields.
    pub fn new(
        id: impl Into<String>,
        types: Vec<String>,
        issuer: impl Into<String>,
        issuance_date: impl Into<String>,
        credential_subject: Value,
    ) -> Self {
        Self {
            id: id.into(),
            types,
            issuer: Value::String(issuer.into()),
            issuance_date: issuance_date.into(),
            credential_subject,
            proof: None,
            extra: Map::new(),
        }
    }

    /// Issuer id, whether `issuer` is a bare URI or an object with an `id`.
    pub fn issuer_id(&self) -> Option<&str> {
        match &self.issuer {
            Value::String(s) => Some(s.as_str()),
            Value::Object(o) => o.get("id").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Compact JSON, the form stored in the credentials table.
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Parse a credential from JSON bytes.
    pub fn from_json_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
