// src/models/did.rs
//! Decentralized Identifier (DID) data model implementation.
//!
//! Defines the DID record stored in the ledger world state together with its
//! authentication-method descriptors. The JSON keys are the ones already
//! present on existing ledgers and must not change.

use serde::{Serialize, Deserialize};

/// Attribute label carried by the bootstrap certification authorities.
pub const CERTIFICATION_AUTHORITY: &str = "CertificationAuthority";

/// Attribute label for identities that own medical data.
pub const PATIENT: &str = "Patient";

/// A single authentication-method descriptor of a DID.
///
/// # Fields
/// - `id`: Sub-identifier of the method (e.g. `did:CA:000001#keys-1`)
/// - `attribute`: Role label such as `CertificationAuthority` or `Patient`
/// - `key_type`: Key algorithm tag (e.g. `Secp256k1`)
/// - `controller`: DID controlling this method. Not checked against the ledger.
/// - `public_key`: Opaque public key material
/// - `issued_at`: RFC 3339 timestamp assigned by the contract at creation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthInfo {
    #[serde(rename = "authid")]
    pub id: String,

    #[serde(rename = "attribute")]
    pub attribute: String,

    #[serde(rename = "keytype")]
    pub key_type: String,

    #[serde(rename = "controller")]
    pub controller: String,

    #[serde(rename = "pubkey")]
    pub public_key: String,

    #[serde(rename = "time")]
    pub issued_at: String,
}

/// A DID record as stored under its identifier in the world state.
///
/// # Invariants
/// - `auth_info` holds at least one descriptor
/// - `id` is unique across the whole keyspace, DIDs and medical data alike
///
/// # Serialization
/// ```text
/// {"DID":"did:CA:000001","authinfo":[{"authid":...}],"Sign":"..."}
/// ```
/// `Sign` is always written, as an empty string when no detached signature
/// was supplied.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Did {
    /// The complete DID string identifier
    /// Example: "did:CA:000001"
    #[serde(rename = "DID")]
    pub id: String,

    /// Ordered authentication-method descriptors
    #[serde(rename = "authinfo")]
    pub auth_info: Vec<AuthInfo>,

    /// Detached signature over the record, empty when absent
    #[serde(rename = "Sign", default)]
    pub signature: String,
}

impl Did {
    /// Builds a DID with exactly one authentication descriptor.
    pub fn with_single_method(
        id: impl Into<String>,
        method: AuthInfo,
        signature: impl Into<String>,
    ) -> Self {
        Did {
            id: id.into(),
            auth_info: vec![method],
            signature: signature.into(),
        }
    }

    /// Attribute of the first descriptor, which is the role the DID acts under.
    pub fn primary_attribute(&self) -> Option<&str> {
        self.auth_info.first().map(|method| method.attribute.as_str())
    }
}
