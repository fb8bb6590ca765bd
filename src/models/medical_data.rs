// src/models/medical_data.rs
//! Medical data reference model.
//!
//! The ledger never stores the medical artifact itself, only its content hash
//! plus an access classification and the DID that claims ownership.

use serde::{Serialize, Deserialize};

/// A medical artifact reference stored under its content hash.
///
/// # Fields
/// - `hash`: Hex content hash computed by the caller, also the world-state key
/// - `access_level`: Classification consulted by share policies
/// - `metadata`: Free-form description
/// - `owner`: DID expected to own the artifact
///
/// # Deferred validation
/// `owner` is not checked when the record is created. It is only compared
/// against the ledger by `ValidateMedicalData` and `ShareMedicalData`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MedicalData {
    #[serde(rename = "hash")]
    pub hash: String,

    #[serde(rename = "accesslevel")]
    pub access_level: i64,

    #[serde(rename = "metadata")]
    pub metadata: String,

    #[serde(rename = "owner")]
    pub owner: String,
}
