// src/contracts/error.rs
//! Typed failures returned by contract operations.
//!
//! Every failure is surfaced to the caller. The contract never retries and
//! never swallows an error; the peer discards the transaction's writes.

use thiserror::Error;

/// Failure of a contract operation.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Key absent on read, validate, share or delete
    #[error("the asset {0} does not exist")]
    NotFound(String),

    /// Key already present on create
    #[error("the asset {0} already exists")]
    AlreadyExists(String),

    /// Stored owner differs from the DID submitted for validation
    #[error("medicaldata's owner {owner} is not equal to submitted did {did}")]
    OwnerMismatch { owner: String, did: String },

    /// Share policy rejected the request
    #[error("AccessLevel X: {policy} policy refuses to share {hash} with {did}")]
    Unauthorized {
        policy: &'static str,
        hash: String,
        did: String,
    },

    /// Stored bytes do not decode into the expected record shape
    #[error("record stored under {key} is malformed: {reason}")]
    Malformed { key: String, reason: String },

    /// Record could not be encoded before writing
    #[error("failed to encode record {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Underlying world-state get/put/delete failed
    #[error("failed to access world state: {0}")]
    Storage(String),

    /// Wrong argument count or unparsable argument on the wire
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("function {0} is not defined by the contract")]
    UnknownFunction(String),
}

pub type Result<T> = std::result::Result<T, ContractError>;
