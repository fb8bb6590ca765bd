// src/blockchain/error.rs
//! Failures reported by the ledger peer and its clients.

use crate::contracts::error::ContractError;
use crate::wallet::identity::IdentityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The contract rejected the transaction; no write was committed
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// A key read during simulation changed before commit
    #[error("transaction {tx_id} invalidated: key {key} changed since it was read (MVCC_READ_CONFLICT)")]
    MvccConflict { tx_id: String, key: String },

    /// Proposal signature did not verify against the creator key
    #[error("proposal endorsement failed: {0}")]
    Endorsement(String),

    /// Client could not sign the proposal
    #[error("failed to sign proposal: {0}")]
    Signing(#[from] IdentityError),

    /// Proposal payload could not be encoded for signing
    #[error("failed to encode proposal: {0}")]
    Proposal(#[source] serde_json::Error),

    #[error("contract {contract} is not deployed on channel {channel}")]
    UnknownContract { channel: String, contract: String },

    #[error("world state lock poisoned")]
    StatePoisoned,
}

impl LedgerError {
    /// True when the contract itself produced the failure.
    pub fn is_contract_failure(&self) -> bool {
        matches!(self, LedgerError::Contract(_))
    }
}
