// src/blockchain/peer.rs
//! In-process ledger peer hosting the registry contract.
//!
//! Executes transactions in two phases:
//! 1. **Simulate**: run the contract against a consistent snapshot of the
//!    world state, recording the version of every key read and buffering
//!    every write into a read/write set.
//! 2. **Commit**: under the write lock, reject the read/write set if any key
//!    it read has changed since (optimistic concurrency), otherwise apply all
//!    writes atomically as a new block.
//!
//! A contract failure discards the read/write set, so no partial record is
//! ever visible. Transactions are never retried here.

use crate::blockchain::error::LedgerError;
use crate::contracts::context::TransactionContext;
use crate::contracts::error::{ContractError, Result as ContractResult};
use crate::contracts::medical_registry::MedicalRegistry;
use crate::utils::crypto::hash_data;
use crate::wallet::identity::verify;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Unsigned body of a transaction proposal.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProposalPayload {
    pub channel: String,
    pub contract: String,
    pub function: String,
    pub args: Vec<String>,
    /// Compressed SEC1 public key of the submitting identity, hex encoded
    pub creator: String,
    pub timestamp: DateTime<Utc>,
}

impl ProposalPayload {
    /// Canonical bytes covered by the creator's signature.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        serde_json::to_vec(self).map_err(LedgerError::Proposal)
    }
}

/// Proposal as delivered to the peer.
#[derive(Debug, Clone)]
pub struct SignedProposal {
    pub payload: ProposalPayload,
    pub signature: Vec<u8>,
}

impl SignedProposal {
    /// Transaction id: hex SHA-256 over payload and signature.
    pub fn tx_id(&self) -> Result<String, LedgerError> {
        let mut material = self.payload.signing_bytes()?;
        material.extend_from_slice(&self.signature);
        Ok(hex::encode(hash_data(&material)))
    }
}

#[derive(Debug, Clone)]
struct VersionedValue {
    value: Vec<u8>,
    /// Block that last wrote the key
    version: u64,
}

#[derive(Debug, Default)]
struct WorldState {
    entries: BTreeMap<String, VersionedValue>,
    height: u64,
}

/// Keys read (with the version observed, `None` when absent) and writes
/// buffered (`None` marks a delete) by one simulated transaction.
#[derive(Debug, Clone, Default)]
pub struct ReadWriteSet {
    pub tx_id: String,
    reads: BTreeMap<String, Option<u64>>,
    writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl ReadWriteSet {
    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Output of a successful simulation.
#[derive(Debug)]
pub struct Simulation {
    pub rwset: ReadWriteSet,
    pub payload: Vec<u8>,
}

/// Transaction context over a locked snapshot. Reads observe the snapshot
/// only, never the transaction's own pending writes.
struct TxSimulator<'a> {
    snapshot: &'a WorldState,
    rwset: ReadWriteSet,
    timestamp: DateTime<Utc>,
}

/// World-state keys must be non-empty and must not start with the NUL byte
/// reserved for composite keys.
fn check_key(key: &str) -> ContractResult<()> {
    if key.is_empty() {
        return Err(ContractError::Storage("key must not be an empty string".to_string()));
    }
    if key.starts_with('\u{0}') {
        return Err(ContractError::Storage(format!("key {:?} uses the reserved composite-key namespace", key)));
    }
    Ok(())
}

impl TransactionContext for TxSimulator<'_> {
    fn get_state(&mut self, key: &str) -> ContractResult<Option<Vec<u8>>> {
        check_key(key)?;
        let entry = self.snapshot.entries.get(key);
        self.rwset
            .reads
            .entry(key.to_string())
            .or_insert_with(|| entry.map(|e| e.version));
        Ok(entry.map(|e| e.value.clone()))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> ContractResult<()> {
        check_key(key)?;
        self.rwset.writes.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> ContractResult<()> {
        check_key(key)?;
        self.rwset.writes.insert(key.to_string(), None);
        Ok(())
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Ledger peer for one channel with one deployed contract.
pub struct Peer {
    channel: String,
    contract_name: String,
    contract: MedicalRegistry,
    state: RwLock<WorldState>,
}

impl Peer {
    pub fn new(
        channel: impl Into<String>,
        contract_name: impl Into<String>,
        contract: MedicalRegistry,
    ) -> Self {
        Peer {
            channel: channel.into(),
            contract_name: contract_name.into(),
            contract,
            state: RwLock::new(WorldState::default()),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    /// Number of committed blocks.
    pub fn height(&self) -> Result<u64, LedgerError> {
        let state = self.state.read().map_err(|_| LedgerError::StatePoisoned)?;
        Ok(state.height)
    }

    fn endorse(&self, proposal: &SignedProposal) -> Result<(), LedgerError> {
        let payload = &proposal.payload;
        if payload.channel != self.channel || payload.contract != self.contract_name {
            return Err(LedgerError::UnknownContract {
                channel: payload.channel.clone(),
                contract: payload.contract.clone(),
            });
        }
        verify(&payload.creator, &payload.signing_bytes()?, &proposal.signature)
            .map_err(|e| LedgerError::Endorsement(e.to_string()))
    }

    /// Verifies and executes `proposal` against the current snapshot without
    /// committing anything.
    pub fn simulate(&self, proposal: &SignedProposal) -> Result<Simulation, LedgerError> {
        self.endorse(proposal)?;

        let tx_id = proposal.tx_id()?;
        let state = self.state.read().map_err(|_| LedgerError::StatePoisoned)?;
        let mut simulator = TxSimulator {
            snapshot: &state,
            rwset: ReadWriteSet { tx_id: tx_id.clone(), ..ReadWriteSet::default() },
            timestamp: proposal.payload.timestamp,
        };

        let payload = self
            .contract
            .invoke(&mut simulator, &proposal.payload.function, &proposal.payload.args)
            .map_err(|e| {
                debug!("transaction {} ({}) rejected by contract: {}", tx_id, proposal.payload.function, e);
                LedgerError::Contract(e)
            })?;

        Ok(Simulation { rwset: simulator.rwset, payload })
    }

    /// Validates the read set of `rwset` against the committed state and
    /// applies its writes as one block.
    ///
    /// # Returns
    /// Number of the committed block
    pub fn commit(&self, rwset: ReadWriteSet) -> Result<u64, LedgerError> {
        let mut state = self.state.write().map_err(|_| LedgerError::StatePoisoned)?;

        for (key, read_version) in &rwset.reads {
            let current = state.entries.get(key).map(|e| e.version);
            if current != *read_version {
                warn!("transaction {} invalidated by concurrent write to {}", rwset.tx_id, key);
                return Err(LedgerError::MvccConflict {
                    tx_id: rwset.tx_id.clone(),
                    key: key.clone(),
                });
            }
        }

        state.height += 1;
        let block = state.height;
        let write_count = rwset.writes.len();
        for (key, write) in rwset.writes {
            match write {
                Some(value) => {
                    state.entries.insert(key, VersionedValue { value, version: block });
                }
                None => {
                    state.entries.remove(&key);
                }
            }
        }
        info!("committed transaction {} in block {} ({} writes)", rwset.tx_id, block, write_count);
        Ok(block)
    }

    /// Simulates and commits `proposal`, returning the contract result.
    pub fn submit(&self, proposal: &SignedProposal) -> Result<Vec<u8>, LedgerError> {
        let simulation = self.simulate(proposal)?;
        if simulation.rwset.is_read_only() {
            debug!("transaction {} submitted with an empty write set", simulation.rwset.tx_id);
        }
        self.commit(simulation.rwset)?;
        Ok(simulation.payload)
    }

    /// Simulates `proposal` and returns the contract result without committing.
    pub fn evaluate(&self, proposal: &SignedProposal) -> Result<Vec<u8>, LedgerError> {
        Ok(self.simulate(proposal)?.payload)
    }
}
