// src/contracts/context.rs
//! World-state accessor consumed by the contract.
//!
//! The host ledger provides one context per transaction. Reads see a
//! consistent snapshot; writes become visible atomically when the host
//! commits, and are dropped if the contract returns an error.

use crate::contracts::error::Result;
use chrono::{DateTime, Utc};

/// Per-transaction view of the world state.
///
/// Reads take `&mut self` so hosts can record the read set for
/// optimistic concurrency checks at commit.
pub trait TransactionContext {
    /// Returns the bytes stored under `key`, or `None` when absent.
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stages `value` under `key`.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Stages removal of `key`.
    fn del_state(&mut self, key: &str) -> Result<()>;

    /// Timestamp fixed by the client when the transaction was proposed.
    fn tx_timestamp(&self) -> DateTime<Utc>;
}
