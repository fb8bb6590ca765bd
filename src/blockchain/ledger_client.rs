// src/blockchain/ledger_client.rs
//! Contract handle used by the gateway.
//!
//! Binds a peer connection to a wallet identity and a channel/contract pair,
//! and turns named transactions into signed proposals.

use crate::blockchain::error::LedgerError;
use crate::blockchain::peer::{Peer, ProposalPayload, SignedProposal};
use crate::wallet::identity::Identity;
use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;

/// Client for submitting and evaluating registry transactions.
///
/// This client provides:
/// - Proposal construction signed by the wallet identity
/// - Submit (simulate + commit) for state-changing transactions
/// - Evaluate (simulate only) for queries
#[derive(Clone)]
pub struct LedgerClient {
    peer: Arc<Peer>,
    identity: Identity,
    channel: String,
    contract: String,
}

impl LedgerClient {
    /// Connects `identity` to `contract` on `channel` of `peer`.
    ///
    /// # Errors
    /// Returns `UnknownContract` if the peer does not host that pair.
    pub fn connect(
        peer: Arc<Peer>,
        identity: Identity,
        channel: &str,
        contract: &str,
    ) -> Result<Self, LedgerError> {
        if peer.channel() != channel || peer.contract_name() != contract {
            return Err(LedgerError::UnknownContract {
                channel: channel.to_string(),
                contract: contract.to_string(),
            });
        }
        info!(
            "connected identity {} ({}) to contract {} on channel {}",
            identity.label, identity.msp_id, contract, channel
        );
        Ok(LedgerClient {
            peer,
            identity,
            channel: channel.to_string(),
            contract: contract.to_string(),
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    fn propose(&self, function: &str, args: &[&str]) -> Result<SignedProposal, LedgerError> {
        let payload = ProposalPayload {
            channel: self.channel.clone(),
            contract: self.contract.clone(),
            function: function.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            creator: self.identity.public_key_hex(),
            timestamp: Utc::now(),
        };
        let signature = self.identity.sign(&payload.signing_bytes()?)?;
        Ok(SignedProposal { payload, signature })
    }

    /// Submits a transaction and waits for it to commit.
    ///
    /// # Returns
    /// Raw result bytes produced by the contract
    pub fn submit_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, LedgerError> {
        let proposal = self.propose(function, args)?;
        info!("--> Submit Transaction: {} {}", function, proposal.tx_id()?);
        self.peer.submit(&proposal)
    }

    /// Evaluates a transaction against the current world state without
    /// committing it.
    pub fn evaluate_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, LedgerError> {
        let proposal = self.propose(function, args)?;
        debug!("--> Evaluate Transaction: {}", function);
        self.peer.evaluate(&proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::medical_registry::MedicalRegistry;

    fn client() -> LedgerClient {
        let peer = Arc::new(Peer::new("mychannel", "basic", MedicalRegistry::default()));
        LedgerClient::connect(peer, Identity::generate("appUser", "Org1MSP"), "mychannel", "basic")
            .unwrap()
    }

    #[test]
    fn test_connect_rejects_unknown_contract() {
        let peer = Arc::new(Peer::new("mychannel", "basic", MedicalRegistry::default()));
        let result = LedgerClient::connect(peer, Identity::generate("u", "m"), "mychannel", "other");
        assert!(matches!(result, Err(LedgerError::UnknownContract { .. })));
    }

    #[test]
    fn test_init_then_read_authority() {
        let client = client();
        let result = client.submit_transaction("InitLedger", &[]).unwrap();
        assert!(result.is_empty());

        let bytes = client.evaluate_transaction("ReadDID", &["did:CA:000003"]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with(r#"{"DID":"did:CA:000003","authinfo":[{"authid":"did:CA:000003#keys-1""#));
    }

    #[test]
    fn test_init_twice_succeeds() {
        let client = client();
        client.submit_transaction("InitLedger", &[]).unwrap();
        client.submit_transaction("InitLedger", &[]).unwrap();
    }
}
