// src/main.rs

//! # Medical DID Ledger - Gateway Entry Point
//!
//! Starts an in-process ledger peer hosting the DID / MedicalData registry
//! contract and exposes it through the HTTP gateway.
//!
//! ## Architecture Overview
//! 1. **Contract Layer**: `MedicalRegistry` state-transition rules over an abstract world state
//! 2. **Ledger Layer**: `Peer` (simulate / MVCC commit) and `LedgerClient` (signed proposals)
//! 3. **Wallet Layer**: file-system wallet holding the gateway's secp256k1 identity
//! 4. **Services Layer**: axum gateway mapping endpoints to transactions
//!
//! ## Configuration
//! Defaults, then `medledger.toml`, then `MEDLEDGER_*` environment variables
//! (`.env` is honoured). See [`settings::GatewayConfig`].

use crate::blockchain::ledger_client::LedgerClient;
use crate::blockchain::peer::Peer;
use crate::contracts::medical_registry::MedicalRegistry;
use crate::services::api_server::{ApiServer, GatewayContext};
use crate::settings::GatewayConfig;
use crate::wallet::file_wallet::FileSystemWallet;
use anyhow::Context;
use dotenv::dotenv;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;

// Module declarations (organized by functional domain)
mod blockchain;    // Ledger peer and contract handle
mod contracts;     // Registry contract logic
mod models;        // Ledger record structures
mod services;      // HTTP gateway
mod settings;      // Gateway configuration
mod utils;         // Hashing and serialization helpers
mod wallet;        // Client identities

/// Main application entry point
///
/// # Initialization Sequence
/// 1. Load environment and configuration
/// 2. Load or create the gateway identity
/// 3. Start the peer and connect the contract handle
/// 4. Serve the gateway until Ctrl-C
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GatewayConfig::load().context("failed to load gateway configuration")?;
    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("invalid listen_addr {}", config.listen_addr))?;

    let wallet = FileSystemWallet::open(&config.wallet_path)
        .with_context(|| format!("failed to open wallet at {}", config.wallet_path.display()))?;
    let identity = wallet
        .load_or_create(&config.identity_label, &config.msp_id)
        .context("failed to populate wallet")?;

    let registry = MedicalRegistry::new(config.share_policy.build(config.access_level_threshold));
    info!("share policy: {}", registry.share_policy_name());
    let peer = Arc::new(Peer::new(config.channel.as_str(), config.contract.as_str(), registry));

    let client = LedgerClient::connect(Arc::clone(&peer), identity, &config.channel, &config.contract)
        .context("failed to connect to gateway")?;
    info!("gateway identity {} ({})", client.identity().label, client.identity().public_key_hex());

    let api_server = ApiServer::new(GatewayContext::new(client), config.max_upload_bytes);
    api_server.run(addr).await.context("gateway server failed")?;

    info!("gateway stopped at block height {}", peer.height()?);
    Ok(())
}
