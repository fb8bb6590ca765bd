// src/settings.rs
//! Gateway configuration.
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. Optional `medledger.toml` in the working directory
//! 3. Environment variables prefixed `MEDLEDGER_` (a `.env` file is loaded
//!    into the environment first), e.g. `MEDLEDGER_SHARE_POLICY=access-level`

use crate::contracts::share_policy::{SharePolicyKind, DEFAULT_ACCESS_LEVEL_THRESHOLD};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Socket address the HTTP gateway binds to
    pub listen_addr: String,
    /// Directory of the file-system wallet
    pub wallet_path: PathBuf,
    /// Wallet label of the gateway's client identity
    pub identity_label: String,
    pub msp_id: String,
    pub channel: String,
    pub contract: String,
    pub share_policy: SharePolicyKind,
    pub access_level_threshold: i64,
    /// Upper bound on request bodies, medical data uploads included
    pub max_upload_bytes: usize,
}

impl GatewayConfig {
    /// Loads configuration from file and environment over the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("medledger").required(false))
                .add_source(Environment::with_prefix("MEDLEDGER")),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .set_default("listen_addr", "0.0.0.0:8085")?
            .set_default("wallet_path", "wallet")?
            .set_default("identity_label", "appUser")?
            .set_default("msp_id", "Org1MSP")?
            .set_default("channel", "mychannel")?
            .set_default("contract", "basic")?
            .set_default("share_policy", "role")?
            .set_default("access_level_threshold", DEFAULT_ACCESS_LEVEL_THRESHOLD)?
            .set_default("max_upload_bytes", 16_i64 * 1024 * 1024)?
            .build()?
            .try_deserialize()
    }
}
