// src/bin/medledger-cli.rs

//! Command-line client for the medical DID gateway.
//!
//! ```text
//! medledger-cli [--gateway URL] <Function> <args...>
//! ```
//!
//! Subcommands carry the contract's wire names and argument order.
//! `CreateMedicalData` takes a file path in place of the hash; the gateway
//! hashes the uploaded content.

use anyhow::{bail, Context};
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use log::{debug, info};
use reqwest::multipart;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Medical DID ledger CLI
#[derive(Parser, Debug)]
#[command(name = "medledger-cli", version, long_about = None)]
struct Cli {
    /// Base URL of the medledger gateway
    #[arg(long, env = "MEDLEDGER_GATEWAY", default_value = "http://localhost:8085")]
    gateway: String,

    #[command(subcommand)]
    function: Function,
}

/// Contract transactions exposed by the gateway
#[derive(Subcommand, Debug)]
enum Function {
    /// Seed the bootstrap certification authorities
    #[command(name = "InitLedger")]
    InitLedger,

    /// Issue a new DID
    #[command(name = "CreateDID")]
    CreateDid(CreateDidArgs),

    /// Read a DID record
    #[command(name = "ReadDID")]
    ReadDid { did: String },

    /// Upload a medical artifact and register its hash
    #[command(name = "CreateMedicalData")]
    CreateMedicalData(UploadArgs),

    /// Read a medical data record
    #[command(name = "ReadMedicalData")]
    ReadMedicalData { hash: String },

    /// Check that a DID owns a medical data record
    #[command(name = "ValidateMedicalData")]
    ValidateMedicalData { hash: String, did: String },

    /// Check whether a medical data record may be shared with a DID
    #[command(name = "ShareMedicalData")]
    ShareMedicalData { hash: String, did: String },
}

#[derive(Args, Debug)]
struct CreateDidArgs {
    did: String,
    auth_id: String,
    attribute: String,
    key_type: String,
    controller: String,
    key: String,
    /// Detached signature stored with the record
    sign: Option<String>,
}

#[derive(Args, Debug)]
struct UploadArgs {
    file: PathBuf,
    /// Integer access level
    #[arg(allow_negative_numbers = true)]
    access_level: String,
    metadata: String,
    owner: String,
}

impl Function {
    /// Gateway route, identical to the wire name.
    fn route(&self) -> &'static str {
        match self {
            Function::InitLedger => "InitLedger",
            Function::CreateDid(_) => "CreateDID",
            Function::ReadDid { .. } => "ReadDID",
            Function::CreateMedicalData(_) => "CreateMedicalData",
            Function::ReadMedicalData { .. } => "ReadMedicalData",
            Function::ValidateMedicalData { .. } => "ValidateMedicalData",
            Function::ShareMedicalData { .. } => "ShareMedicalData",
        }
    }

    /// JSON body for the POST endpoints, `None` for the others.
    fn json_body(&self) -> Option<Value> {
        match self {
            Function::CreateDid(args) => {
                let mut body = json!({
                    "DID": args.did,
                    "AuthID": args.auth_id,
                    "Attribute": args.attribute,
                    "Keytype": args.key_type,
                    "Controller": args.controller,
                    "Key": args.key,
                });
                if let Some(sign) = &args.sign {
                    body["Sign"] = json!(sign);
                }
                Some(body)
            }
            Function::ReadDid { did } => Some(json!({ "DID": did })),
            Function::ReadMedicalData { hash } => Some(json!({ "Hash": hash })),
            Function::ValidateMedicalData { hash, did } | Function::ShareMedicalData { hash, did } => {
                Some(json!({ "Hash": hash, "DID": did }))
            }
            Function::InitLedger | Function::CreateMedicalData(_) => None,
        }
    }
}

async fn upload_form(args: &UploadArgs) -> anyhow::Result<multipart::Form> {
    let path = Path::new(&args.file);
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "MedicalData".to_string());
    debug!("uploading {} ({} bytes)", file_name, content.len());

    Ok(multipart::Form::new()
        .part("MedicalData", multipart::Part::bytes(content).file_name(file_name))
        .text("AccessLevel", args.access_level.clone())
        .text("Metadata", args.metadata.clone())
        .text("OwnerID", args.owner.clone()))
}

async fn call_gateway(client: &reqwest::Client, cli: &Cli) -> anyhow::Result<(u16, Value)> {
    let gateway = cli.gateway.trim_end_matches('/');
    let url = format!("{}/{}", gateway, cli.function.route());
    info!("calling {}", url);

    let request = match &cli.function {
        Function::InitLedger => client.get(&url),
        Function::CreateMedicalData(args) => client.post(&url).multipart(upload_form(args).await?),
        function => match function.json_body() {
            Some(body) => client.post(&url).json(&body),
            None => bail!("{} has no JSON body", function.route()),
        },
    };

    let response = request
        .send()
        .await
        .with_context(|| format!("gateway {} unreachable", gateway))?;
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.context("gateway returned a non-JSON body")?;
    Ok((status, body))
}

/// Argument-count mistakes are flagged with `Not Expected Argument` ahead of
/// clap's own diagnostic.
fn is_arity_error(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::MissingRequiredArgument | ErrorKind::UnknownArgument | ErrorKind::TooManyValues
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if is_arity_error(err.kind()) {
                eprintln!("Not Expected Argument");
            }
            err.exit()
        }
    };

    let client = reqwest::Client::new();
    let (status, body) = call_gateway(&client, &cli).await?;

    println!("{}", serde_json::to_string_pretty(&body)?);
    if status >= 400 {
        bail!("{} failed with status {}", cli.function.route(), status);
    }
    Ok(())
}
