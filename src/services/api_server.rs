// src/services/api_server.rs
//! HTTP gateway for the medical DID ledger.
//!
//! Exposes each registry transaction as an endpoint. The gateway has no
//! decision logic of its own: it binds request fields to positional
//! transaction arguments, hashes uploaded medical artifacts, and performs one
//! submit or evaluate round trip per request.
//!
//! Endpoints:
//! - `GET  /ping`
//! - `GET  /InitLedger`
//! - `POST /ReadDID`, `/ReadMedicalData` (evaluate)
//! - `POST /CreateDID`, `/CreateMedicalData`, `/ValidateMedicalData`,
//!   `/ShareMedicalData` (submit)

use crate::blockchain::error::LedgerError;
use crate::blockchain::ledger_client::LedgerClient;
use crate::utils::crypto::content_hash_hex;
use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::JsonRejection,
        DefaultBodyLimit, Json, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

// API request and response structures

/// Request payload naming a DID
#[derive(Serialize, Deserialize)]
struct ReadDidRequest {
    #[serde(rename = "DID")]
    did: String,
}

/// Request payload naming a medical data hash
#[derive(Serialize, Deserialize)]
struct ReadMedicalDataRequest {
    #[serde(rename = "Hash")]
    hash: String,
}

/// Request payload for creating a new DID
#[derive(Serialize, Deserialize)]
struct CreateDidRequest {
    #[serde(rename = "DID")]
    did: String,
    #[serde(rename = "AuthID")]
    auth_id: String,
    #[serde(rename = "Attribute")]
    attribute: String,
    #[serde(rename = "Keytype")]
    key_type: String,
    #[serde(rename = "Controller")]
    controller: String,
    #[serde(rename = "Key")]
    key: String,
    /// Optional detached signature
    #[serde(rename = "Sign", default)]
    sign: Option<String>,
}

/// Request payload pairing a medical data hash with a DID
#[derive(Serialize, Deserialize)]
struct MedicalDataDidRequest {
    #[serde(rename = "Hash")]
    hash: String,
    #[serde(rename = "DID")]
    did: String,
}

/// Successful response
#[derive(Serialize, Deserialize)]
struct MessageResponse {
    message: String,
}

/// Failure response
#[derive(Serialize, Deserialize)]
struct ErrorResponse {
    message: String,
    error: String,
}

fn ok(message: impl Into<String>) -> Response {
    (StatusCode::OK, Json(MessageResponse { message: message.into() })).into_response()
}

fn bad_request(error: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse { message: "Error".into(), error: error.into() }),
    )
        .into_response()
}

fn ledger_failure(err: LedgerError) -> Response {
    if err.is_contract_failure() {
        info!("transaction rejected: {}", err);
    } else {
        warn!("transaction failed: {}", err);
    }
    let status = match err {
        LedgerError::StatePoisoned | LedgerError::Signing(_) | LedgerError::Proposal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorResponse {
            message: "Error".into(),
            error: format!("Failed to evaluate transaction: {}", err),
        }),
    )
        .into_response()
}

/// Connection state shared by every handler: the contract handle bound to
/// the gateway's wallet identity. Built once before the routes are installed.
pub struct GatewayContext {
    client: LedgerClient,
}

impl GatewayContext {
    pub fn new(client: LedgerClient) -> Self {
        GatewayContext { client }
    }
}

/// API server wiring the gateway context into an axum router
#[derive(Clone)]
pub struct ApiServer {
    context: Arc<GatewayContext>,
    /// Request body ceiling, uploads included
    max_upload_bytes: usize,
}

impl ApiServer {
    /// Creates a new instance of the API server
    ///
    /// # Arguments
    /// * `context` - Connected contract handle
    /// * `max_upload_bytes` - Largest accepted request body
    pub fn new(context: GatewayContext, max_upload_bytes: usize) -> Self {
        ApiServer {
            context: Arc::new(context),
            max_upload_bytes,
        }
    }

    /// Builds the router with all gateway routes
    pub fn router(&self) -> Router {
        Router::new()
            .route("/ping", get(Self::ping_handler))
            .route("/InitLedger", get(Self::init_ledger_handler))
            .route("/ReadDID", post(Self::read_did_handler))
            .route("/ReadMedicalData", post(Self::read_medical_data_handler))
            .route("/CreateDID", post(Self::create_did_handler))
            .route("/CreateMedicalData", post(Self::create_medical_data_handler))
            .route("/ValidateMedicalData", post(Self::validate_medical_data_handler))
            .route("/ShareMedicalData", post(Self::share_medical_data_handler))
            .layer(
                ServiceBuilder::new()
                    .layer(DefaultBodyLimit::disable())
                    .layer(RequestBodyLimitLayer::new(self.max_upload_bytes)),
            )
            .with_state(Arc::clone(&self.context))
    }

    /// Starts the API server and serves requests until Ctrl-C
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (e.g., "0.0.0.0:8085")
    pub async fn run(&self, addr: SocketAddr) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("gateway listening on http://{}", addr);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }

    // =====================
    // Health
    // =====================

    async fn ping_handler() -> impl IntoResponse {
        ok("pong")
    }

    // =====================
    // Ledger Handlers
    // =====================

    /// Seeds the bootstrap certification authorities
    ///
    /// # Endpoint
    /// GET /InitLedger
    async fn init_ledger_handler(State(state): State<Arc<GatewayContext>>) -> Response {
        match state.client.submit_transaction("InitLedger", &[]) {
            Ok(result) => ok(String::from_utf8_lossy(&result)),
            Err(e) => ledger_failure(e),
        }
    }

    // =====================
    // DID Handlers
    // =====================

    /// Returns a DID record as JSON text
    ///
    /// # Endpoint
    /// POST /ReadDID
    ///
    /// # Request Body
    /// `{"DID": "..."}`
    async fn read_did_handler(
        State(state): State<Arc<GatewayContext>>,
        payload: Result<Json<ReadDidRequest>, JsonRejection>,
    ) -> Response {
        let Json(payload) = match payload {
            Ok(payload) => payload,
            Err(e) => return bad_request(e.body_text()),
        };
        match state.client.evaluate_transaction("ReadDID", &[payload.did.as_str()]) {
            Ok(result) => ok(String::from_utf8_lossy(&result)),
            Err(e) => ledger_failure(e),
        }
    }

    /// Creates a new DID
    ///
    /// # Endpoint
    /// POST /CreateDID
    ///
    /// # Request Body
    /// `{"DID","AuthID","Attribute","Keytype","Controller","Key"}` and an
    /// optional `"Sign"`
    ///
    /// # Responses
    /// - 200 OK: `"<DID> is created."`
    /// - 400 Bad Request: malformed body or rejected transaction
    async fn create_did_handler(
        State(state): State<Arc<GatewayContext>>,
        payload: Result<Json<CreateDidRequest>, JsonRejection>,
    ) -> Response {
        let Json(payload) = match payload {
            Ok(payload) => payload,
            Err(e) => return bad_request(e.body_text()),
        };

        let mut args = vec![
            payload.did.as_str(),
            payload.auth_id.as_str(),
            payload.attribute.as_str(),
            payload.key_type.as_str(),
            payload.controller.as_str(),
            payload.key.as_str(),
        ];
        if let Some(sign) = payload.sign.as_deref() {
            args.push(sign);
        }

        match state.client.submit_transaction("CreateDID", &args) {
            Ok(_) => ok(format!("{} is created.", payload.did)),
            Err(e) => ledger_failure(e),
        }
    }

    // =====================
    // Medical Data Handlers
    // =====================

    /// Returns a medical data record as JSON text
    ///
    /// # Endpoint
    /// POST /ReadMedicalData
    async fn read_medical_data_handler(
        State(state): State<Arc<GatewayContext>>,
        payload: Result<Json<ReadMedicalDataRequest>, JsonRejection>,
    ) -> Response {
        let Json(payload) = match payload {
            Ok(payload) => payload,
            Err(e) => return bad_request(e.body_text()),
        };
        match state.client.evaluate_transaction("ReadMedicalData", &[payload.hash.as_str()]) {
            Ok(result) => ok(String::from_utf8_lossy(&result)),
            Err(e) => ledger_failure(e),
        }
    }

    /// Registers an uploaded medical artifact under its SHA-256 hash
    ///
    /// # Endpoint
    /// POST /CreateMedicalData
    ///
    /// # Request Body
    /// multipart/form-data with file `MedicalData` and fields `AccessLevel`,
    /// `Metadata`, `OwnerID`
    ///
    /// # Responses
    /// - 200 OK: `"<hash> is created."`
    /// - 400 Bad Request: missing part or rejected transaction
    async fn create_medical_data_handler(
        State(state): State<Arc<GatewayContext>>,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Response {
        let mut multipart = match multipart {
            Ok(multipart) => multipart,
            Err(e) => return bad_request(format!("get form err: {}", e.body_text())),
        };

        let mut artifact = None;
        let mut access_level = None;
        let mut metadata = None;
        let mut owner = None;

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => return bad_request(format!("get form err: {}", e.body_text())),
            };
            let name = field.name().unwrap_or_default().to_string();
            if name == "MedicalData" {
                match field.bytes().await {
                    Ok(bytes) => artifact = Some(bytes),
                    Err(e) => return bad_request(format!("get form err: {}", e.body_text())),
                }
                continue;
            }
            let value = match field.text().await {
                Ok(value) => value,
                Err(e) => return bad_request(format!("get form err: {}", e.body_text())),
            };
            match name.as_str() {
                "AccessLevel" => access_level = Some(value),
                "Metadata" => metadata = Some(value),
                "OwnerID" => owner = Some(value),
                _ => {}
            }
        }

        let artifact = match artifact {
            Some(artifact) => artifact,
            None => return bad_request("get form err: missing file MedicalData"),
        };
        let (access_level, metadata, owner) = match (access_level, metadata, owner) {
            (Some(a), Some(m), Some(o)) => (a, m, o),
            _ => return bad_request("AccessLevel, Metadata and OwnerID are required"),
        };

        let hash = content_hash_hex(&artifact);
        info!("medical data upload of {} bytes hashed to {}", artifact.len(), hash);

        match state
            .client
            .submit_transaction("CreateMedicalData", &[hash.as_str(), access_level.as_str(), metadata.as_str(), owner.as_str()])
        {
            Ok(_) => ok(format!("{} is created.", hash)),
            Err(e) => ledger_failure(e),
        }
    }

    /// Validates that a DID owns a medical data record
    ///
    /// # Endpoint
    /// POST /ValidateMedicalData
    async fn validate_medical_data_handler(
        State(state): State<Arc<GatewayContext>>,
        payload: Result<Json<MedicalDataDidRequest>, JsonRejection>,
    ) -> Response {
        let Json(payload) = match payload {
            Ok(payload) => payload,
            Err(e) => return bad_request(e.body_text()),
        };
        match state
            .client
            .submit_transaction("ValidateMedicalData", &[payload.hash.as_str(), payload.did.as_str()])
        {
            Ok(result) if result == b"true" => ok(format!("DID {} is validated", payload.did)),
            Ok(_) => ok(format!("DID {} is not validated", payload.did)),
            Err(e) => ledger_failure(e),
        }
    }

    /// Checks whether a medical data record may be shared with a DID
    ///
    /// # Endpoint
    /// POST /ShareMedicalData
    async fn share_medical_data_handler(
        State(state): State<Arc<GatewayContext>>,
        payload: Result<Json<MedicalDataDidRequest>, JsonRejection>,
    ) -> Response {
        let Json(payload) = match payload {
            Ok(payload) => payload,
            Err(e) => return bad_request(e.body_text()),
        };
        match state
            .client
            .submit_transaction("ShareMedicalData", &[payload.hash.as_str(), payload.did.as_str()])
        {
            Ok(result) => ok(String::from_utf8_lossy(&result)),
            Err(e) => ledger_failure(e),
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("shutting down gateway");
}
