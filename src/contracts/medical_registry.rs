// src/contracts/medical_registry.rs
//! DID and MedicalData registry contract.
//!
//! Defines every state-transition rule for DID and MedicalData records over a
//! [`TransactionContext`]. Both record kinds share one flat keyspace: a DID
//! identifier and a medical-data hash must never be equal, and no prefix is
//! added to keep stored keys compatible with existing ledgers.
//!
//! Records move from absent to present only. There is no update operation;
//! `DeleteAsset` exists as a generic primitive and no business flow uses it.

use crate::contracts::bootstrap::{CA_KEY_TYPE, CERTIFICATION_AUTHORITIES};
use crate::contracts::context::TransactionContext;
use crate::contracts::error::{ContractError, Result};
use crate::contracts::share_policy::{RoleGate, SharePolicy};
use crate::models::did::{AuthInfo, Did, CERTIFICATION_AUTHORITY};
use crate::models::medical_data::MedicalData;
use crate::utils::serialization::{deserialize, serialize};
use chrono::SecondsFormat;
use log::debug;
use serde::Serialize;

/// Arguments of `CreateDID`.
#[derive(Debug, Clone, Default)]
pub struct DidRegistration {
    pub did: String,
    pub auth_id: String,
    pub attribute: String,
    pub key_type: String,
    pub controller: String,
    pub public_key: String,
    /// Optional detached signature stored alongside the record
    pub signature: Option<String>,
}

/// Registry contract instance.
///
/// The contract holds no world state of its own; the only configuration is
/// the share policy consulted by [`MedicalRegistry::share_medical_data`].
pub struct MedicalRegistry {
    share_policy: Box<dyn SharePolicy>,
}

impl Default for MedicalRegistry {
    fn default() -> Self {
        Self::new(Box::new(RoleGate))
    }
}

impl MedicalRegistry {
    /// Creates a registry gated by `share_policy`.
    pub fn new(share_policy: Box<dyn SharePolicy>) -> Self {
        MedicalRegistry { share_policy }
    }

    pub fn share_policy_name(&self) -> &'static str {
        self.share_policy.name()
    }

    /// Seeds the ledger with the bootstrap certification authorities.
    ///
    /// Writes are unconditional: calling this again overwrites the seeded
    /// records with a fresh timestamp and leaves every other key untouched.
    pub fn init_ledger(&self, ctx: &mut dyn TransactionContext) -> Result<()> {
        let issued_at = issue_time(ctx);
        for authority in CERTIFICATION_AUTHORITIES.iter() {
            let record = Did::with_single_method(
                authority.did,
                AuthInfo {
                    id: authority.method_id(),
                    attribute: CERTIFICATION_AUTHORITY.to_string(),
                    key_type: CA_KEY_TYPE.to_string(),
                    controller: authority.did.to_string(),
                    public_key: authority.public_key.to_string(),
                    issued_at: issued_at.clone(),
                },
                authority.signature,
            );
            write_record(ctx, authority.did, &record)?;
        }
        debug!("seeded {} certification authorities", CERTIFICATION_AUTHORITIES.len());
        Ok(())
    }

    /// Returns true when any record, of either kind, is stored under `key`.
    pub fn asset_exists(&self, ctx: &mut dyn TransactionContext, key: &str) -> Result<bool> {
        Ok(ctx.get_state(key)?.is_some())
    }

    /// Issues a new DID with a single authentication descriptor.
    ///
    /// # Errors
    /// - `AlreadyExists` if anything is stored under `registration.did`
    pub fn create_did(
        &self,
        ctx: &mut dyn TransactionContext,
        registration: DidRegistration,
    ) -> Result<()> {
        if self.asset_exists(ctx, &registration.did)? {
            return Err(ContractError::AlreadyExists(registration.did));
        }

        let record = Did::with_single_method(
            registration.did.clone(),
            AuthInfo {
                id: registration.auth_id,
                attribute: registration.attribute,
                key_type: registration.key_type,
                controller: registration.controller,
                public_key: registration.public_key,
                issued_at: issue_time(ctx),
            },
            registration.signature.unwrap_or_default(),
        );
        write_record(ctx, &registration.did, &record)?;
        debug!("created DID {}", registration.did);
        Ok(())
    }

    /// Issues a new medical data reference.
    ///
    /// `owner` is stored as given; whether it names an existing DID is only
    /// checked by [`Self::validate_medical_data`] and [`Self::share_medical_data`].
    ///
    /// # Errors
    /// - `AlreadyExists` if anything is stored under `hash`
    pub fn create_medical_data(
        &self,
        ctx: &mut dyn TransactionContext,
        hash: &str,
        access_level: i64,
        metadata: &str,
        owner: &str,
    ) -> Result<()> {
        if self.asset_exists(ctx, hash)? {
            return Err(ContractError::AlreadyExists(hash.to_string()));
        }

        let record = MedicalData {
            hash: hash.to_string(),
            access_level,
            metadata: metadata.to_string(),
            owner: owner.to_string(),
        };
        write_record(ctx, hash, &record)?;
        debug!("created medical data {} owned by {}", hash, owner);
        Ok(())
    }

    /// Returns the DID stored under `did`.
    ///
    /// # Errors
    /// - `NotFound` if the key is absent
    /// - `Malformed` if the bytes are not a DID record
    pub fn read_did(&self, ctx: &mut dyn TransactionContext, did: &str) -> Result<Did> {
        let bytes = fetch(ctx, did)?;
        decode_did(did, &bytes)
    }

    /// Returns the medical data stored under `hash`.
    ///
    /// # Errors
    /// - `NotFound` if the key is absent
    /// - `Malformed` if the bytes are not a medical data record
    pub fn read_medical_data(
        &self,
        ctx: &mut dyn TransactionContext,
        hash: &str,
    ) -> Result<MedicalData> {
        let bytes = fetch(ctx, hash)?;
        decode_medical_data(hash, &bytes)
    }

    /// Checks that the medical data under `hash` is owned by `did`.
    ///
    /// Read-only: performs no write even when submitted as a transaction.
    ///
    /// # Errors
    /// In order: `NotFound` for `hash`, `Malformed` record, `NotFound` for
    /// `did`, `OwnerMismatch` naming both identifiers.
    pub fn validate_medical_data(
        &self,
        ctx: &mut dyn TransactionContext,
        hash: &str,
        did: &str,
    ) -> Result<bool> {
        let record = self.read_medical_data(ctx, hash)?;

        if !self.asset_exists(ctx, did)? {
            return Err(ContractError::NotFound(did.to_string()));
        }

        if record.owner != did {
            return Err(ContractError::OwnerMismatch {
                owner: record.owner,
                did: did.to_string(),
            });
        }

        Ok(true)
    }

    /// Checks whether the medical data under `hash` may be shared with `did`
    /// under the configured share policy.
    ///
    /// # Errors
    /// `NotFound` for either key, `Malformed` for either record, then
    /// `Unauthorized` when the policy rejects.
    pub fn share_medical_data(
        &self,
        ctx: &mut dyn TransactionContext,
        hash: &str,
        did: &str,
    ) -> Result<bool> {
        let record_bytes = fetch(ctx, hash)?;
        let did_bytes = fetch(ctx, did)?;

        let record = decode_medical_data(hash, &record_bytes)?;
        let requester = decode_did(did, &did_bytes)?;

        if !self.share_policy.can_share(&record, &requester) {
            return Err(ContractError::Unauthorized {
                policy: self.share_policy.name(),
                hash: hash.to_string(),
                did: did.to_string(),
            });
        }

        Ok(true)
    }

    /// Deletes whatever record is stored under `key`.
    pub fn delete_asset(&self, ctx: &mut dyn TransactionContext, key: &str) -> Result<()> {
        if !self.asset_exists(ctx, key)? {
            return Err(ContractError::NotFound(key.to_string()));
        }
        ctx.del_state(key)
    }

    /// Executes the transaction named `function` with positional string
    /// arguments, as delivered by the ledger peer.
    ///
    /// # Returns
    /// Result payload: record JSON for reads, `true` for validate/share and
    /// empty bytes for writes.
    pub fn invoke(
        &self,
        ctx: &mut dyn TransactionContext,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>> {
        match function {
            "InitLedger" => {
                expect_arity(function, args, 0, 0)?;
                self.init_ledger(ctx)?;
                Ok(Vec::new())
            }
            "CreateDID" => {
                expect_arity(function, args, 6, 7)?;
                let registration = DidRegistration {
                    did: args[0].clone(),
                    auth_id: args[1].clone(),
                    attribute: args[2].clone(),
                    key_type: args[3].clone(),
                    controller: args[4].clone(),
                    public_key: args[5].clone(),
                    signature: args.get(6).cloned(),
                };
                self.create_did(ctx, registration)?;
                Ok(Vec::new())
            }
            "CreateMedicalData" => {
                expect_arity(function, args, 4, 4)?;
                let access_level = args[1].parse::<i64>().map_err(|e| {
                    ContractError::InvalidArgument(format!(
                        "accessLevel {:?} is not an integer: {}",
                        args[1], e
                    ))
                })?;
                self.create_medical_data(ctx, &args[0], access_level, &args[2], &args[3])?;
                Ok(Vec::new())
            }
            "ReadDID" => {
                expect_arity(function, args, 1, 1)?;
                let record = self.read_did(ctx, &args[0])?;
                encode(&args[0], &record)
            }
            "ReadMedicalData" => {
                expect_arity(function, args, 1, 1)?;
                let record = self.read_medical_data(ctx, &args[0])?;
                encode(&args[0], &record)
            }
            "ValidateMedicalData" => {
                expect_arity(function, args, 2, 2)?;
                let valid = self.validate_medical_data(ctx, &args[0], &args[1])?;
                Ok(valid.to_string().into_bytes())
            }
            "ShareMedicalData" => {
                expect_arity(function, args, 2, 2)?;
                let shareable = self.share_medical_data(ctx, &args[0], &args[1])?;
                Ok(shareable.to_string().into_bytes())
            }
            "DeleteAsset" => {
                expect_arity(function, args, 1, 1)?;
                self.delete_asset(ctx, &args[0])?;
                Ok(Vec::new())
            }
            other => Err(ContractError::UnknownFunction(other.to_string())),
        }
    }
}

fn issue_time(ctx: &dyn TransactionContext) -> String {
    ctx.tx_timestamp().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn expect_arity(function: &str, args: &[String], min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{} to {}", min, max)
        };
        return Err(ContractError::InvalidArgument(format!(
            "{} expects {} arguments, got {}",
            function,
            expected,
            args.len()
        )));
    }
    Ok(())
}

fn fetch(ctx: &mut dyn TransactionContext, key: &str) -> Result<Vec<u8>> {
    ctx.get_state(key)?
        .ok_or_else(|| ContractError::NotFound(key.to_string()))
}

fn encode<T: Serialize>(key: &str, record: &T) -> Result<Vec<u8>> {
    serialize(record).map_err(|source| ContractError::Encode {
        key: key.to_string(),
        source,
    })
}

fn write_record<T: Serialize>(ctx: &mut dyn TransactionContext, key: &str, record: &T) -> Result<()> {
    let bytes = encode(key, record)?;
    ctx.put_state(key, bytes)
}

fn decode_did(key: &str, bytes: &[u8]) -> Result<Did> {
    let record: Did = deserialize(bytes).map_err(|e| ContractError::Malformed {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    if record.auth_info.is_empty() {
        return Err(ContractError::Malformed {
            key: key.to_string(),
            reason: "DID has no authentication method".to_string(),
        });
    }
    Ok(record)
}

fn decode_medical_data(key: &str, bytes: &[u8]) -> Result<MedicalData> {
    deserialize(bytes).map_err(|e| ContractError::Malformed {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::context::testing::MemoryContext;
    use crate::contracts::share_policy::AccessLevelGate;
    use chrono::{Duration, TimeZone, Utc};

    fn registration(did: &str, attribute: &str) -> DidRegistration {
        DidRegistration {
            did: did.into(),
            auth_id: "a1".into(),
            attribute: attribute.into(),
            key_type: "Secp256k1".into(),
            controller: did.into(),
            public_key: "pubkey123".into(),
            signature: None,
        }
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_create_and_read_did() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();

        contract
            .create_did(&mut ctx, registration("did:test:1", "Patient"))
            .unwrap();
        let did = contract.read_did(&mut ctx, "did:test:1").unwrap();

        assert_eq!(did.id, "did:test:1");
        assert_eq!(did.auth_info.len(), 1);
        assert_eq!(did.auth_info[0].attribute, "Patient");
        assert_eq!(did.auth_info[0].issued_at, "2024-05-01T10:00:00Z");
        assert_eq!(did.signature, "");
    }

    #[test]
    fn test_create_did_twice_fails() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();

        contract.create_did(&mut ctx, registration("did:test:1", "Patient")).unwrap();
        let err = contract
            .create_did(&mut ctx, registration("did:test:1", "Doctor"))
            .unwrap_err();

        assert!(matches!(err, ContractError::AlreadyExists(ref id) if id == "did:test:1"));
        let stored = contract.read_did(&mut ctx, "did:test:1").unwrap();
        assert_eq!(stored.auth_info[0].attribute, "Patient");
    }

    #[test]
    fn test_keyspace_is_shared() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();

        contract
            .create_medical_data(&mut ctx, "collide", 3, "note", "did:test:1")
            .unwrap();
        let err = contract
            .create_did(&mut ctx, registration("collide", "Doctor"))
            .unwrap_err();
        assert!(matches!(err, ContractError::AlreadyExists(_)));

        let err = contract.read_did(&mut ctx, "collide").unwrap_err();
        assert!(matches!(err, ContractError::Malformed { .. }));
    }

    #[test]
    fn test_read_missing_records() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();

        assert!(matches!(
            contract.read_did(&mut ctx, "did:never").unwrap_err(),
            ContractError::NotFound(_)
        ));
        assert!(matches!(
            contract.read_medical_data(&mut ctx, "nohash").unwrap_err(),
            ContractError::NotFound(_)
        ));
    }

    #[test]
    fn test_read_did_rejects_empty_auth_info() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();
        ctx.state.insert(
            "did:bad".into(),
            br#"{"DID":"did:bad","authinfo":[],"Sign":""}"#.to_vec(),
        );

        let err = contract.read_did(&mut ctx, "did:bad").unwrap_err();
        assert!(matches!(err, ContractError::Malformed { ref key, .. } if key == "did:bad"));
    }

    #[test]
    fn test_medical_data_owner_not_checked_at_creation() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();

        contract
            .create_medical_data(&mut ctx, "hashABC", 3, "note", "did:nobody")
            .unwrap();
        let record = contract.read_medical_data(&mut ctx, "hashABC").unwrap();
        assert_eq!(record.owner, "did:nobody");

        let err = contract
            .create_medical_data(&mut ctx, "hashABC", 1, "again", "did:x")
            .unwrap_err();
        assert!(matches!(err, ContractError::AlreadyExists(_)));
    }

    #[test]
    fn test_validate_medical_data() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();
        contract.create_did(&mut ctx, registration("did:test:1", "Patient")).unwrap();
        contract.create_did(&mut ctx, registration("did:other", "Doctor")).unwrap();
        contract
            .create_medical_data(&mut ctx, "hashABC", 3, "note", "did:test:1")
            .unwrap();

        assert!(contract.validate_medical_data(&mut ctx, "hashABC", "did:test:1").unwrap());

        let err = contract
            .validate_medical_data(&mut ctx, "hashABC", "did:other")
            .unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, ContractError::OwnerMismatch { .. }));
        assert!(message.contains("did:test:1"));
        assert!(message.contains("did:other"));
    }

    #[test]
    fn test_validate_checks_hash_before_did() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();

        let err = contract
            .validate_medical_data(&mut ctx, "nohash", "did:never")
            .unwrap_err();
        assert!(matches!(err, ContractError::NotFound(ref key) if key == "nohash"));

        contract
            .create_medical_data(&mut ctx, "hashABC", 3, "note", "did:never")
            .unwrap();
        let err = contract
            .validate_medical_data(&mut ctx, "hashABC", "did:never")
            .unwrap_err();
        assert!(matches!(err, ContractError::NotFound(ref key) if key == "did:never"));
    }

    #[test]
    fn test_validate_does_not_write() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();
        contract.create_did(&mut ctx, registration("did:test:1", "Patient")).unwrap();
        contract
            .create_medical_data(&mut ctx, "hashABC", 3, "note", "did:test:1")
            .unwrap();
        let before = ctx.state.clone();

        contract.validate_medical_data(&mut ctx, "hashABC", "did:test:1").unwrap();
        assert_eq!(ctx.state, before);
    }

    #[test]
    fn test_share_under_role_gate() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();
        contract.create_did(&mut ctx, registration("did:patient", "Patient")).unwrap();
        contract.create_did(&mut ctx, registration("did:doctor", "Doctor")).unwrap();
        contract
            .create_medical_data(&mut ctx, "hashLow", 1, "note", "did:patient")
            .unwrap();

        assert!(contract.share_medical_data(&mut ctx, "hashLow", "did:doctor").unwrap());

        let err = contract
            .share_medical_data(&mut ctx, "hashLow", "did:patient")
            .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized { policy: "role", .. }));
        assert!(err.to_string().starts_with("AccessLevel X"));
    }

    #[test]
    fn test_share_under_access_level_gate() {
        let contract = MedicalRegistry::new(Box::new(AccessLevelGate::default()));
        let mut ctx = MemoryContext::new();
        contract.create_did(&mut ctx, registration("did:doctor", "Doctor")).unwrap();
        contract
            .create_medical_data(&mut ctx, "hashLow", 1, "note", "did:doctor")
            .unwrap();
        contract
            .create_medical_data(&mut ctx, "hashHigh", 2, "note", "did:doctor")
            .unwrap();

        let err = contract
            .share_medical_data(&mut ctx, "hashLow", "did:doctor")
            .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized { policy: "access-level", .. }));
        assert!(contract.share_medical_data(&mut ctx, "hashHigh", "did:doctor").unwrap());
    }

    #[test]
    fn test_share_requires_both_records() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();

        let err = contract.share_medical_data(&mut ctx, "nohash", "did:x").unwrap_err();
        assert!(matches!(err, ContractError::NotFound(ref key) if key == "nohash"));

        contract
            .create_medical_data(&mut ctx, "hashABC", 3, "note", "did:x")
            .unwrap();
        let err = contract.share_medical_data(&mut ctx, "hashABC", "did:x").unwrap_err();
        assert!(matches!(err, ContractError::NotFound(ref key) if key == "did:x"));
    }

    #[test]
    fn test_share_with_medical_data_key_as_did_is_malformed() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();
        contract
            .create_medical_data(&mut ctx, "hashA", 3, "note", "did:x")
            .unwrap();
        contract
            .create_medical_data(&mut ctx, "hashB", 3, "note", "did:x")
            .unwrap();

        let err = contract.share_medical_data(&mut ctx, "hashA", "hashB").unwrap_err();
        assert!(matches!(err, ContractError::Malformed { ref key, .. } if key == "hashB"));
    }

    #[test]
    fn test_init_ledger_overwrites_on_second_call() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();
        contract.create_did(&mut ctx, registration("did:test:1", "Patient")).unwrap();

        contract.init_ledger(&mut ctx).unwrap();
        let first = contract.read_did(&mut ctx, "did:CA:000001").unwrap();
        assert_eq!(first.auth_info[0].attribute, "CertificationAuthority");
        assert_eq!(first.auth_info[0].id, "did:CA:000001#keys-1");
        assert!(!first.signature.is_empty());

        ctx.now = ctx.now + Duration::hours(1);
        contract.init_ledger(&mut ctx).unwrap();
        let second = contract.read_did(&mut ctx, "did:CA:000001").unwrap();
        assert_eq!(second.auth_info[0].issued_at, "2024-05-01T11:00:00Z");

        assert_eq!(ctx.state.len(), 5);
        assert!(contract.asset_exists(&mut ctx, "did:test:1").unwrap());
    }

    #[test]
    fn test_delete_asset() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();
        contract.create_did(&mut ctx, registration("did:test:1", "Patient")).unwrap();

        contract.delete_asset(&mut ctx, "did:test:1").unwrap();
        assert!(!contract.asset_exists(&mut ctx, "did:test:1").unwrap());
        assert!(matches!(
            contract.delete_asset(&mut ctx, "did:test:1").unwrap_err(),
            ContractError::NotFound(_)
        ));
    }

    #[test]
    fn test_invoke_wire_names() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();
        ctx.now = Utc.with_ymd_and_hms(2024, 6, 2, 8, 30, 15).unwrap();

        let created = contract
            .invoke(
                &mut ctx,
                "CreateDID",
                &args(&["did:test:1", "a1", "Patient", "Secp256k1", "did:test:1", "pubkey123", "sig"]),
            )
            .unwrap();
        assert!(created.is_empty());

        let read = contract.invoke(&mut ctx, "ReadDID", &args(&["did:test:1"])).unwrap();
        let did: Did = serde_json::from_slice(&read).unwrap();
        assert_eq!(did.signature, "sig");
        assert_eq!(did.auth_info[0].issued_at, "2024-06-02T08:30:15Z");

        contract
            .invoke(&mut ctx, "CreateMedicalData", &args(&["hashABC", "3", "note", "did:test:1"]))
            .unwrap();
        let valid = contract
            .invoke(&mut ctx, "ValidateMedicalData", &args(&["hashABC", "did:test:1"]))
            .unwrap();
        assert_eq!(valid, b"true");

        let read = contract.invoke(&mut ctx, "ReadMedicalData", &args(&["hashABC"])).unwrap();
        assert_eq!(
            read,
            br#"{"hash":"hashABC","accesslevel":3,"metadata":"note","owner":"did:test:1"}"#
        );
    }

    #[test]
    fn test_stored_bytes_escape_html_characters() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();

        contract
            .create_medical_data(&mut ctx, "h1", 3, "a<b&c>", "did:x")
            .unwrap();
        assert_eq!(
            ctx.state["h1"],
            br#"{"hash":"h1","accesslevel":3,"metadata":"a\u003cb\u0026c\u003e","owner":"did:x"}"#.to_vec()
        );
        let read = contract.invoke(&mut ctx, "ReadMedicalData", &args(&["h1"])).unwrap();
        assert_eq!(read, ctx.state["h1"]);
        assert_eq!(contract.read_medical_data(&mut ctx, "h1").unwrap().metadata, "a<b&c>");
    }

    #[test]
    fn test_non_medical_data_under_hash_is_malformed() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();
        contract.create_did(&mut ctx, registration("did:doctor", "Doctor")).unwrap();
        contract.create_did(&mut ctx, registration("did:posing", "Doctor")).unwrap();
        ctx.state.insert("garbage".into(), b"not json".to_vec());

        for key in ["did:posing", "garbage"] {
            let err = contract.read_medical_data(&mut ctx, key).unwrap_err();
            assert!(matches!(err, ContractError::Malformed { key: ref k, .. } if k == key));

            let err = contract
                .validate_medical_data(&mut ctx, key, "did:doctor")
                .unwrap_err();
            assert!(matches!(err, ContractError::Malformed { key: ref k, .. } if k == key));

            let err = contract
                .share_medical_data(&mut ctx, key, "did:doctor")
                .unwrap_err();
            assert!(matches!(err, ContractError::Malformed { key: ref k, .. } if k == key));
        }
    }

    #[test]
    fn test_invoke_rejects_padded_access_level() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();

        for level in [" 3", "3 ", "3.0", ""] {
            let err = contract
                .invoke(&mut ctx, "CreateMedicalData", &args(&["h", level, "m", "o"]))
                .unwrap_err();
            assert!(matches!(err, ContractError::InvalidArgument(_)));
        }
        assert!(!contract.asset_exists(&mut ctx, "h").unwrap());
    }

    #[test]
    fn test_invoke_rejects_bad_arguments() {
        let contract = MedicalRegistry::default();
        let mut ctx = MemoryContext::new();

        let err = contract
            .invoke(&mut ctx, "CreateMedicalData", &args(&["h", "high", "m", "o"]))
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument(_)));

        let err = contract.invoke(&mut ctx, "ReadDID", &args(&[])).unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument(_)));

        let err = contract
            .invoke(&mut ctx, "CreateDID", &args(&["d", "a", "b", "c", "e"]))
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument(_)));

        let err = contract.invoke(&mut ctx, "GetAllAssets", &args(&[])).unwrap_err();
        assert!(matches!(err, ContractError::UnknownFunction(_)));
        assert!(ctx.state.is_empty());
    }
}
