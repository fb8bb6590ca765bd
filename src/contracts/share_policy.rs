// src/contracts/share_policy.rs
//! Authorization gates applied by `ShareMedicalData`.
//!
//! Two incompatible rules have been deployed for sharing: one keyed on the
//! role of the requesting DID, one on the access level of the record. Both
//! are provided as named strategies; configuration selects which one the
//! contract runs.

use crate::models::did::{Did, PATIENT};
use crate::models::medical_data::MedicalData;
use serde::Deserialize;

/// Records with an access level below this are not shareable under
/// [`AccessLevelGate`] unless configured otherwise.
pub const DEFAULT_ACCESS_LEVEL_THRESHOLD: i64 = 2;

/// Predicate deciding whether `record` may be shared with `did`.
pub trait SharePolicy: Send + Sync {
    /// Short name reported in rejection errors and logs.
    fn name(&self) -> &'static str;

    fn can_share(&self, record: &MedicalData, did: &Did) -> bool;
}

/// Rejects DIDs whose first authentication descriptor has the `Patient` role.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleGate;

impl SharePolicy for RoleGate {
    fn name(&self) -> &'static str {
        "role"
    }

    fn can_share(&self, _record: &MedicalData, did: &Did) -> bool {
        did.primary_attribute() != Some(PATIENT)
    }
}

/// Rejects records whose access level is below `threshold`.
#[derive(Debug, Clone, Copy)]
pub struct AccessLevelGate {
    pub threshold: i64,
}

impl Default for AccessLevelGate {
    fn default() -> Self {
        AccessLevelGate { threshold: DEFAULT_ACCESS_LEVEL_THRESHOLD }
    }
}

impl SharePolicy for AccessLevelGate {
    fn name(&self) -> &'static str {
        "access-level"
    }

    fn can_share(&self, record: &MedicalData, _did: &Did) -> bool {
        record.access_level >= self.threshold
    }
}

/// Configuration-facing selector for the share policy.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SharePolicyKind {
    #[default]
    Role,
    AccessLevel,
}

impl SharePolicyKind {
    /// Instantiates the selected policy. `threshold` only applies to
    /// [`SharePolicyKind::AccessLevel`].
    pub fn build(self, threshold: i64) -> Box<dyn SharePolicy> {
        match self {
            SharePolicyKind::Role => Box::new(RoleGate),
            SharePolicyKind::AccessLevel => Box::new(AccessLevelGate { threshold }),
        }
    }
}
