pub mod bootstrap;
pub mod context;
pub mod error;
pub mod medical_registry;
pub mod share_policy;
