pub mod crypto;
pub mod serialization;
