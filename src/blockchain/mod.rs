pub mod error;
pub mod ledger_client;
pub mod peer;
