pub mod file_wallet;
pub mod identity;
