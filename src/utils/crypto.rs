// src/utils/crypto.rs
//! Hashing utilities shared by the gateway, wallet and peer.
//!
//! Uses SHA-256 for all operations: it addresses uploaded medical artifacts
//! and is the digest signed by wallet identities.

use ring::digest::{digest, SHA256};

/// Computes a SHA-256 hash of the input data.
///
/// # Arguments
/// * `data` - Binary data to hash (as bytes slice)
///
/// # Returns
/// Fixed-size 32-byte array (`[u8; 32]`) containing the hash.
pub fn hash_data(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(digest(&SHA256, data).as_ref());
    out
}

/// Lowercase hex SHA-256 of `data`, the key under which medical data is stored.
pub fn content_hash_hex(data: &[u8]) -> String {
    hex::encode(hash_data(data))
}
