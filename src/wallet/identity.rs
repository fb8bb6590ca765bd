// src/wallet/identity.rs
//! Client identities used to sign transaction proposals.
//!
//! Uses the following cryptographic primitives:
//! - secp256k1 curve (via `k256` crate)
//! - SHA-256 prehashing (via `ring`)
//! - Cryptographically secure random number generation

use crate::utils::crypto::hash_data;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::SecretKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid hex encoding: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid key or signature: {0}")]
    Crypto(#[from] k256::ecdsa::Error),

    #[error("invalid secret key")]
    SecretKey,
}

/// Signing identity of a gateway client.
///
/// # Security Notes
/// - The secret key never leaves this struct except through the wallet file
/// - Signatures are deterministic ECDSA (RFC 6979) over the SHA-256 digest
#[derive(Clone)]
pub struct Identity {
    /// Wallet label (e.g. "appUser")
    pub label: String,
    /// Membership service provider the identity belongs to
    pub msp_id: String,
    signing_key: SigningKey,
}

impl Identity {
    /// Generates an identity with a fresh random secp256k1 key.
    pub fn generate(label: impl Into<String>, msp_id: impl Into<String>) -> Self {
        let secret_key = SecretKey::random(&mut rand::thread_rng());
        Identity {
            label: label.into(),
            msp_id: msp_id.into(),
            signing_key: SigningKey::from(&secret_key),
        }
    }

    /// Rebuilds an identity from its hex-encoded 32-byte secret key.
    pub fn from_secret_hex(
        label: impl Into<String>,
        msp_id: impl Into<String>,
        secret_hex: &str,
    ) -> Result<Self, IdentityError> {
        let bytes = hex::decode(secret_hex)?;
        let secret_key = SecretKey::from_slice(&bytes).map_err(|_| IdentityError::SecretKey)?;
        Ok(Identity {
            label: label.into(),
            msp_id: msp_id.into(),
            signing_key: SigningKey::from(&secret_key),
        })
    }

    pub fn secret_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Compressed SEC1 public key, hex encoded. Peers use it as the creator id.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_encoded_point(true).as_bytes())
    }

    /// Signs a message using ECDSA (secp256k1) with SHA-256 prehashing.
    ///
    /// # Returns
    /// 64-byte compact ECDSA signature (R || S values)
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, IdentityError> {
        let hash = hash_data(message);
        let signature: Signature = self.signing_key.sign_prehash(&hash)?;
        Ok(signature.to_bytes().to_vec())
    }
}

/// Verifies a compact signature produced by [`Identity::sign`].
pub fn verify(public_key_hex: &str, message: &[u8], signature: &[u8]) -> Result<(), IdentityError> {
    let key_bytes = hex::decode(public_key_hex)?;
    let verifying_key = VerifyingKey::from_sec1_bytes(&key_bytes)?;
    let signature = Signature::from_slice(signature)?;
    verifying_key.verify_prehash(&hash_data(message), &signature)?;
    Ok(())
}
