// src/wallet/file_wallet.rs
//! File-system wallet holding gateway client identities.
//!
//! Each identity is stored as `<label>.id` inside the wallet directory:
//! ```text
//! {"label":"appUser","mspId":"Org1MSP","privateKey":"<hex>","publicKey":"<hex>"}
//! ```

use crate::wallet::identity::{Identity, IdentityError};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("wallet entry {0} is not valid JSON: {1}")]
    Format(String, #[source] serde_json::Error),

    #[error("wallet entry {0} holds an unusable key: {1}")]
    Key(String, #[source] IdentityError),

    #[error("wallet entry {0} has a public key that does not match its private key")]
    KeyMismatch(String),

    #[error("identity {0} is not in the wallet")]
    Missing(String),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredIdentity {
    label: String,
    msp_id: String,
    private_key: String,
    public_key: String,
}

/// Directory-backed identity store.
pub struct FileSystemWallet {
    root: PathBuf,
}

impl FileSystemWallet {
    /// Opens the wallet at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, WalletError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| WalletError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(FileSystemWallet { root })
    }

    fn entry_path(&self, label: &str) -> PathBuf {
        self.root.join(format!("{}.id", label))
    }

    pub fn exists(&self, label: &str) -> bool {
        self.entry_path(label).is_file()
    }

    /// Writes `identity`, replacing any entry with the same label.
    pub fn put(&self, identity: &Identity) -> Result<(), WalletError> {
        let stored = StoredIdentity {
            label: identity.label.clone(),
            msp_id: identity.msp_id.clone(),
            private_key: identity.secret_hex(),
            public_key: identity.public_key_hex(),
        };
        let data = serde_json::to_vec_pretty(&stored)
            .map_err(|e| WalletError::Format(identity.label.clone(), e))?;

        let path = self.entry_path(&identity.label);
        let tmp_path = path.with_extension("id.tmp");
        fs::write(&tmp_path, data).map_err(|source| WalletError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| WalletError::Io { path, source })
    }

    pub fn get(&self, label: &str) -> Result<Identity, WalletError> {
        let path = self.entry_path(label);
        if !path.is_file() {
            return Err(WalletError::Missing(label.to_string()));
        }
        let data = fs::read(&path).map_err(|source| WalletError::Io { path, source })?;
        let stored: StoredIdentity =
            serde_json::from_slice(&data).map_err(|e| WalletError::Format(label.to_string(), e))?;
        let identity = Identity::from_secret_hex(stored.label, stored.msp_id, &stored.private_key)
            .map_err(|e| WalletError::Key(label.to_string(), e))?;
        if identity.public_key_hex() != stored.public_key {
            return Err(WalletError::KeyMismatch(label.to_string()));
        }
        Ok(identity)
    }

    /// Returns the identity stored under `label`, generating and storing a
    /// new one when the wallet has none.
    pub fn load_or_create(&self, label: &str, msp_id: &str) -> Result<Identity, WalletError> {
        if self.exists(label) {
            return self.get(label);
        }
        info!("Populating wallet {} with identity {}", self.root.display(), label);
        let identity = Identity::generate(label, msp_id);
        self.put(&identity)?;
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    /// Temporary wallet directory, removed when dropped even if the test panics.
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new() -> Self {
            let suffix: u64 = rand::thread_rng().gen();
            ScratchDir(std::env::temp_dir().join(format!("medledger-wallet-{:x}", suffix)))
        }

        fn join(&self, name: &str) -> PathBuf {
            self.0.join(name)
        }
    }

    impl AsRef<Path> for ScratchDir {
        fn as_ref(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_load_or_create_is_stable() {
        let dir = ScratchDir::new();
        let wallet = FileSystemWallet::open(&dir).unwrap();
        assert!(!wallet.exists("appUser"));

        let created = wallet.load_or_create("appUser", "Org1MSP").unwrap();
        assert!(wallet.exists("appUser"));

        let reopened = FileSystemWallet::open(&dir).unwrap();
        let loaded = reopened.load_or_create("appUser", "Org1MSP").unwrap();
        assert_eq!(created.public_key_hex(), loaded.public_key_hex());
        assert_eq!(loaded.msp_id, "Org1MSP");
    }

    #[test]
    fn test_scratch_dir_is_removed_on_panic() {
        let path = {
            let dir = ScratchDir::new();
            FileSystemWallet::open(&dir).unwrap();
            dir.0.clone()
        };
        assert!(!path.exists());

        let kept = std::sync::Arc::new(std::sync::Mutex::new(PathBuf::new()));
        let seen = std::sync::Arc::clone(&kept);
        let outcome = std::panic::catch_unwind(move || {
            let dir = ScratchDir::new();
            let wallet = FileSystemWallet::open(&dir).unwrap();
            wallet.load_or_create("appUser", "Org1MSP").unwrap();
            *seen.lock().unwrap() = dir.0.clone();
            panic!("assertion failed mid-test");
        });
        assert!(outcome.is_err());
        assert!(!kept.lock().unwrap().exists());
    }

    #[test]
    fn test_get_missing_and_corrupt() {
        let dir = ScratchDir::new();
        let wallet = FileSystemWallet::open(&dir).unwrap();
        assert!(matches!(wallet.get("nobody"), Err(WalletError::Missing(_))));

        fs::write(dir.join("broken.id"), b"not json").unwrap();
        assert!(matches!(wallet.get("broken"), Err(WalletError::Format(..))));
    }

    #[test]
    fn test_get_detects_swapped_public_key() {
        let dir = ScratchDir::new();
        let wallet = FileSystemWallet::open(&dir).unwrap();
        let stored = StoredIdentity {
            label: "appUser".into(),
            msp_id: "Org1MSP".into(),
            private_key: Identity::generate("appUser", "Org1MSP").secret_hex(),
            public_key: Identity::generate("other", "Org1MSP").public_key_hex(),
        };
        fs::write(dir.join("appUser.id"), serde_json::to_vec(&stored).unwrap()).unwrap();

        assert!(matches!(wallet.get("appUser"), Err(WalletError::KeyMismatch(_))));
    }
}
