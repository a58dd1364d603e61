//! Encrypted file storage backend
//!
//! The whole store is one file: the codec document encrypted under a key
//! derived from the master password. Key material is derived per call and
//! dropped (zeroed) as soon as the cipher is done with it.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::codec;
use crate::credential::Store;
use crate::crypto::{decrypt, derive_key, encrypt, ensure_salt, KeyDerivationParams};
use crate::error::{Result, VaultError};

/// Default store file name, relative to the working directory
pub const DEFAULT_STORE_FILE: &str = "passman.data";

/// Encrypted file storage backend
#[derive(Debug, Clone)]
pub struct EncryptedFileStorage {
    /// Path of the store file
    path: PathBuf,
    /// Key derivation parameters used for both load and save
    params: KeyDerivationParams,
}

impl EncryptedFileStorage {
    /// Create a storage for the given file with default derivation parameters
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_params(path, KeyDerivationParams::default())
    }

    /// Create a storage with explicit derivation parameters
    pub fn with_params(path: impl Into<PathBuf>, params: KeyDerivationParams) -> Self {
        Self {
            path: path.into(),
            params,
        }
    }

    /// Get the store file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the path of the temporary file used while saving
    fn temp_file_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_STORE_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Load the store
    ///
    /// A missing file is an empty store. Anything that fails to decrypt or
    /// parse is reported as [`VaultError::IntegrityError`].
    pub async fn load(&self, password: &str, salt: &str) -> Result<Store> {
        ensure_salt(salt)?;

        if !tokio::fs::try_exists(&self.path).await? {
            debug!("No existing store file at {:?}", self.path);
            return Ok(Store::new());
        }

        let ciphertext = tokio::fs::read(&self.path).await?;
        let key = derive_key(password, salt, Some(self.params.clone()))?;
        let plaintext = Zeroizing::new(decrypt(&ciphertext, &key)?);
        drop(key);

        let text = std::str::from_utf8(&plaintext).map_err(|_| VaultError::IntegrityError)?;
        let store = codec::decode(text)
            .and_then(Store::from_entries)
            .map_err(|e| {
                debug!("Decrypted store did not parse: {}", e);
                VaultError::IntegrityError
            })?;

        debug!("Loaded {} entries from {:?}", store.len(), self.path);
        Ok(store)
    }

    /// Save the store, replacing the previous file
    ///
    /// The ciphertext goes to a temporary file next to the target which is
    /// then renamed over it. On failure the previous file is untouched.
    pub async fn save(&self, store: &Store, password: &str, salt: &str) -> Result<()> {
        ensure_salt(salt)?;

        let document = codec::encode(store.entries())?;
        let key = derive_key(password, salt, Some(self.params.clone()))?;
        let ciphertext = encrypt(document.as_bytes(), &key)?;
        drop(key);
        drop(document);

        let temp_path = self.temp_file_path();
        if let Err(e) = Self::write_synced(&temp_path, &ciphertext).await {
            Self::discard(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            Self::discard(&temp_path).await;
            return Err(e.into());
        }

        debug!("Saved {} entries to {:?}", store.len(), self.path);
        Ok(())
    }

    async fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
        // A leftover temp file would keep its old permissions
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!("Removed stale temporary store file {:?}", path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(path).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        Ok(())
    }

    async fn discard(temp_path: &Path) {
        if let Err(e) = tokio::fs::remove_file(temp_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Could not remove temporary store file {:?}: {}", temp_path, e);
            }
        }
    }
}

impl Default for EncryptedFileStorage {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_FILE)
    }
}
