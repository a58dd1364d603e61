//! The three user-facing operations over the encrypted store
//!
//! Each call is one load -> mutate -> save cycle. Nothing is kept between
//! calls: key material is derived again for every load and save.

use tracing::info;

use crate::credential::{Entry, Store};
use crate::error::{Result, VaultError};
use crate::settings::Settings;
use crate::storage::EncryptedFileStorage;

/// Vault operation requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Add,
    Remove,
    /// Write a fresh salt to the settings file
    Init,
}

impl Operation {
    /// Whether the operation targets a service
    pub fn requires_service(self) -> bool {
        !matches!(self, Self::Init)
    }
}

impl std::str::FromStr for Operation {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "init" => Ok(Self::Init),
            _ => Err(VaultError::ConfigurationError(format!(
                "Unknown operation given : {}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Get => "get",
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Init => "init",
        })
    }
}

/// Encrypted store bound to its salt
pub struct Vault {
    storage: EncryptedFileStorage,
    salt: String,
}

impl Vault {
    /// Create a vault from settings; fails early if the salt is missing
    pub fn new(settings: &Settings) -> Result<Self> {
        let storage =
            EncryptedFileStorage::with_params(&settings.store_file, settings.kdf_params());
        Self::with_storage(storage, settings.salt()?)
    }

    /// Create a vault over an explicit storage (for testing)
    pub fn with_storage(storage: EncryptedFileStorage, salt: &str) -> Result<Self> {
        crate::crypto::ensure_salt(salt)?;
        Ok(Self {
            storage,
            salt: salt.to_string(),
        })
    }

    /// Get the storage backend
    pub fn storage(&self) -> &EncryptedFileStorage {
        &self.storage
    }

    /// Load the whole store
    pub async fn load(&self, password: &str) -> Result<Store> {
        self.storage.load(password, &self.salt).await
    }

    /// Look up the entry for a service
    pub async fn get(&self, password: &str, service: &str) -> Result<Entry> {
        let store = self.load(password).await?;
        store
            .find_by_service(service)
            .cloned()
            .ok_or_else(|| VaultError::ServiceNotFound(service.to_string()))
    }

    /// Add a new entry and save the store
    pub async fn add(&self, password: &str, entry: Entry) -> Result<()> {
        let mut store = self.load(password).await?;
        let service = entry.service().to_string();
        store.add(entry)?;
        self.storage.save(&store, password, &self.salt).await?;

        info!("Added service {}", service);
        Ok(())
    }

    /// Remove the entry for a service and save the store
    pub async fn remove(&self, password: &str, service: &str) -> Result<()> {
        let mut store = self.load(password).await?;
        store.remove(service)?;
        self.storage.save(&store, password, &self.salt).await?;

        info!("Removed service {}", service);
        Ok(())
    }
}
