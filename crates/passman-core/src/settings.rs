//! Application settings management
//!
//! Stores non-secret configuration (salt, store location, scan catalogue)
//! in a plain JSON file. The salt is deployment data, not a secret, but the
//! store can only be opened with the salt it was saved under.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::crypto::{ensure_salt, generate_salt, KeyDerivationParams};
use crate::error::{Result, VaultError};
use crate::storage::DEFAULT_STORE_FILE;
use crate::threat::{ThreatScanner, DEFAULT_SUSPECT_APPLICATIONS};

/// Settings file name inside the configuration directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Key derivation salt
    pub salt: Option<String>,
    /// Encrypted store location
    pub store_file: PathBuf,
    /// PBKDF2 iterations; changing it makes existing stores unreadable
    pub kdf_iterations: u32,
    /// Process name substrings treated as clipboard history tools
    pub suspect_applications: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self {
            version: 1,
            salt: None,
            store_file: PathBuf::from(DEFAULT_STORE_FILE),
            kdf_iterations: KeyDerivationParams::default().iterations,
            suspect_applications: DEFAULT_SUSPECT_APPLICATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Get the configured salt
    pub fn salt(&self) -> Result<&str> {
        let salt = self.salt.as_deref().unwrap_or_default();
        ensure_salt(salt)?;
        Ok(salt)
    }

    /// Key derivation parameters for the store
    pub fn kdf_params(&self) -> KeyDerivationParams {
        KeyDerivationParams {
            iterations: self.kdf_iterations,
        }
    }

    /// Threat scanner over the configured catalogue
    pub fn threat_scanner(&self) -> ThreatScanner {
        ThreatScanner::new(self.suspect_applications.iter().cloned())
    }

    /// Apply command-line or environment overrides
    pub fn with_overrides(mut self, salt: Option<String>, store_file: Option<PathBuf>) -> Self {
        if let Some(salt) = salt {
            self.salt = Some(salt);
        }
        if let Some(store_file) = store_file {
            self.store_file = store_file;
        }
        self
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Load settings from the per-user configuration directory
    pub fn new() -> Result<Self> {
        Self::load(Self::default_settings_file()?)
    }

    /// Load settings from an explicit file; a missing file means defaults
    pub fn load(settings_file: impl Into<PathBuf>) -> Result<Self> {
        let settings_file = settings_file.into();
        let settings = Self::load_from_file(&settings_file)?;

        Ok(Self {
            settings_file,
            settings,
        })
    }

    /// Get the default settings file path
    pub fn default_settings_file() -> Result<PathBuf> {
        ProjectDirs::from("", "", "passman")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
            .ok_or_else(|| {
                VaultError::ConfigurationError(
                    "Could not determine configuration directory".to_string(),
                )
            })
    }

    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            VaultError::ConfigurationError(format!("Invalid settings file {:?}: {}", path, e))
        })?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub async fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)?;

        if let Some(parent) = self.settings_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.settings_file).await?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Get the settings file path
    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    /// Generate and persist a salt if none is configured yet
    ///
    /// Returns `false` when a salt already exists; it is never replaced,
    /// since a different salt would make the existing store unreadable.
    pub async fn init_salt(&mut self) -> Result<bool> {
        if self.settings.salt().is_ok() {
            return Ok(false);
        }

        self.settings.salt = Some(generate_salt());
        self.save().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_default() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::load(temp_dir.path().join(SETTINGS_FILE)).unwrap();

        let settings = manager.get();
        assert_eq!(settings.store_file, PathBuf::from("passman.data"));
        assert_eq!(settings.kdf_iterations, 100_000);
        assert!(settings.suspect_applications.contains(&"ditto".to_string()));
        assert!(matches!(
            settings.salt(),
            Err(VaultError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_empty_salt_is_configuration_error() {
        let settings = Settings {
            salt: Some(String::new()),
            ..Settings::new()
        };
        assert!(matches!(
            settings.salt(),
            Err(VaultError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "salt": "abc", "kdfIterations": 5000 }"#).unwrap();

        let manager = SettingsManager::load(&path).unwrap();
        assert_eq!(manager.get().salt().unwrap(), "abc");
        assert_eq!(manager.get().kdf_params().iterations, 5000);
        assert_eq!(manager.get().store_file, PathBuf::from("passman.data"));
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            SettingsManager::load(&path),
            Err(VaultError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::new()
            .with_overrides(Some("env-salt".to_string()), Some(PathBuf::from("/tmp/x.data")));

        assert_eq!(settings.salt().unwrap(), "env-salt");
        assert_eq!(settings.store_file, PathBuf::from("/tmp/x.data"));

        let untouched = Settings::new().with_overrides(None, None);
        assert_eq!(untouched, Settings::new());
    }

    #[test]
    fn test_threat_scanner_from_settings() {
        let settings = Settings {
            suspect_applications: vec!["myclip".to_string()],
            ..Settings::new()
        };

        let found = settings.threat_scanner().scan(&["myclipd", "ditto"]);
        assert_eq!(found, vec!["myclipd"]);
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(SETTINGS_FILE);

        {
            let mut manager = SettingsManager::load(&path).unwrap();
            manager.get_mut().salt = Some("persisted".to_string());
            manager.get_mut().store_file = PathBuf::from("vault.data");
            manager.save().await.unwrap();
        }

        {
            let manager = SettingsManager::load(&path).unwrap();
            assert_eq!(manager.get().salt().unwrap(), "persisted");
            assert_eq!(manager.get().store_file, PathBuf::from("vault.data"));
        }
    }

    #[tokio::test]
    async fn test_init_salt_only_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE);

        let mut manager = SettingsManager::load(&path).unwrap();
        assert!(manager.init_salt().await.unwrap());
        let salt = manager.get().salt().unwrap().to_string();

        let mut reloaded = SettingsManager::load(&path).unwrap();
        assert!(!reloaded.init_salt().await.unwrap());
        assert_eq!(reloaded.get().salt().unwrap(), salt);
    }
}
