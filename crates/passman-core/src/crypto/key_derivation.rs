//! Password-based key derivation using PBKDF2-HMAC-SHA256

use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::{DerivedKey, IV_LEN, KEY_LEN};
use crate::error::{Result, VaultError};

/// Parameters for PBKDF2 key derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDerivationParams {
    /// HMAC iterations (default: 100000)
    pub iterations: u32,
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self {
            iterations: 100_000,
        }
    }
}

/// Generate a random salt suitable for the settings file
pub fn generate_salt() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Reject a missing or empty salt before any key material is derived
pub fn ensure_salt(salt: &str) -> Result<()> {
    if salt.is_empty() {
        return Err(VaultError::ConfigurationError(
            "salt is not configured (set it in settings.json or PASSMAN_SALT)".to_string(),
        ));
    }
    Ok(())
}

/// Derive the store's AES-256 key and CBC IV from the master password
///
/// # Arguments
/// * `password` - The master password
/// * `salt` - The deployment salt (not secret, must not be empty)
/// * `params` - Optional key derivation parameters
///
/// # Returns
/// Key and IV, deterministic for a given password, salt and iteration count
pub fn derive_key(
    password: &str,
    salt: &str,
    params: Option<KeyDerivationParams>,
) -> Result<DerivedKey> {
    ensure_salt(salt)?;
    let params = params.unwrap_or_default();
    if params.iterations == 0 {
        return Err(VaultError::ConfigurationError(
            "key derivation iterations must be positive".to_string(),
        ));
    }

    let mut material = Zeroizing::new([0u8; KEY_LEN + IV_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        params.iterations,
        &mut material[..],
    );

    Ok(DerivedKey::from_bytes(&material))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Option<KeyDerivationParams> {
        Some(KeyDerivationParams { iterations: 1_000 })
    }

    #[test]
    fn test_generate_salt() {
        let salt1 = generate_salt();
        let salt2 = generate_salt();

        assert_ne!(salt1, salt2);
        assert_eq!(salt1.len(), 32);
        assert!(ensure_salt(&salt1).is_ok());
    }

    #[test]
    fn test_derive_key_deterministic() {
        let key1 = derive_key("test-password-123", "salt-value", fast()).unwrap();
        let key2 = derive_key("test-password-123", "salt-value", fast()).unwrap();

        assert_eq!(key1.key(), key2.key());
        assert_eq!(key1.iv(), key2.iv());
    }

    #[test]
    fn test_derive_key_different_passwords() {
        let key1 = derive_key("password1", "salt-value", fast()).unwrap();
        let key2 = derive_key("password2", "salt-value", fast()).unwrap();

        assert_ne!(key1.key(), key2.key());
        assert_ne!(key1.iv(), key2.iv());
    }

    #[test]
    fn test_derive_key_different_salts() {
        let key1 = derive_key("test-password", "salt-one", fast()).unwrap();
        let key2 = derive_key("test-password", "salt-two", fast()).unwrap();

        assert_ne!(key1.key(), key2.key());
    }

    #[test]
    fn test_iterations_change_output() {
        let key1 = derive_key("test-password", "salt-value", fast()).unwrap();
        let key2 =
            derive_key("test-password", "salt-value", Some(KeyDerivationParams { iterations: 1_001 }))
                .unwrap();

        assert_ne!(key1.key(), key2.key());
    }

    #[test]
    fn test_empty_salt_is_configuration_error() {
        let result = derive_key("test-password", "", fast());
        assert!(matches!(result, Err(VaultError::ConfigurationError(_))));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let result =
            derive_key("test-password", "salt-value", Some(KeyDerivationParams { iterations: 0 }));
        assert!(matches!(result, Err(VaultError::ConfigurationError(_))));
    }

    #[test]
    fn test_default_params() {
        assert_eq!(KeyDerivationParams::default().iterations, 100_000);
    }
}
