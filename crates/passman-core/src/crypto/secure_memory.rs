//! Secure memory handling with automatic zeroization

use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;

/// AES block length in bytes, which is also the CBC IV length
pub const IV_LEN: usize = 16;

/// Key material derived from the master password - zeroed when dropped
///
/// Derived fresh for every load or save and never persisted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl DerivedKey {
    /// Split raw derivation output into key and IV
    pub fn from_bytes(material: &[u8; KEY_LEN + IV_LEN]) -> Self {
        let mut key = [0u8; KEY_LEN];
        let mut iv = [0u8; IV_LEN];
        key.copy_from_slice(&material[..KEY_LEN]);
        iv.copy_from_slice(&material[KEY_LEN..]);
        Self { key, iv }
    }

    /// Get the cipher key (use carefully - avoid copying)
    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// Get the initialization vector
    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}

/// Secret typed by the user (e.g. the master password) - zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    /// Create a new secret string
    pub fn new(value: String) -> Self {
        Self { value }
    }

    /// Get the secret value (use carefully)
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Consume and return the inner value
    pub fn into_inner(mut self) -> String {
        std::mem::take(&mut self.value)
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_key_split() {
        let mut material = [0u8; KEY_LEN + IV_LEN];
        for (i, byte) in material.iter_mut().enumerate() {
            *byte = i as u8;
        }

        let derived = DerivedKey::from_bytes(&material);
        assert_eq!(derived.key()[0], 0);
        assert_eq!(derived.key()[KEY_LEN - 1], (KEY_LEN - 1) as u8);
        assert_eq!(derived.iv()[0], KEY_LEN as u8);
        assert_eq!(derived.iv()[IV_LEN - 1], (KEY_LEN + IV_LEN - 1) as u8);
    }

    #[test]
    fn test_secret_string_expose() {
        let secret = SecretString::new("my-secret".to_string());
        assert_eq!(secret.expose(), "my-secret");
        assert_eq!(secret.into_inner(), "my-secret");
    }

    #[test]
    fn test_debug_redacted() {
        let derived = DerivedKey::from_bytes(&[7u8; KEY_LEN + IV_LEN]);
        let debug = format!("{:?}", derived);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains('7'));

        let secret = SecretString::new("hunter2".to_string());
        assert!(!format!("{:?}", secret).contains("hunter2"));
    }
}
