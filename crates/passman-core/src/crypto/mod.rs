//! Cryptographic primitives for the encrypted store
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 derivation of an AES key and IV from the master password
//! - AES-256-CBC encryption with PKCS#7 padding (unauthenticated)
//! - Secure memory handling with zeroize

mod encryption;
mod key_derivation;
mod secure_memory;

pub use encryption::{decrypt, encrypt};
pub use key_derivation::{derive_key, ensure_salt, generate_salt, KeyDerivationParams};
pub use secure_memory::{DerivedKey, SecretString, IV_LEN, KEY_LEN};
