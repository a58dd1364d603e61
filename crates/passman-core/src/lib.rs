//! # passman-core
//!
//! Core of the passman vault including:
//! - PBKDF2 key derivation and AES-256-CBC encryption of the store
//! - The XML document codec and the unique-by-service entry collection
//! - Atomic encrypted-file persistence
//! - Clipboard history tool detection
//! - The clipboard handoff that always ends with a cleared clipboard
//!
//! The cipher carries no authentication tag, so a wrong master password
//! and a corrupted store are reported as the same error.

pub mod codec;
pub mod credential;
pub mod crypto;
pub mod error;
pub mod exposure;
pub mod settings;
pub mod storage;
pub mod threat;
mod vault;

pub use credential::{Entry, Store};
pub use crypto::{derive_key, DerivedKey, KeyDerivationParams, SecretString};
pub use error::{Result, VaultError};
pub use exposure::{
    Acknowledger, Clipboard, ClipboardExposure, ClipboardSession, ExposurePhase, SecretKind,
};
pub use settings::{Settings, SettingsManager};
pub use storage::{EncryptedFileStorage, DEFAULT_STORE_FILE};
pub use threat::{scan, ThreatScanner, DEFAULT_SUSPECT_APPLICATIONS};
pub use vault::{Operation, Vault};
