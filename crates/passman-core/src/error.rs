//! Error types for passman-core

use thiserror::Error;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Vault error types
///
/// None of these are transient: every failure terminates the requested
/// operation and nothing is retried.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Decrypted bytes did not parse. A wrong master password and a damaged
    /// file look the same because the cipher carries no authentication tag.
    #[error("Wrong password or corrupted store")]
    IntegrityError,

    #[error("Malformed store document: {0}")]
    FormatError(String),

    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Service already exists: {0}")]
    DuplicateService(String),

    #[error("Encryption failed: {0}")]
    EncryptionError(String),

    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    #[error("Interrupted before acknowledgment")]
    Interrupted,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
