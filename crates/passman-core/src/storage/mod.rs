//! Persistence of the store as a single encrypted file

mod encrypted_file;

pub use encrypted_file::{EncryptedFileStorage, DEFAULT_STORE_FILE};
