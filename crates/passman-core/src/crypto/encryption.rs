//! AES-256-CBC encryption with PKCS#7 padding
//!
//! The store file is the raw ciphertext, nothing else: no header, no
//! random IV prefix and no authentication tag. Key and IV both come from
//! the password derivation, so the same password and plaintext always
//! encrypt to the same bytes.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use super::DerivedKey;
use crate::error::{Result, VaultError};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Encrypt plaintext using AES-256-CBC
///
/// # Arguments
/// * `plaintext` - The data to encrypt
/// * `key` - Key and IV derived from the master password
///
/// # Returns
/// Padded ciphertext, a whole number of 16-byte blocks
pub fn encrypt(plaintext: &[u8], key: &DerivedKey) -> Result<Vec<u8>> {
    let cipher = Aes256CbcEnc::new_from_slices(key.key(), key.iv())
        .map_err(|e| VaultError::EncryptionError(e.to_string()))?;

    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt ciphertext using AES-256-CBC
///
/// Bad padding or a length that is not a multiple of the block size is an
/// [`VaultError::IntegrityError`]. A wrong key usually ends up here, but not
/// always: callers must still validate the plaintext.
pub fn decrypt(ciphertext: &[u8], key: &DerivedKey) -> Result<Vec<u8>> {
    let cipher = Aes256CbcDec::new_from_slices(key.key(), key.iv())
        .map_err(|e| VaultError::EncryptionError(e.to_string()))?;

    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| VaultError::IntegrityError)
}
