use std::string;

use aws_lc_rs::{
    aead::{AES_256_GCM, Aad, Nonce, RandomizedNonceKey},
    rand::fill,
};
use base64::{Engine, prelude::BASE64_STANDARD};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during encryption operations.
#[derive(Debug, Error)]
pub enum EncryptionError {
    /// An unspecified error occurred while encrypting data.
    #[error("An unspecified error occurred while encrypting data")]
    Unspecified(#[from] aws_lc_rs::error::Unspecified),
}

/// Errors that can occur during decryption operations.
#[derive(Debug, Error)]
pub enum DecryptionError {
    /// An unspecified error occurred while decrypting data.
    #[error("An unspecified error occurred while decrypting data")]
    Unspecified(#[from] aws_lc_rs::error::Unspecified),

    /// Failed to decode base64 data during decryption.
    #[error("An error occurred while decoding BASE64 data for decryption: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Failed to convert decrypted bytes to UTF-8 string.
    #[error("An error occurred while converting bytes to UTF-8 for decryption: {0}")]
    FromUtf8(#[from] string::FromUtf8Error),

    /// The key ID in the encrypted data did not match the expected key ID.
    #[error("There was a mismatch in the key id while decrypting data (got: {0}, expected: {1})")]
    MismatchedKeyId(u32, u32),
}

/// Holds an encryption key and its identifier.
pub struct EncryptionKey {
    /// Unique identifier for the key.
    pub id: u32,
    /// The key material used for encryption and decryption.
    pub key: RandomizedNonceKey,
}

/// A secret encrypted with AES-256-GCM, as stored at rest.
///
/// Carries the id of the key that produced it so that key rotation can be
/// detected on decryption.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncryptedSecret {
    /// Identifier of the key used for encryption.
    pub key_id: u32,
    /// Base64-encoded nonce used during encryption.
    pub nonce: String,
    /// Base64-encoded ciphertext.
    pub ciphertext: String,
}

/// Encrypts a secret value with the provided [`EncryptionKey`].
pub fn encrypt_secret(
    value: &str,
    encryption_key: &EncryptionKey,
) -> Result<EncryptedSecret, EncryptionError> {
    let mut in_out = value.as_bytes().to_vec();
    let nonce = encryption_key
        .key
        .seal_in_place_append_tag(Aad::empty(), &mut in_out)?;

    Ok(EncryptedSecret {
        key_id: encryption_key.id,
        nonce: BASE64_STANDARD.encode(nonce.as_ref()),
        ciphertext: BASE64_STANDARD.encode(in_out),
    })
}

/// Decrypts an [`EncryptedSecret`] with the provided [`EncryptionKey`].
///
/// Fails if the key id does not match or if decoding or decryption fails. The
/// plaintext is returned wrapped in a [`SecretString`] so it is not logged by
/// accident.
pub fn decrypt_secret(
    secret: EncryptedSecret,
    encryption_key: &EncryptionKey,
) -> Result<SecretString, DecryptionError> {
    if secret.key_id != encryption_key.id {
        return Err(DecryptionError::MismatchedKeyId(
            secret.key_id,
            encryption_key.id,
        ));
    }

    let mut ciphertext = BASE64_STANDARD.decode(secret.ciphertext)?;
    let nonce = Nonce::try_assume_unique_for_key(&BASE64_STANDARD.decode(secret.nonce)?)?;

    let plaintext = encryption_key
        .key
        .open_in_place(nonce, Aad::empty(), &mut ciphertext)?;
    let value = String::from_utf8(plaintext.to_vec())?;

    Ok(value.into())
}

/// Generates a random [`RandomizedNonceKey`] of length `N` bytes for use with AES-256-GCM.
pub fn generate_random_key<const N: usize>()
-> Result<RandomizedNonceKey, aws_lc_rs::error::Unspecified> {
    let mut key_bytes = [0u8; N];
    fill(&mut key_bytes)?;

    RandomizedNonceKey::new(&AES_256_GCM, &key_bytes)
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn test_key(id: u32) -> EncryptionKey {
        EncryptionKey {
            id,
            key: generate_random_key::<32>().unwrap(),
        }
    }

    #[test]
    fn encrypted_secret_round_trips() {
        let key = test_key(1);

        let encrypted = encrypt_secret("ghs_installation_token", &key).unwrap();
        assert_eq!(encrypted.key_id, 1);

        let decrypted = decrypt_secret(encrypted, &key).unwrap();
        assert_eq!(decrypted.expose_secret(), "ghs_installation_token");
    }

    #[test]
    fn decryption_fails_on_key_id_mismatch() {
        let key = test_key(1);
        let other_key = test_key(2);

        let encrypted = encrypt_secret("ghs_installation_token", &key).unwrap();
        let result = decrypt_secret(encrypted, &other_key);

        assert!(matches!(
            result,
            Err(DecryptionError::MismatchedKeyId(1, 2))
        ));
    }
}
