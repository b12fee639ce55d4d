//! AES-256-GCM authenticated encryption.
//!
//! The codec only depends on the [`AeadProvider`] trait; [`AesGcmProvider`] is
//! the implementation the binary uses.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::constants::{AEAD_OVERHEAD, KEY_SIZE, NONCE_SIZE};
use crate::error::{Error, Result};

/// A 256-bit symmetric key.
pub type SecretKey = [u8; KEY_SIZE];

/// Authenticated encryption with a fixed size overhead.
pub trait AeadProvider {
    /// Bytes added to every plaintext by [`AeadProvider::encrypt`].
    fn overhead(&self) -> usize {
        AEAD_OVERHEAD
    }

    /// Returns `nonce || ciphertext || tag`.
    fn encrypt(&self, key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Inverse of [`AeadProvider::encrypt`].
    ///
    /// Must fail with [`Error::AuthenticationFailed`] for any blob that does
    /// not verify, whatever the reason.
    fn decrypt(&self, key: &SecretKey, blob: &[u8]) -> Result<Vec<u8>>;
}

/// AES-256-GCM with a fresh random 96-bit nonce per message.
#[derive(Debug, Default, Clone, Copy)]
pub struct AesGcmProvider;

impl AeadProvider for AesGcmProvider {
    fn encrypt(&self, key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| Error::Encryption(e.to_string()))?;

        let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&ciphertext);

        Ok(result)
    }

    fn decrypt(&self, key: &SecretKey, blob: &[u8]) -> Result<Vec<u8>> {
        if blob.len() < AEAD_OVERHEAD {
            return Err(Error::AuthenticationFailed);
        }

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_SIZE);

        cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| Error::AuthenticationFailed)
    }
}

/// Generates a random key from the operating system's CSPRNG.
pub fn generate_key() -> SecretKey {
    let mut key = [0u8; KEY_SIZE];
    OsRng.fill_bytes(&mut key);
    key
}

/// Parses a key written as 64 hexadecimal characters.
pub fn parse_key(hex_key: &str) -> Result<SecretKey> {
    let bytes = hex::decode(hex_key.trim()).map_err(|e| Error::InvalidKey(e.to_string()))?;
    let len = bytes.len();

    bytes
        .try_into()
        .map_err(|_| Error::InvalidKey(format!("expected {KEY_SIZE} bytes, got {len}")))
}

/// Formats a key as lowercase hex.
pub fn format_key(key: &SecretKey) -> String {
    hex::encode(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = generate_key();
        let plaintext = b"Hello, World! This is a secret message.";

        let blob = AesGcmProvider.encrypt(&key, plaintext).unwrap();
        assert_eq!(blob.len(), plaintext.len() + AEAD_OVERHEAD);
        assert_eq!(AesGcmProvider.decrypt(&key, &blob).unwrap(), plaintext);
    }

    #[test]
    fn test_empty_plaintext() {
        let key = generate_key();
        let blob = AesGcmProvider.encrypt(&key, b"").unwrap();
        assert_eq!(blob.len(), AEAD_OVERHEAD);
        assert!(AesGcmProvider.decrypt(&key, &blob).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_key_fails() {
        let blob = AesGcmProvider.encrypt(&generate_key(), b"secret").unwrap();
        assert_eq!(
            AesGcmProvider.decrypt(&generate_key(), &blob),
            Err(Error::AuthenticationFailed)
        );
    }

    #[test]
    fn test_tampered_blob_fails() {
        let key = generate_key();
        let mut blob = AesGcmProvider.encrypt(&key, b"secret").unwrap();
        blob[NONCE_SIZE] ^= 0x01;
        assert_eq!(
            AesGcmProvider.decrypt(&key, &blob),
            Err(Error::AuthenticationFailed)
        );
    }

    #[test]
    fn test_short_blob_fails() {
        assert_eq!(
            AesGcmProvider.decrypt(&generate_key(), &[0u8; AEAD_OVERHEAD - 1]),
            Err(Error::AuthenticationFailed)
        );
    }

    #[test]
    fn test_nonces_differ() {
        let key = generate_key();
        let a = AesGcmProvider.encrypt(&key, b"same").unwrap();
        let b = AesGcmProvider.encrypt(&key, b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_key() {
        let key = generate_key();
        assert_eq!(parse_key(&format_key(&key)).unwrap(), key);
        assert_eq!(parse_key(&format!(" {}\n", format_key(&key))).unwrap(), key);
        assert!(matches!(parse_key("abcd"), Err(Error::InvalidKey(_))));
        assert!(matches!(parse_key(&"zz".repeat(32)), Err(Error::InvalidKey(_))));
    }
}
