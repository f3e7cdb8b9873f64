//! Authenticated encryption of a single entry blob.
//!
//! Blob layout on disk:
//!
//! ```text
//! +-----------+--------------------------------+
//! | nonce(12) | AES-256-GCM ciphertext + tag   |
//! +-----------+--------------------------------+
//! ```
//!
//! The whole blob is the unit of decryption. A wrong key, a flipped bit and a
//! truncated file all fail the same way, and no plaintext is returned unless
//! the tag verifies.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};

use super::kdf::EncryptionKey;
use crate::error::{CryptnoteError, Result};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Encrypt `plaintext` under `key` with a fresh random nonce.
///
/// Sealing the same plaintext twice yields different blobs.
pub fn seal(plaintext: &[u8], key: &EncryptionKey) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CryptnoteError::Crypto(format!("Invalid key: {}", e)))?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| CryptnoteError::Crypto(format!("Encryption failed: {}", e)))?;

    let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    blob.extend_from_slice(nonce.as_slice());
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Verify and decrypt a blob produced by [`seal`].
///
/// # Errors
///
/// Returns `CryptnoteError::Authentication` for a wrong key, tampering or
/// truncation.
pub fn open(blob: &[u8], key: &EncryptionKey) -> Result<Vec<u8>> {
    if blob.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptnoteError::Authentication(
            "Ciphertext is truncated".to_string(),
        ));
    }
    let (nonce, ciphertext) = blob.split_at(NONCE_SIZE);

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CryptnoteError::Crypto(format!("Invalid key: {}", e)))?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| {
            CryptnoteError::Authentication("Wrong key or corrupted entry".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::KEY_LENGTH;

    fn key(byte: u8) -> EncryptionKey {
        EncryptionKey::from_bytes([byte; KEY_LENGTH])
    }

    #[test]
    fn test_seal_open_round_trip() {
        let plaintext = b"TITLE:T\n--CONTENT--\nhello\nworld";
        let blob = seal(plaintext, &key(1)).unwrap();

        assert_eq!(open(&blob, &key(1)).unwrap(), plaintext);
    }

    #[test]
    fn test_seal_is_not_deterministic() {
        let blob1 = seal(b"same plaintext", &key(1)).unwrap();
        let blob2 = seal(b"same plaintext", &key(1)).unwrap();

        assert_ne!(blob1, blob2);
        assert_ne!(blob1[..NONCE_SIZE], blob2[..NONCE_SIZE]);
    }

    #[test]
    fn test_wrong_key_fails() {
        let blob = seal(b"secret", &key(1)).unwrap();

        let result = open(&blob, &key(2));
        assert!(matches!(result, Err(CryptnoteError::Authentication(_))));
    }

    #[test]
    fn test_every_single_bit_flip_fails() {
        let blob = seal(b"short secret", &key(3)).unwrap();

        for index in 0..blob.len() {
            for bit in 0..8 {
                let mut tampered = blob.clone();
                tampered[index] ^= 1 << bit;
                assert!(
                    open(&tampered, &key(3)).is_err(),
                    "bit {} of byte {} went undetected",
                    bit,
                    index
                );
            }
        }
    }

    #[test]
    fn test_truncated_blob_fails() {
        let blob = seal(b"secret", &key(1)).unwrap();

        assert!(open(&blob[..blob.len() - 1], &key(1)).is_err());
        assert!(open(&blob[..NONCE_SIZE], &key(1)).is_err());
        assert!(open(&[], &key(1)).is_err());
    }

    #[test]
    fn test_empty_plaintext_round_trip() {
        let blob = seal(b"", &key(4)).unwrap();
        assert_eq!(blob.len(), NONCE_SIZE + TAG_SIZE);
        assert!(open(&blob, &key(4)).unwrap().is_empty());
    }
}
