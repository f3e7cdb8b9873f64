//! Key derivation using Argon2id.
//!
//! Turns a master password and a per-vault salt into the 256-bit key that
//! seals every entry. The function is deliberately expensive so that a stolen
//! credential file is costly to brute-force.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptnoteError, Result};

/// Length of the derived key in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// Length of the random salt stored in the credential file.
pub const SALT_LENGTH: usize = 16;

/// Tunable Argon2id cost parameters.
///
/// Defaults follow the OWASP Argon2id baseline:
/// - Memory: 19 MiB
/// - Iterations: 3
/// - Parallelism: 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 3,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    fn to_argon2(self) -> Result<Params> {
        Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LENGTH),
        )
        .map_err(|e| CryptnoteError::Crypto(format!("Invalid Argon2 parameters: {}", e)))
    }

    /// Check the parameters without deriving anything.
    pub fn validate(&self) -> Result<()> {
        self.to_argon2().map(|_| ())
    }
}

/// Symmetric key material for the active session.
///
/// Lives only in process memory and is zeroized when dropped. Rotation
/// replaces the session's key with a new value; keys are never mutated.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    key: [u8; KEY_LENGTH],
}

impl EncryptionKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Raw key bytes. Use only for immediate cipher setup; never store or log.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Hex-encoded SHA-256 of the key, as stored in the credential file.
    pub fn verifier(&self) -> String {
        hex::encode(Sha256::digest(&self.key))
    }
}

impl PartialEq for EncryptionKey {
    fn eq(&self, other: &Self) -> bool {
        self.key.ct_eq(&other.key).into()
    }
}

impl Eq for EncryptionKey {}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a password using Argon2id.
///
/// Same password + salt + params always produce the same key.
///
/// # Errors
///
/// Returns `CryptnoteError::Crypto` only when Argon2 rejects `params` or the
/// salt is shorter than Argon2's minimum.
pub fn derive_key(password: &str, salt: &[u8], params: &KdfParams) -> Result<EncryptionKey> {
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);

    let mut key_bytes = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key_bytes)
        .map_err(|e| CryptnoteError::Crypto(format!("Key derivation failed: {}", e)))?;

    let key = EncryptionKey::from_bytes(key_bytes);
    key_bytes.zeroize();
    Ok(key)
}
