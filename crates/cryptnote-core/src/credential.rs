//! Master password credential.
//!
//! The credential file holds one line:
//!
//! ```text
//! base64(salt) ":" hex(sha256(derived_key))
//! ```
//!
//! Neither the password nor the key is ever written. The verifier hashes the
//! KDF output, so verification is bound to the exact derivation parameters.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;

use crate::crypto::{derive_key, EncryptionKey, KdfParams, SALT_LENGTH};
use crate::error::{CryptnoteError, Result};
use crate::fs::write_atomic;

/// Persisted salt + verifier. Replaced wholesale on rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub salt: [u8; SALT_LENGTH],
    pub verifier: String,
}

impl Credential {
    /// Serialize to the single-line file format.
    pub fn to_line(&self) -> String {
        format!("{}:{}", STANDARD.encode(self.salt), self.verifier)
    }

    /// Parse the single-line file format.
    pub fn parse(line: &str) -> Result<Self> {
        let (salt_b64, verifier) = line
            .trim()
            .split_once(':')
            .ok_or_else(|| CryptnoteError::Storage("Malformed credential file".to_string()))?;

        let salt_bytes = STANDARD
            .decode(salt_b64)
            .map_err(|e| CryptnoteError::Storage(format!("Malformed credential salt: {}", e)))?;
        let salt: [u8; SALT_LENGTH] = salt_bytes.try_into().map_err(|bytes: Vec<u8>| {
            CryptnoteError::Storage(format!(
                "Credential salt must be {} bytes (got {})",
                SALT_LENGTH,
                bytes.len()
            ))
        })?;

        if verifier.len() != 64 || !verifier.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CryptnoteError::Storage(
                "Malformed credential verifier".to_string(),
            ));
        }

        Ok(Self {
            salt,
            verifier: verifier.to_ascii_lowercase(),
        })
    }
}

/// Reads and writes the credential file for one vault.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    kdf: KdfParams,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>, kdf: KdfParams) -> Self {
        Self {
            path: path.into(),
            kdf,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create a fresh credential for `password` and persist it.
    ///
    /// Generates a new random salt, derives the key, and atomically replaces
    /// any previous credential file. Returns the derived key so the caller can
    /// adopt it as the session key.
    ///
    /// # Errors
    ///
    /// Returns `CryptnoteError::Storage` if the file cannot be durably written;
    /// in that case the previous credential (if any) is left intact.
    pub fn initialize(&self, password: &str) -> Result<(Credential, EncryptionKey)> {
        let mut salt = [0u8; SALT_LENGTH];
        OsRng.fill_bytes(&mut salt);

        let key = derive_key(password, &salt, &self.kdf)?;
        let credential = Credential {
            salt,
            verifier: key.verifier(),
        };

        write_atomic(&self.path, credential.to_line().as_bytes(), true)?;
        tracing::info!(path = %self.path.display(), "credential written");

        Ok((credential, key))
    }

    /// Load the stored credential.
    ///
    /// # Errors
    ///
    /// `NotFound` when no credential exists yet, `Storage` when the file is
    /// unreadable or malformed.
    pub fn load(&self) -> Result<Credential> {
        let contents = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CryptnoteError::NotFound(format!(
                "No credential at {}",
                self.path.display()
            )),
            _ => CryptnoteError::Storage(format!(
                "Failed to read credential {}: {}",
                self.path.display(),
                e
            )),
        })?;
        let line = contents.lines().next().unwrap_or_default();
        Credential::parse(line)
    }

    /// Check `password` against `credential`.
    ///
    /// Always returns the key derived from `password`, matched or not, so a
    /// successful caller can adopt it without deriving twice.
    pub fn verify(&self, password: &str, credential: &Credential) -> Result<(bool, EncryptionKey)> {
        let key = derive_key(password, &credential.salt, &self.kdf)?;
        let matched: bool = key
            .verifier()
            .as_bytes()
            .ct_eq(credential.verifier.as_bytes())
            .into();
        Ok((matched, key))
    }
}
