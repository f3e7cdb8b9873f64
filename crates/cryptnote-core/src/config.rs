//! Vault configuration.
//!
//! A `VaultConfig` is built once (usually by the CLI from a TOML file) and
//! handed by value to every component at construction. Nothing in the core
//! reads global state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::{KdfParams, DEFAULT_MIN_PASSWORD_LENGTH};
use crate::error::{CryptnoteError, Result};

pub const DEFAULT_NOTES_DIR: &str = "notes";
pub const DEFAULT_CREDENTIAL_FILE: &str = ".credential";
pub const DEFAULT_ENTRY_EXTENSION: &str = ".cnote";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Directory holding the credential file and the notes directory
    pub root: PathBuf,
    /// Notes directory, relative to `root`
    pub notes_dir: String,
    /// Credential file name, relative to `root`
    pub credential_file: String,
    /// Extension of entry files, including the leading dot
    pub entry_extension: String,
    pub min_password_len: usize,
    pub kdf: KdfParams,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            notes_dir: DEFAULT_NOTES_DIR.to_string(),
            credential_file: DEFAULT_CREDENTIAL_FILE.to_string(),
            entry_extension: DEFAULT_ENTRY_EXTENSION.to_string(),
            min_password_len: DEFAULT_MIN_PASSWORD_LENGTH,
            kdf: KdfParams::default(),
        }
    }
}

impl VaultConfig {
    /// Default configuration rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    pub fn notes_path(&self) -> PathBuf {
        self.root.join(&self.notes_dir)
    }

    pub fn credential_path(&self) -> PathBuf {
        self.root.join(&self.credential_file)
    }

    /// Reject configurations the vault cannot operate with.
    pub fn validate(&self) -> Result<()> {
        let ext = &self.entry_extension;
        if ext.len() < 2 || !ext.starts_with('.') || ext[1..].contains(['.', '/', '\\']) {
            return Err(CryptnoteError::Config(format!(
                "entry_extension must look like \".ext\" (got {:?})",
                ext
            )));
        }
        if self.min_password_len == 0 {
            return Err(CryptnoteError::Config(
                "min_password_len must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("notes_dir", &self.notes_dir),
            ("credential_file", &self.credential_file),
        ] {
            if value.trim().is_empty() || Path::new(value).is_absolute() {
                return Err(CryptnoteError::Config(format!(
                    "{} must be a relative path (got {:?})",
                    name, value
                )));
            }
        }
        self.kdf
            .validate()
            .map_err(|e| CryptnoteError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = VaultConfig::new("/tmp/vault");
        assert!(config.validate().is_ok());
        assert_eq!(config.notes_path(), PathBuf::from("/tmp/vault/notes"));
        assert_eq!(
            config.credential_path(),
            PathBuf::from("/tmp/vault/.credential")
        );
    }

    #[test]
    fn test_extension_requires_leading_dot() {
        let mut config = VaultConfig::default();
        config.entry_extension = "cnote".to_string();
        assert!(matches!(config.validate(), Err(CryptnoteError::Config(_))));

        config.entry_extension = ".".to_string();
        assert!(config.validate().is_err());

        config.entry_extension = ".a/b".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_min_password_len_rejected() {
        let mut config = VaultConfig::default();
        config.min_password_len = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_absolute_notes_dir_rejected() {
        let mut config = VaultConfig::default();
        config.notes_dir = "/etc".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_kdf_reported_as_config_error() {
        let config = VaultConfig::default().with_kdf(KdfParams {
            memory_kib: 8,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(config.validate(), Err(CryptnoteError::Config(_))));
    }
}
