use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use cryptnote_core::{KdfParams, VaultConfig};

/// Optional `config.toml`. Every key may be omitted.
///
/// ```toml
/// [vault]
/// path = "/home/me/.local/share/cryptnote"
/// entry_extension = ".cnote"
/// min_password_len = 12
///
/// [vault.kdf]
/// memory_kib = 65536
/// iterations = 3
/// parallelism = 1
///
/// [logging]
/// filter = "cryptnote_core=info"
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CryptnoteConfig {
    #[serde(default)]
    pub vault: VaultSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VaultSection {
    pub path: Option<String>,
    pub notes_dir: Option<String>,
    pub credential_file: Option<String>,
    pub entry_extension: Option<String>,
    pub min_password_len: Option<usize>,
    pub kdf: Option<KdfParams>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub filter: Option<String>,
}

impl VaultSection {
    /// Core configuration rooted at `root`, with this section's overrides.
    pub fn to_vault_config(&self, root: PathBuf) -> VaultConfig {
        let mut config = VaultConfig::new(root);
        if let Some(value) = &self.notes_dir {
            config.notes_dir = value.clone();
        }
        if let Some(value) = &self.credential_file {
            config.credential_file = value.clone();
        }
        if let Some(value) = &self.entry_extension {
            config.entry_extension = value.clone();
        }
        if let Some(value) = self.min_password_len {
            config.min_password_len = value;
        }
        if let Some(value) = self.kdf {
            config.kdf = value;
        }
        config
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_vault_path() -> anyhow::Result<PathBuf> {
    xdg_data_dir()
}

/// Read `path`, or fall back to defaults when it does not exist.
pub fn read_config(path: &Path) -> anyhow::Result<CryptnoteConfig> {
    if !path.exists() {
        return Ok(CryptnoteConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("cryptnote"));
        }
    }
    Ok(home_dir()?.join(".config").join("cryptnote"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("cryptnote"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("cryptnote"))
}

/// Expand a leading `~/` against `$HOME`.
pub fn expand_home(path: &str) -> anyhow::Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => Ok(home_dir()?.join(rest)),
        None if path == "~" => home_dir(),
        None => Ok(PathBuf::from(path)),
    }
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempdir().unwrap();
        let config = read_config(&dir.path().join("config.toml")).unwrap();
        assert!(config.vault.path.is_none());
        assert!(config.logging.filter.is_none());
    }

    #[test]
    fn test_partial_config_overrides_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[vault]\npath = \"/srv/notes\"\nmin_password_len = 12\n\n[vault.kdf]\nmemory_kib = 4096\n",
        )
        .unwrap();

        let config = read_config(&path).unwrap();
        assert_eq!(config.vault.path.as_deref(), Some("/srv/notes"));

        let vault = config.vault.to_vault_config(PathBuf::from("/srv/notes"));
        assert_eq!(vault.min_password_len, 12);
        assert_eq!(vault.kdf.memory_kib, 4096);
        assert_eq!(vault.kdf.iterations, KdfParams::default().iterations);
        assert_eq!(vault.entry_extension, ".cnote");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[vault\npath = ").unwrap();

        let err = read_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(
            expand_home("/tmp/x.cnote").unwrap(),
            PathBuf::from("/tmp/x.cnote")
        );
        assert_eq!(expand_home("rel.cnote").unwrap(), PathBuf::from("rel.cnote"));
    }
}
