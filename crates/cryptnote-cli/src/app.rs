use std::path::PathBuf;

use cryptnote_core::{CryptnoteError, Session, Vault, VaultConfig};

use crate::cli::Cli;
use crate::config::{default_config_path, default_vault_path, expand_home, read_config, CryptnoteConfig};
use crate::constants::{env, exit_codes, MAX_PASSWORD_ATTEMPTS};
use crate::helpers::{is_interactive, prompt_password};

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

pub fn load_config() -> anyhow::Result<CryptnoteConfig> {
    read_config(&resolve_config_path()?)
}

/// Vault settings from `--vault`/`CRYPTNOTE_VAULT`, the config file, then the
/// XDG data directory.
pub fn resolve_vault_config(cli: &Cli, config: &CryptnoteConfig) -> anyhow::Result<VaultConfig> {
    let root = match cli.vault.as_deref().or(config.vault.path.as_deref()) {
        Some(path) => expand_home(path)?,
        None => default_vault_path()?,
    };
    Ok(config.vault.to_vault_config(root))
}

pub fn open_vault(cli: &Cli, config: &CryptnoteConfig) -> anyhow::Result<Vault> {
    let vault_config = resolve_vault_config(cli, config)?;
    Ok(Vault::open(vault_config)?)
}

pub fn missing_vault_message(vault: &Vault) -> String {
    format!(
        "No vault found at {}\nHint: Run `cryptnote init` to set a master password.",
        vault.config().root.display()
    )
}

/// Unlock `vault`, prompting up to three times on a terminal.
pub fn unlock_with_retry(vault: &Vault) -> anyhow::Result<Session<'_>> {
    if !vault.is_initialized() {
        return Err(CryptnoteError::NotFound(missing_vault_message(vault)).into());
    }

    let interactive = is_interactive() && std::env::var(env::PASSWORD).is_err();
    let max_attempts = if interactive { MAX_PASSWORD_ATTEMPTS } else { 1 };
    let mut attempts = 0;

    loop {
        attempts += 1;
        let password = prompt_password("Master password", interactive)?;
        match vault.unlock(&password) {
            Ok(session) => return Ok(session),
            Err(err) if err.is_authentication() => {
                let remaining = max_attempts.saturating_sub(attempts);
                if remaining == 0 {
                    return Err(CryptnoteError::Authentication(
                        "Incorrect password\nHint: A forgotten master password cannot be recovered."
                            .to_string(),
                    )
                    .into());
                }
                eprintln!(
                    "Incorrect password. {} attempt{} remaining.",
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Exit code for an error returned by a command handler.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<CryptnoteError>() {
        Some(CryptnoteError::NotFound(_)) => exit_codes::NOT_FOUND,
        Some(CryptnoteError::Validation(_)) => exit_codes::INVALID_INPUT,
        Some(CryptnoteError::Authentication(_)) => exit_codes::AUTH_FAILED,
        Some(CryptnoteError::Cancelled) => exit_codes::CANCELLED,
        _ => 1,
    }
}
