use cryptnote_core::CryptnoteError;

use crate::app::open_vault;
use crate::cli::Cli;
use crate::config::CryptnoteConfig;
use crate::constants::env;
use crate::helpers::{is_interactive, prompt_new_password};

pub fn handle_init(cli: &Cli, config: &CryptnoteConfig) -> anyhow::Result<()> {
    let vault = open_vault(cli, config)?;
    if vault.is_initialized() {
        return Err(CryptnoteError::Validation(format!(
            "Vault at {} is already initialized\nHint: Use `cryptnote passwd` to change the master password.",
            vault.config().root.display()
        ))
        .into());
    }

    let (password, confirmation) = prompt_new_password(env::PASSWORD, is_interactive())?;
    vault.setup(&password, &confirmation)?;

    if !cli.quiet {
        println!("Initialized vault at {}", vault.config().root.display());
    }
    Ok(())
}
