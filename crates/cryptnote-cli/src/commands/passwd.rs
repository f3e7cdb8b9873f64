use cryptnote_core::CryptnoteError;

use crate::app::{missing_vault_message, open_vault};
use crate::cli::Cli;
use crate::config::CryptnoteConfig;
use crate::constants::env;
use crate::helpers::{is_interactive, prompt_new_password, prompt_password};

pub fn handle_passwd(cli: &Cli, config: &CryptnoteConfig) -> anyhow::Result<()> {
    let vault = open_vault(cli, config)?;
    if !vault.is_initialized() {
        return Err(CryptnoteError::NotFound(missing_vault_message(&vault)).into());
    }

    let interactive = is_interactive();
    let old_password = prompt_password("Current master password", interactive)?;
    let (new_password, confirmation) = prompt_new_password(env::NEW_PASSWORD, interactive)?;

    let (report, _session) = vault.change_password(&old_password, &new_password, &confirmation)?;

    if !report.is_complete() {
        eprintln!(
            "Warning: {} entr{} could not be re-encrypted and still need the old password:",
            report.failed,
            if report.failed == 1 { "y" } else { "ies" }
        );
        for id in &report.failed_ids {
            eprintln!("  {}", id);
        }
    }
    if !cli.quiet {
        println!(
            "Master password changed; {} entr{} re-encrypted.",
            report.succeeded,
            if report.succeeded == 1 { "y" } else { "ies" }
        );
    }
    Ok(())
}
