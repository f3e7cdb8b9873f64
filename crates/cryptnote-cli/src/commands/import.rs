use cryptnote_core::CryptnoteError;

use crate::app::{open_vault, unlock_with_retry};
use crate::cli::{Cli, ImportArgs};
use crate::config::{expand_home, CryptnoteConfig};

pub fn handle_import(cli: &Cli, config: &CryptnoteConfig, args: &ImportArgs) -> anyhow::Result<()> {
    let source = expand_home(args.path.trim())?;
    let vault = open_vault(cli, config)?;
    let session = unlock_with_retry(&vault)?;

    let id = session.import(&source).map_err(|err| match err {
        CryptnoteError::Authentication(_) => CryptnoteError::Authentication(format!(
            "{} does not open under this vault's password\nHint: The file may be corrupt or sealed under a different password.",
            source.display()
        )),
        other => other,
    })?;

    if !cli.quiet {
        println!("Imported {} as {}", source.display(), id);
    } else {
        println!("{}", id);
    }
    Ok(())
}
