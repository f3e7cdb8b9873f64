use cryptnote_core::{CryptnoteError, EditMode, EntryId, TextBuffer};

use crate::app::{open_vault, unlock_with_retry};
use crate::cli::{AddArgs, Cli, EditArgs, ListArgs, ShowArgs};
use crate::config::CryptnoteConfig;
use crate::helpers::{body_lines, edit_from_stdin, is_interactive, read_title};
use crate::output::{entry_json, list_row_json, list_row_text, print_entry};

fn parse_id(value: &str) -> anyhow::Result<EntryId> {
    EntryId::parse(value.trim()).map_err(|_| {
        CryptnoteError::Validation(format!(
            "Invalid entry id {:?}\nHint: Run `cryptnote list` to find entry IDs.",
            value
        ))
        .into()
    })
}

fn not_found_hint(err: CryptnoteError) -> anyhow::Error {
    match err {
        CryptnoteError::NotFound(message) => CryptnoteError::NotFound(format!(
            "{}\nHint: Run `cryptnote list` to find entry IDs.",
            message
        ))
        .into(),
        other => other.into(),
    }
}

pub fn handle_list(cli: &Cli, config: &CryptnoteConfig, args: &ListArgs) -> anyhow::Result<()> {
    let vault = open_vault(cli, config)?;
    let session = unlock_with_retry(&vault)?;
    let entries = session.list_entries()?;

    if args.json {
        let rows: Vec<_> = entries
            .iter()
            .map(|(id, entry)| list_row_json(id, entry))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if entries.is_empty() {
        if !cli.quiet {
            println!("No entries found.");
        }
        return Ok(());
    }
    for (id, entry) in &entries {
        println!("{}", list_row_text(id, entry));
    }
    Ok(())
}

pub fn handle_show(cli: &Cli, config: &CryptnoteConfig, args: &ShowArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let vault = open_vault(cli, config)?;
    let session = unlock_with_retry(&vault)?;
    let entry = session.read(&id).map_err(not_found_hint)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entry_json(&entry))?);
    } else {
        print_entry(&entry, cli.quiet);
    }
    Ok(())
}

pub fn handle_add(cli: &Cli, config: &CryptnoteConfig, args: &AddArgs) -> anyhow::Result<()> {
    let vault = open_vault(cli, config)?;
    let session = unlock_with_retry(&vault)?;

    let title = read_title(args.title.clone(), is_interactive() && args.body.is_none())?;
    let body = match &args.body {
        Some(value) => body_lines(value),
        None => edit_from_stdin(TextBuffer::new())?,
    };

    let id = session.write(&title, body)?;
    if !cli.quiet {
        println!("Added entry {}", id);
    } else {
        println!("{}", id);
    }
    Ok(())
}

pub fn handle_edit(cli: &Cli, config: &CryptnoteConfig, args: &EditArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let vault = open_vault(cli, config)?;
    let session = unlock_with_retry(&vault)?;
    let new_title = args.title.clone().unwrap_or_default();

    match (&args.body, args.append) {
        (Some(value), true) => session
            .append(&id, &new_title, body_lines(value))
            .map_err(not_found_hint)?,
        (Some(value), false) => session
            .edit(&id, &new_title, body_lines(value))
            .map_err(not_found_hint)?,
        (None, append) => {
            let mode = if append {
                EditMode::Append
            } else {
                EditMode::Overwrite
            };
            let (_, buffer) = session.begin_edit(&id, mode).map_err(not_found_hint)?;
            // Piped input replaces the body rather than being typed over it.
            let buffer = if is_interactive() || append {
                buffer
            } else {
                TextBuffer::new()
            };
            let body = edit_from_stdin(buffer)?;
            session.edit(&id, &new_title, body)?;
        }
    }

    if !cli.quiet {
        println!("Updated entry {}", id);
    }
    Ok(())
}
