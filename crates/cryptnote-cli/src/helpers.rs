//! Input helper functions for the CLI.

use std::io::{self, IsTerminal};

use crossterm::terminal;
use dialoguer::{Input, Password};
use zeroize::Zeroizing;

use cryptnote_core::editor::{run_editor, EditOutcome, NullRenderer};
use cryptnote_core::{CryptnoteError, TextBuffer};

use crate::constants::env;
use crate::editor::{LineInput, TerminalKeys, TerminalView, STATUS_ROWS};

/// Whether prompts can be shown.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

fn env_secret(name: &str) -> Option<Zeroizing<String>> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(Zeroizing::new)
}

/// Prompt for the master password, or read it from `CRYPTNOTE_PASSWORD`.
pub fn prompt_password(prompt: &str, interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = env_secret(env::PASSWORD) {
        return Ok(value);
    }
    if !interactive {
        return Err(anyhow::anyhow!(
            "No password provided and no TTY available. Set {}.",
            env::PASSWORD
        ));
    }
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// A new password and its confirmation.
///
/// From the environment the variable doubles as its own confirmation; on a
/// terminal both are prompted so the policy check sees what was typed.
pub fn prompt_new_password(
    env_name: &str,
    interactive: bool,
) -> anyhow::Result<(Zeroizing<String>, Zeroizing<String>)> {
    if let Some(value) = env_secret(env_name) {
        return Ok((value.clone(), value));
    }
    if !interactive {
        return Err(anyhow::anyhow!(
            "No password provided and no TTY available. Set {}.",
            env_name
        ));
    }
    let password = Password::new()
        .with_prompt("New master password")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
    let confirmation = Password::new()
        .with_prompt("Confirm master password")
        .allow_empty_password(true)
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
    Ok((password, confirmation))
}

/// Title from `--title`, a prompt on a terminal, or blank.
pub fn read_title(title: Option<String>, interactive: bool) -> anyhow::Result<String> {
    if let Some(value) = title {
        return Ok(value);
    }
    if !interactive {
        return Ok(String::new());
    }
    Input::<String>::new()
        .with_prompt("Title")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read title: {}", e))
}

/// Split a `--body` value into lines.
pub fn body_lines(body: &str) -> Vec<String> {
    body.lines().map(str::to_string).collect()
}

/// Whether the full-screen editor can take over the terminal.
fn has_terminal_editor() -> bool {
    io::stdin().is_terminal() && io::stderr().is_terminal()
}

/// Run the editor starting from `buffer`: full-screen on a terminal,
/// line by line from piped stdin.
///
/// # Errors
///
/// `CryptnoteError::Cancelled` if the user leaves the editor with Esc.
pub fn edit_from_stdin(mut buffer: TextBuffer) -> anyhow::Result<Vec<String>> {
    let outcome = if has_terminal_editor() {
        let (_, rows) = terminal::size()?;
        buffer.set_viewport_height(usize::from(rows.saturating_sub(STATUS_ROWS)));
        let mut view = TerminalView::enter()?;
        run_editor(buffer, &mut TerminalKeys, &mut view)?
    } else {
        let mut input = LineInput::new(io::stdin().lock());
        run_editor(buffer, &mut input, &mut NullRenderer)?
    };
    match outcome {
        EditOutcome::Finished(lines) => Ok(lines),
        EditOutcome::Cancelled => Err(CryptnoteError::Cancelled.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_lines_splits_on_newlines() {
        assert_eq!(body_lines("a\nb\r\nc"), vec!["a", "b", "c"]);
        assert!(body_lines("").is_empty());
    }

    #[test]
    fn test_title_flag_wins() {
        assert_eq!(read_title(Some("T".to_string()), false).unwrap(), "T");
        assert_eq!(read_title(None, false).unwrap(), "");
    }
}
