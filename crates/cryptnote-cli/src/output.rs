//! Output formatting helpers for the CLI.

use chrono::NaiveDateTime;

use cryptnote_core::{Entry, EntryId, Result};

const ID_TIMESTAMP_LEN: usize = 15;

/// Creation time encoded in a generated or imported id.
pub fn entry_created(id: &EntryId) -> Option<NaiveDateTime> {
    let raw = id.as_str();
    let raw = raw.strip_prefix("imported_").unwrap_or(raw);
    let stamp = raw.get(..ID_TIMESTAMP_LEN)?;
    NaiveDateTime::parse_from_str(stamp, "%Y%m%d_%H%M%S").ok()
}

/// Convert an entry to JSON for output.
pub fn entry_json(entry: &Entry) -> serde_json::Value {
    serde_json::json!({
        "id": entry.id,
        "title": entry.title,
        "created_at": entry_created(&entry.id),
        "body": entry.body,
    })
}

/// One `list` row as JSON; unreadable entries carry their error.
pub fn list_row_json(id: &EntryId, entry: &Result<Entry>) -> serde_json::Value {
    match entry {
        Ok(entry) => serde_json::json!({
            "id": id,
            "title": entry.title,
            "created_at": entry_created(id),
        }),
        Err(err) => serde_json::json!({
            "id": id,
            "error": err.to_string(),
        }),
    }
}

/// One `list` row in human-readable format.
pub fn list_row_text(id: &EntryId, entry: &Result<Entry>) -> String {
    match entry {
        Ok(entry) => format!("{}  {}", id, entry.title),
        Err(_) => format!("{}  <unreadable>", id),
    }
}

/// Print a single entry in human-readable format.
pub fn print_entry(entry: &Entry, quiet: bool) {
    if !quiet {
        println!("ID: {}", entry.id);
        if let Some(created) = entry_created(&entry.id) {
            println!("Created: {}", created.format("%Y-%m-%d %H:%M:%S"));
        }
        println!("Title: {}", entry.title);
        println!();
    }
    println!("{}", entry.body_text());
}
