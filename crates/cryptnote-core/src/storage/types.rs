//! Core data types for vault entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CryptnoteError, Result};

/// Storage identifier of an entry: the entry file's name without extension.
///
/// Generated ids look like `20261017_142501_384`, so lexicographic order is
/// chronological order. Imported entries use `imported_<timestamp>_<name>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Wrap a user- or filesystem-supplied id after checking it names a plain
    /// file stem (no separators, no traversal).
    pub fn parse(value: &str) -> Result<Self> {
        let valid = !value.is_empty()
            && value != "."
            && value != ".."
            && !value.starts_with('.')
            && !value.contains(['/', '\\', '\0']);
        if !valid {
            return Err(CryptnoteError::Validation(format!(
                "Invalid entry id: {:?}",
                value
            )));
        }
        Ok(Self(value.to_string()))
    }

    pub(crate) fn from_trusted(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A decrypted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    pub body: Vec<String>,
}

impl Entry {
    /// Body lines joined with `\n`.
    pub fn body_text(&self) -> String {
        self.body.join("\n")
    }
}
