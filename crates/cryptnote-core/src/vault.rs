//! Vault façade: setup, unlock and the entry flows of an unlocked session.
//!
//! ```no_run
//! use cryptnote_core::{Vault, VaultConfig};
//!
//! let vault = Vault::open(VaultConfig::new("/tmp/my-vault"))?;
//! let session = if vault.is_initialized() {
//!     vault.unlock("correctpw1")?
//! } else {
//!     vault.setup("correctpw1", "correctpw1")?
//! };
//! let id = session.write("Groceries", vec!["eggs".to_string()])?;
//! println!("{}", session.read(&id)?.title);
//! # Ok::<(), cryptnote_core::CryptnoteError>(())
//! ```

use std::fs;
use std::path::Path;

use crate::config::VaultConfig;
use crate::credential::CredentialStore;
use crate::crypto::{validate_new_password, EncryptionKey};
use crate::editor::TextBuffer;
use crate::error::{CryptnoteError, Result};
use crate::rotation::{rotate_password, rotate_verified, RotationReport, RotationRequest};
use crate::storage::{Entry, EntryId, FileNoteRepository, NoteStore};

/// Title stored when the user leaves it blank.
pub const DEFAULT_TITLE: &str = "Untitled";

/// How an existing entry's body is presented for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Edit the existing body in place.
    Overwrite,
    /// Keep the existing body and add text after a marker.
    Append,
}

/// A vault directory: one credential file plus the notes directory.
#[derive(Debug)]
pub struct Vault {
    config: VaultConfig,
    credentials: CredentialStore,
    store: FileNoteRepository,
}

impl Vault {
    /// Validate `config`. Nothing is created on disk until [`Vault::setup`].
    ///
    /// # Errors
    ///
    /// `Config` for an unusable configuration.
    pub fn open(config: VaultConfig) -> Result<Self> {
        config.validate()?;
        let credentials = CredentialStore::new(config.credential_path(), config.kdf);
        let store = FileNoteRepository::from_config(&config);
        tracing::debug!(root = %config.root.display(), "vault opened");

        Ok(Self {
            config,
            credentials,
            store,
        })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn store(&self) -> &FileNoteRepository {
        &self.store
    }

    /// Whether a master password has been set.
    pub fn is_initialized(&self) -> bool {
        self.credentials.exists()
    }

    /// First-time setup: create the vault directories, set the master
    /// password and unlock.
    ///
    /// # Errors
    ///
    /// `Validation` if the vault already has a credential or the password is
    /// rejected by policy, `Storage` if the directories or the credential
    /// cannot be written.
    pub fn setup(&self, password: &str, confirmation: &str) -> Result<Session<'_>> {
        if self.is_initialized() {
            return Err(CryptnoteError::Validation(
                "Vault is already initialized".to_string(),
            ));
        }
        validate_new_password(password, confirmation, self.config.min_password_len)?;

        fs::create_dir_all(&self.config.root).map_err(|e| {
            CryptnoteError::Storage(format!(
                "Failed to create vault directory {}: {}",
                self.config.root.display(),
                e
            ))
        })?;
        self.store.ensure_dir()?;
        let (_, key) = self.credentials.initialize(password)?;
        tracing::info!(root = %self.config.root.display(), "vault initialized");
        Ok(Session { vault: self, key })
    }

    /// Unlock with the master password.
    ///
    /// # Errors
    ///
    /// `NotFound` before setup, `Authentication` for a wrong password.
    pub fn unlock(&self, password: &str) -> Result<Session<'_>> {
        let credential = self.credentials.load()?;
        let (matched, key) = self.credentials.verify(password, &credential)?;
        if !matched {
            return Err(CryptnoteError::Authentication(
                "Incorrect password".to_string(),
            ));
        }
        Ok(Session { vault: self, key })
    }

    /// Change the master password starting from a locked vault.
    ///
    /// The old password is checked once and its key drives the re-seal pass;
    /// the returned session holds the new key. Per-entry failures are
    /// counted as in [`rotate_password`].
    ///
    /// # Errors
    ///
    /// `NotFound` before setup, `Authentication` for a wrong old password,
    /// `Validation` if the new password is rejected. Nothing is changed in
    /// any of those cases.
    pub fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<(RotationReport, Session<'_>)> {
        let session = self.unlock(old_password)?;
        let request = RotationRequest::new(
            old_password,
            new_password,
            confirmation,
            self.config.min_password_len,
        );
        let (report, key) = rotate_verified(&self.credentials, &self.store, &session.key, &request)?;
        Ok((report, Session { vault: self, key }))
    }
}

/// An unlocked vault. The session key is wiped when this is dropped.
pub struct Session<'v> {
    vault: &'v Vault,
    key: EncryptionKey,
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("root", &self.vault.config.root)
            .finish_non_exhaustive()
    }
}

impl<'v> Session<'v> {
    pub fn vault(&self) -> &'v Vault {
        self.vault
    }

    /// Entry ids, newest first.
    pub fn list(&self) -> Result<Vec<EntryId>> {
        self.vault.store.list()
    }

    /// Decrypt every entry, newest first. Entries that do not open under the
    /// session key are returned as errors alongside their id.
    pub fn list_entries(&self) -> Result<Vec<(EntryId, Result<Entry>)>> {
        Ok(self
            .list()?
            .into_iter()
            .map(|id| {
                let entry = self.read(&id);
                (id, entry)
            })
            .collect())
    }

    pub fn read(&self, id: &EntryId) -> Result<Entry> {
        self.vault.store.load(id, &self.key)
    }

    /// Save a new entry.
    ///
    /// A blank title becomes [`DEFAULT_TITLE`].
    ///
    /// # Errors
    ///
    /// `Validation` if the body holds nothing but whitespace.
    pub fn write(&self, title: &str, body: Vec<String>) -> Result<EntryId> {
        ensure_body(&body)?;
        let title = match title.trim() {
            "" => DEFAULT_TITLE,
            trimmed => trimmed,
        };
        let id = self.vault.store.save(&self.key, title, &body)?;
        tracing::info!(id = %id, "entry written");
        Ok(id)
    }

    /// Load an entry and prepare a buffer for editing its body.
    pub fn begin_edit(&self, id: &EntryId, mode: EditMode) -> Result<(Entry, TextBuffer)> {
        let entry = self.read(id)?;
        let buffer = match mode {
            EditMode::Overwrite => TextBuffer::with_lines(entry.body.clone()),
            EditMode::Append => TextBuffer::for_append(entry.body.clone()),
        };
        Ok((entry, buffer))
    }

    /// Replace an entry's title and body.
    ///
    /// A blank `new_title` keeps the current title.
    ///
    /// # Errors
    ///
    /// `NotFound`/`Authentication` if the entry cannot be read, `Validation`
    /// if the body is blank.
    pub fn edit(&self, id: &EntryId, new_title: &str, body: Vec<String>) -> Result<()> {
        ensure_body(&body)?;
        let current = self.read(id)?;
        let title = match new_title.trim() {
            "" => current.title.as_str(),
            trimmed => trimmed,
        };
        self.vault.store.overwrite(id, &self.key, title, &body)?;
        tracing::info!(id = %id, "entry updated");
        Ok(())
    }

    /// Add `appended` after the append marker of an existing entry.
    pub fn append(&self, id: &EntryId, new_title: &str, appended: Vec<String>) -> Result<()> {
        ensure_body(&appended)?;
        let (_, buffer) = self.begin_edit(id, EditMode::Append)?;
        let mut body = buffer.finish();
        // the seeded buffer ends with an empty line for the new text
        body.pop();
        body.extend(appended);
        self.edit(id, new_title, body)
    }

    /// Copy an externally supplied entry file into the vault.
    pub fn import(&self, source: &Path) -> Result<EntryId> {
        self.vault.store.import(source, &self.key)
    }

    /// Rotate the master password and re-seal every entry.
    ///
    /// On success the session continues under the new key. See
    /// [`rotate_password`] for the failure contract.
    pub fn change_password(
        &mut self,
        old_password: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<RotationReport> {
        let request = RotationRequest::new(
            old_password,
            new_password,
            confirmation,
            self.vault.config.min_password_len,
        );
        let (report, new_key) = rotate_password(
            &self.vault.credentials,
            &self.vault.store,
            &self.key,
            &request,
        )?;
        self.key = new_key;
        Ok(report)
    }
}

fn ensure_body(body: &[String]) -> Result<()> {
    if body.iter().all(|line| line.trim().is_empty()) {
        return Err(CryptnoteError::Validation(
            "Entry has no content".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KdfParams;
    use crate::editor::APPEND_MARKER;
    use tempfile::tempdir;

    fn config(root: &Path) -> VaultConfig {
        VaultConfig::new(root).with_kdf(KdfParams {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_open_touches_nothing_until_setup() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("vault");
        let vault = Vault::open(config(&root)).unwrap();

        assert!(!root.exists());
        assert!(!vault.is_initialized());
        assert!(matches!(
            vault.unlock("correctpw1"),
            Err(CryptnoteError::NotFound(_))
        ));
        assert!(!root.exists());

        vault.setup("correctpw1", "correctpw1").unwrap();
        assert!(root.join("notes").is_dir());
        assert!(root.join(".credential").is_file());
    }

    #[test]
    fn test_setup_then_unlock() {
        let dir = tempdir().unwrap();
        let vault = Vault::open(config(dir.path())).unwrap();

        let id = {
            let session = vault.setup("correctpw1", "correctpw1").unwrap();
            session.write("T", lines(&["hello"])).unwrap()
        };

        assert!(vault.is_initialized());
        let session = vault.unlock("correctpw1").unwrap();
        assert_eq!(session.read(&id).unwrap().body, lines(&["hello"]));
        assert!(matches!(
            vault.unlock("wrongpw"),
            Err(CryptnoteError::Authentication(_))
        ));
    }

    #[test]
    fn test_setup_rejects_policy_violations_and_reinit() {
        let dir = tempdir().unwrap();
        let vault = Vault::open(config(dir.path())).unwrap();

        assert!(matches!(
            vault.setup("short", "short"),
            Err(CryptnoteError::Validation(_))
        ));
        assert!(!vault.is_initialized());

        vault.setup("correctpw1", "correctpw1").unwrap();
        assert!(matches!(
            vault.setup("another-pw", "another-pw"),
            Err(CryptnoteError::Validation(_))
        ));
    }

    #[test]
    fn test_unlock_before_setup_is_not_found() {
        let dir = tempdir().unwrap();
        let vault = Vault::open(config(dir.path())).unwrap();
        assert!(matches!(
            vault.unlock("correctpw1"),
            Err(CryptnoteError::NotFound(_))
        ));
    }

    #[test]
    fn test_write_defaults_title_and_rejects_blank_body() {
        let dir = tempdir().unwrap();
        let vault = Vault::open(config(dir.path())).unwrap();
        let session = vault.setup("correctpw1", "correctpw1").unwrap();

        let id = session.write("   ", lines(&["body"])).unwrap();
        assert_eq!(session.read(&id).unwrap().title, DEFAULT_TITLE);

        assert!(matches!(
            session.write("T", lines(&["", "  "])),
            Err(CryptnoteError::Validation(_))
        ));
        assert_eq!(session.list().unwrap().len(), 1);
    }

    #[test]
    fn test_edit_keeps_title_when_blank() {
        let dir = tempdir().unwrap();
        let vault = Vault::open(config(dir.path())).unwrap();
        let session = vault.setup("correctpw1", "correctpw1").unwrap();
        let id = session.write("Original", lines(&["v1"])).unwrap();

        session.edit(&id, "", lines(&["v2"])).unwrap();
        let entry = session.read(&id).unwrap();
        assert_eq!(entry.title, "Original");
        assert_eq!(entry.body, lines(&["v2"]));

        session.edit(&id, "Renamed", lines(&["v3"])).unwrap();
        assert_eq!(session.read(&id).unwrap().title, "Renamed");
    }

    #[test]
    fn test_append_adds_marker_and_text() {
        let dir = tempdir().unwrap();
        let vault = Vault::open(config(dir.path())).unwrap();
        let session = vault.setup("correctpw1", "correctpw1").unwrap();
        let id = session.write("T", lines(&["first"])).unwrap();

        session.append(&id, "", lines(&["second"])).unwrap();

        assert_eq!(
            session.read(&id).unwrap().body,
            lines(&["first", "", APPEND_MARKER, "second"])
        );
    }

    #[test]
    fn test_begin_edit_seeds_buffer() {
        let dir = tempdir().unwrap();
        let vault = Vault::open(config(dir.path())).unwrap();
        let session = vault.setup("correctpw1", "correctpw1").unwrap();
        let id = session.write("T", lines(&["a", "b"])).unwrap();

        let (entry, buffer) = session.begin_edit(&id, EditMode::Overwrite).unwrap();
        assert_eq!(buffer.lines(), entry.body.as_slice());

        let (_, buffer) = session.begin_edit(&id, EditMode::Append).unwrap();
        assert_eq!(buffer.lines().len(), 5);
        assert_eq!(buffer.cursor_line(), 4);
    }

    #[test]
    fn test_change_password_switches_session_key() {
        let dir = tempdir().unwrap();
        let vault = Vault::open(config(dir.path())).unwrap();
        let mut session = vault.setup("correctpw1", "correctpw1").unwrap();
        let id = session.write("T", lines(&["secret"])).unwrap();

        let report = session
            .change_password("correctpw1", "newpassword", "newpassword")
            .unwrap();
        assert_eq!((report.succeeded, report.failed), (1, 0));
        assert_eq!(session.read(&id).unwrap().body, lines(&["secret"]));

        drop(session);
        assert!(vault.unlock("correctpw1").is_err());
        let session = vault.unlock("newpassword").unwrap();
        assert_eq!(session.read(&id).unwrap().title, "T");
    }

    #[test]
    fn test_vault_change_password_from_locked_state() {
        let dir = tempdir().unwrap();
        let vault = Vault::open(config(dir.path())).unwrap();
        let id = {
            let session = vault.setup("correctpw1", "correctpw1").unwrap();
            session.write("T", lines(&["secret"])).unwrap()
        };
        let before = vault.store().read_raw(&id).unwrap();

        assert!(matches!(
            vault.change_password("wrongpw12", "newpassword", "newpassword"),
            Err(CryptnoteError::Authentication(_))
        ));
        assert!(matches!(
            vault.change_password("correctpw1", "newpassword", "mismatch12"),
            Err(CryptnoteError::Validation(_))
        ));
        assert_eq!(vault.store().read_raw(&id).unwrap(), before);
        assert!(vault.unlock("correctpw1").is_ok());

        let (report, session) = vault
            .change_password("correctpw1", "newpassword", "newpassword")
            .unwrap();
        assert_eq!((report.succeeded, report.failed), (1, 0));
        assert_eq!(session.read(&id).unwrap().body, lines(&["secret"]));
        assert!(vault.unlock("correctpw1").is_err());
        assert!(vault.unlock("newpassword").is_ok());
    }

    #[test]
    fn test_list_entries_reports_unreadable_entries() {
        let dir = tempdir().unwrap();
        let vault = Vault::open(config(dir.path())).unwrap();
        let session = vault.setup("correctpw1", "correctpw1").unwrap();
        let id = session.write("T", lines(&["x"])).unwrap();
        fs::write(vault.store().path_for(&id), b"garbage").unwrap();

        let entries = session.list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(matches!(entries[0].1, Err(CryptnoteError::Authentication(_))));
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let dir = tempdir().unwrap();
        let mut config = config(dir.path());
        config.entry_extension = "cnote".to_string();
        assert!(matches!(
            Vault::open(config),
            Err(CryptnoteError::Config(_))
        ));
    }
}
