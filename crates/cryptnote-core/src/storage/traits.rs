//! Note store trait definition.
//!
//! `NoteStore` is the seam between the encrypted-entry flows (session,
//! rotation) and the medium that holds the blobs. The file-backed
//! implementation lives in `file_repository`; tests substitute their own.

use std::path::Path;

use chrono::NaiveDateTime;

use super::types::{Entry, EntryId};
use crate::crypto::EncryptionKey;
use crate::error::Result;

/// Storage interface for encrypted entries.
///
/// All implementations must ensure:
/// - Entries are only ever written as sealed blobs
/// - Ids are unique; ids from different seconds sort newest-first when
///   ordered descending, order within one second is unspecified
/// - `save` never replaces an existing entry
pub trait NoteStore {
    /// All entry ids, newest first.
    fn list(&self) -> Result<Vec<EntryId>>;

    /// Produce an id for an entry created at `now` that no existing entry uses.
    fn generate_id(&self, now: NaiveDateTime) -> Result<EntryId>;

    /// Seal a new entry and persist it.
    ///
    /// # Errors
    ///
    /// Returns `CryptnoteError::Storage` if the blob cannot be written.
    fn save(&self, key: &EncryptionKey, title: &str, body: &[String]) -> Result<EntryId>;

    /// Open and decode one entry.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no entry has this id
    /// - `Authentication` if the blob does not open under `key`
    /// - `Storage` if the file cannot be read
    fn load(&self, id: &EntryId, key: &EncryptionKey) -> Result<Entry>;

    /// Replace an existing entry's contents.
    ///
    /// The previous blob is gone once this returns `Ok`.
    fn overwrite(&self, id: &EntryId, key: &EncryptionKey, title: &str, body: &[String])
        -> Result<()>;

    /// Raw sealed bytes of an entry.
    fn read_raw(&self, id: &EntryId) -> Result<Vec<u8>>;

    /// Replace an existing entry's sealed bytes.
    fn write_raw(&self, id: &EntryId, blob: &[u8]) -> Result<()>;

    /// Copy an externally supplied entry file into the store after checking
    /// that it opens under `key`.
    ///
    /// # Errors
    ///
    /// - `Validation` if the file does not carry the store's extension
    /// - `NotFound` if the file does not exist
    /// - `Authentication` if it does not open under `key`
    fn import(&self, source: &Path, key: &EncryptionKey) -> Result<EntryId>;
}
