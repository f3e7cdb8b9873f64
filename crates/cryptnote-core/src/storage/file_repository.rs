//! File-backed note store.
//!
//! One sealed blob per file in a single directory:
//!
//! ```text
//! notes/
//!   20261017_142501_384.cnote
//!   20261017_142501_912.cnote
//!   imported_20261017_150000_from-laptop.cnote
//! ```
//!
//! The repository never sees plaintext on disk and holds no key material;
//! callers pass the session key into each operation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use rand::Rng;

use super::payload;
use super::traits::NoteStore;
use super::types::{Entry, EntryId};
use crate::config::VaultConfig;
use crate::crypto::{codec, EncryptionKey};
use crate::error::{CryptnoteError, Result};
use crate::fs::{write_atomic, write_new};

const ID_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const DISAMBIGUATOR_MIN: u32 = 100;
const DISAMBIGUATOR_MAX: u32 = 999;
const RANDOM_ATTEMPTS: usize = 32;
const SAVE_ATTEMPTS: usize = 8;
const IMPORT_COLLISION_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct FileNoteRepository {
    dir: PathBuf,
    extension: String,
}

impl FileNoteRepository {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &VaultConfig) -> Self {
        Self::new(config.notes_path(), config.entry_extension.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Create the notes directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            CryptnoteError::Storage(format!(
                "Failed to create notes directory {}: {}",
                self.dir.display(),
                e
            ))
        })
    }

    pub fn path_for(&self, id: &EntryId) -> PathBuf {
        self.dir.join(format!("{}{}", id, self.extension))
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.path_for(id).is_file()
    }

    /// Generate an unused id for an entry created at `now`.
    ///
    /// The disambiguator is drawn from `100..=999`; on collision it is
    /// re-rolled a bounded number of times, then the first free value counting
    /// up from 100 is taken (values past 999 widen the suffix).
    ///
    /// Ids order chronologically across seconds only. Within one second the
    /// suffix is random, and a widened suffix such as `_1000` sorts below
    /// `_999`.
    pub fn generate_id_with<R: Rng + ?Sized>(&self, now: NaiveDateTime, rng: &mut R) -> EntryId {
        let timestamp = now.format(ID_TIMESTAMP_FORMAT).to_string();
        let candidate = |n: u32| EntryId::from_trusted(format!("{}_{}", timestamp, n));

        for _ in 0..RANDOM_ATTEMPTS {
            let id = candidate(rng.gen_range(DISAMBIGUATOR_MIN..=DISAMBIGUATOR_MAX));
            if !self.contains(&id) {
                return id;
            }
        }

        let mut n = DISAMBIGUATOR_MIN;
        loop {
            let id = candidate(n);
            if !self.contains(&id) {
                return id;
            }
            n += 1;
        }
    }

    /// Import `source`, naming the copy with the timestamp `now`.
    pub fn import_at(
        &self,
        source: &Path,
        key: &EncryptionKey,
        now: NaiveDateTime,
    ) -> Result<EntryId> {
        let file_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                CryptnoteError::Validation(format!("Invalid import path: {}", source.display()))
            })?;
        let stem = strip_extension_ignore_case(file_name, &self.extension).ok_or_else(|| {
            CryptnoteError::Validation(format!(
                "File must have the {} extension: {}",
                self.extension,
                source.display()
            ))
        })?;
        if !source.is_file() {
            return Err(CryptnoteError::NotFound(format!(
                "No file at {}",
                source.display()
            )));
        }

        let blob = fs::read(source)?;
        if let Err(err) = codec::open(&blob, key) {
            tracing::warn!(path = %source.display(), "import rejected: blob does not open under the session key");
            return Err(err);
        }

        self.ensure_dir()?;
        let timestamp = now.format(ID_TIMESTAMP_FORMAT).to_string();
        let mut stem_candidate = format!("imported_{}_{}", timestamp, stem);
        let mut counter = 1;
        loop {
            let id = EntryId::parse(&stem_candidate)?;
            if write_new(&self.path_for(&id), &blob)? {
                tracing::info!(id = %id, "entry imported");
                return Ok(id);
            }
            if counter > IMPORT_COLLISION_LIMIT {
                return Err(CryptnoteError::Storage(format!(
                    "Failed to find a unique name for import of {}",
                    source.display()
                )));
            }
            stem_candidate = format!("imported_{}_{}_{}", timestamp, counter, stem);
            counter += 1;
        }
    }

    fn read_existing(&self, id: &EntryId) -> Result<Vec<u8>> {
        let path = self.path_for(id);
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CryptnoteError::NotFound(format!("Entry {} not found", id)),
            _ => CryptnoteError::Storage(format!("Failed to read {}: {}", path.display(), e)),
        })
    }

    fn require_existing(&self, id: &EntryId) -> Result<PathBuf> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(CryptnoteError::NotFound(format!("Entry {} not found", id)));
        }
        Ok(path)
    }
}

impl NoteStore for FileNoteRepository {
    fn list(&self) -> Result<Vec<EntryId>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CryptnoteError::Storage(format!(
                    "Failed to list {}: {}",
                    self.dir.display(),
                    e
                )))
            }
        };

        let mut ids = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }
            let name = dir_entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(stem) = name.strip_suffix(self.extension.as_str()) else {
                continue;
            };
            if let Ok(id) = EntryId::parse(stem) {
                ids.push(id);
            }
        }
        ids.sort_unstable_by(|a, b| b.cmp(a));
        Ok(ids)
    }

    fn generate_id(&self, now: NaiveDateTime) -> Result<EntryId> {
        Ok(self.generate_id_with(now, &mut rand::thread_rng()))
    }

    fn save(&self, key: &EncryptionKey, title: &str, body: &[String]) -> Result<EntryId> {
        self.ensure_dir()?;
        let blob = codec::seal(payload::encode(title, body).as_bytes(), key)?;

        // generate_id checks existence; create_new closes the remaining race.
        for _ in 0..SAVE_ATTEMPTS {
            let id = self.generate_id(Local::now().naive_local())?;
            if write_new(&self.path_for(&id), &blob)? {
                tracing::debug!(id = %id, "entry saved");
                return Ok(id);
            }
        }
        Err(CryptnoteError::Storage(
            "Failed to allocate a unique entry id".to_string(),
        ))
    }

    fn load(&self, id: &EntryId, key: &EncryptionKey) -> Result<Entry> {
        let blob = self.read_existing(id)?;
        let plaintext = codec::open(&blob, key)?;
        let (title, body) = payload::decode(&plaintext, id);
        Ok(Entry {
            id: id.clone(),
            title,
            body,
        })
    }

    fn overwrite(
        &self,
        id: &EntryId,
        key: &EncryptionKey,
        title: &str,
        body: &[String],
    ) -> Result<()> {
        let path = self.require_existing(id)?;
        let blob = codec::seal(payload::encode(title, body).as_bytes(), key)?;
        write_atomic(&path, &blob, false)?;
        tracing::debug!(id = %id, "entry overwritten");
        Ok(())
    }

    fn read_raw(&self, id: &EntryId) -> Result<Vec<u8>> {
        self.read_existing(id)
    }

    fn write_raw(&self, id: &EntryId, blob: &[u8]) -> Result<()> {
        let path = self.require_existing(id)?;
        write_atomic(&path, blob, false)
    }

    fn import(&self, source: &Path, key: &EncryptionKey) -> Result<EntryId> {
        self.import_at(source, key, Local::now().naive_local())
    }
}

fn strip_extension_ignore_case<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    let split = file_name.len().checked_sub(extension.len())?;
    if !file_name.is_char_boundary(split) {
        return None;
    }
    let (stem, ext) = file_name.split_at(split);
    ext.eq_ignore_ascii_case(extension).then_some(stem)
}
