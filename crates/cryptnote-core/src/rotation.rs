//! Master password rotation.
//!
//! Rotation swaps the credential atomically, then re-seals every entry under
//! the new key one at a time. The entry pass is best-effort: an entry that
//! does not open under the old key, or cannot be written back, is counted in
//! the report and left byte-for-byte as it was. Such entries stay sealed under
//! the old key while the credential only accepts the new password.

use secrecy::{ExposeSecret, SecretString};

use crate::credential::CredentialStore;
use crate::crypto::{codec, validate_new_password, EncryptionKey};
use crate::error::{CryptnoteError, Result};
use crate::storage::{EntryId, NoteStore};

/// Passwords supplied for one rotation.
pub struct RotationRequest {
    pub old_password: SecretString,
    pub new_password: SecretString,
    pub confirmation: SecretString,
    pub min_password_len: usize,
}

impl RotationRequest {
    pub fn new(
        old_password: impl Into<String>,
        new_password: impl Into<String>,
        confirmation: impl Into<String>,
        min_password_len: usize,
    ) -> Self {
        Self {
            old_password: SecretString::from(old_password.into()),
            new_password: SecretString::from(new_password.into()),
            confirmation: SecretString::from(confirmation.into()),
            min_password_len,
        }
    }
}

/// Outcome of the per-entry re-encryption pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Entries still sealed under the old key.
    pub failed_ids: Vec<EntryId>,
}

impl RotationReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Replace the master password and re-seal every entry.
///
/// `current_key` is the key of the live session. On success the returned key
/// supersedes it.
///
/// # Errors
///
/// - `Authentication` if the old password does not verify, or verifies to a
///   key other than `current_key`
/// - `Validation` if the new password fails the policy or its confirmation
/// - `Storage` / `NotFound` if the credential cannot be read or replaced, or
///   the entries cannot be listed
///
/// Per-entry failures are not errors; they are counted in the report.
pub fn rotate_password<S: NoteStore + ?Sized>(
    credentials: &CredentialStore,
    store: &S,
    current_key: &EncryptionKey,
    request: &RotationRequest,
) -> Result<(RotationReport, EncryptionKey)> {
    let credential = credentials.load()?;
    let (matched, old_key) = credentials.verify(request.old_password.expose_secret(), &credential)?;
    if !matched {
        return Err(CryptnoteError::Authentication(
            "Current password is incorrect".to_string(),
        ));
    }
    if old_key != *current_key {
        return Err(CryptnoteError::Authentication(
            "Password does not match the unlocked session key".to_string(),
        ));
    }

    rotate_verified(credentials, store, &old_key, request)
}

/// The rotation proper, for callers that already verified the old password
/// and hold the key it derives to.
pub(crate) fn rotate_verified<S: NoteStore + ?Sized>(
    credentials: &CredentialStore,
    store: &S,
    old_key: &EncryptionKey,
    request: &RotationRequest,
) -> Result<(RotationReport, EncryptionKey)> {
    validate_new_password(
        request.new_password.expose_secret(),
        request.confirmation.expose_secret(),
        request.min_password_len,
    )?;

    let ids = store.list()?;
    let (_, new_key) = credentials.initialize(request.new_password.expose_secret())?;

    let mut report = RotationReport::default();
    for id in ids {
        match reseal(store, &id, old_key, &new_key) {
            Ok(()) => report.succeeded += 1,
            Err(err) => {
                tracing::warn!(id = %id, error = %err, "entry left under the old key");
                report.failed += 1;
                report.failed_ids.push(id);
            }
        }
    }

    if report.is_complete() {
        tracing::info!(entries = report.succeeded, "password rotated");
    } else {
        tracing::warn!(
            succeeded = report.succeeded,
            failed = report.failed,
            "password rotated with unreadable entries"
        );
    }

    Ok((report, new_key))
}

fn reseal<S: NoteStore + ?Sized>(
    store: &S,
    id: &EntryId,
    old_key: &EncryptionKey,
    new_key: &EncryptionKey,
) -> Result<()> {
    let blob = store.read_raw(id)?;
    let plaintext = codec::open(&blob, old_key)?;
    let resealed = codec::seal(&plaintext, new_key)?;
    store.write_raw(id, &resealed)
}
