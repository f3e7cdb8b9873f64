//! # Cryptnote Core
//!
//! Core library for cryptnote - a single-user vault of individually encrypted
//! notes, unlocked by one master password.
//!
//! This crate holds the credential and encryption lifecycle and the text
//! editing state machine, independent of any terminal front end.
//!
//! ## Architecture
//!
//! - **crypto**: key derivation, authenticated encryption, password policy
//! - **credential**: salt + verifier persistence and password checks
//! - **storage**: `NoteStore` trait and the file-backed repository
//! - **rotation**: password change with bulk re-encryption
//! - **editor**: `TextBuffer` and the editing event loop
//! - **vault**: setup/unlock and the flows of an unlocked session

pub mod config;
pub mod credential;
pub mod crypto;
pub mod editor;
pub mod error;
pub mod fs;
pub mod rotation;
pub mod storage;
pub mod vault;

pub use config::VaultConfig;
pub use credential::{Credential, CredentialStore};
pub use crypto::{EncryptionKey, KdfParams};
pub use editor::{EditOutcome, EditorEvent, TextBuffer};
pub use error::{CryptnoteError, Result};
pub use rotation::{rotate_password, RotationReport, RotationRequest};
pub use storage::{Entry, EntryId, FileNoteRepository, NoteStore};
pub use vault::{EditMode, Session, Vault};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
