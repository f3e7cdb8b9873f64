//! Storage abstraction for cryptnote.
//!
//! This module defines the `NoteStore` trait and the types passed across it.
//!
//! ## Security
//!
//! Stores are responsible for:
//! - Writing entries only as sealed blobs (no plaintext modes)
//! - Never replacing an existing entry on save
//! - Atomic replacement on overwrite
//!
//! Key material is owned by the caller and passed per operation.

pub mod file_repository;
pub mod payload;
pub mod traits;
pub mod types;

// Re-export public types
pub use file_repository::FileNoteRepository;
pub use traits::NoteStore;
pub use types::{Entry, EntryId};
