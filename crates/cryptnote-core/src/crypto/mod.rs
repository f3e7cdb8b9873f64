//! Cryptographic operations for cryptnote.
//!
//! - **Argon2id** turns the master password into a session key
//! - **AES-256-GCM** seals each entry as one authenticated blob
//! - **SHA-256** of the derived key is the stored password verifier
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the vault directory (entries and credential file)
//! - Offline brute-force attacks on the master password
//! - Tampering with individual entry files
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session or its memory

pub mod codec;
pub mod kdf;
pub mod password;

pub use codec::{open, seal};
pub use kdf::{derive_key, EncryptionKey, KdfParams, KEY_LENGTH, SALT_LENGTH};
pub use password::{validate_new_password, DEFAULT_MIN_PASSWORD_LENGTH};
