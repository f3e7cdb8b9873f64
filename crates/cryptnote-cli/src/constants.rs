//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// - 0: Success
/// - 1: General error (storage, configuration)
/// - 2: Misuse of shell command (reserved by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Vault, credential or entry not found.
    pub const NOT_FOUND: i32 = 3;

    /// Input rejected (empty body, weak password, bad id).
    pub const INVALID_INPUT: i32 = 4;

    /// Wrong password, too many attempts, or a file sealed under another key.
    pub const AUTH_FAILED: i32 = 5;

    /// Editing cancelled by the user.
    pub const CANCELLED: i32 = 130;
}

/// Environment variables read by the CLI.
pub mod env {
    pub const PASSWORD: &str = "CRYPTNOTE_PASSWORD";
    pub const NEW_PASSWORD: &str = "CRYPTNOTE_NEW_PASSWORD";
    pub const CONFIG: &str = "CRYPTNOTE_CONFIG";
    pub const LOG: &str = "CRYPTNOTE_LOG";
}

/// Password prompts allowed per unlock on a terminal.
pub const MAX_PASSWORD_ATTEMPTS: u32 = 3;

/// Log filter used when `CRYPTNOTE_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";
