//! Master password policy.
//!
//! Shared by first-time setup and password rotation.

use crate::error::{CryptnoteError, Result};

/// Default minimum password length in characters.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// Validate a new master password and its confirmation.
///
/// # Requirements
///
/// - Not empty or only whitespace
/// - At least `min_len` characters long
/// - Identical to `confirmation`
///
/// Returns `CryptnoteError::Validation` with an explanation otherwise.
pub fn validate_new_password(password: &str, confirmation: &str, min_len: usize) -> Result<()> {
    if password.trim().is_empty() {
        return Err(CryptnoteError::Validation(
            "Password cannot be empty".to_string(),
        ));
    }

    let length = password.chars().count();
    if length < min_len {
        return Err(CryptnoteError::Validation(format!(
            "Password too short (minimum {} characters, got {})",
            min_len, length
        )));
    }

    if password != confirmation {
        return Err(CryptnoteError::Validation(
            "Passwords do not match".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_new_password("correctpw1", "correctpw1", 8).is_ok());
        assert!(validate_new_password("with spaces ok", "with spaces ok", 8).is_ok());
    }

    #[test]
    fn test_password_too_short() {
        let err = validate_new_password("short", "short", 8).unwrap_err();
        assert!(matches!(err, CryptnoteError::Validation(_)));
        assert!(err.to_string().contains("minimum 8 characters"));
    }

    #[test]
    fn test_password_exactly_min_length() {
        assert!(validate_new_password("12345678", "12345678", 8).is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 8 characters, 16 bytes
        let pw = "éééééééé";
        assert!(validate_new_password(pw, pw, 8).is_ok());
        assert!(validate_new_password("ééé", "ééé", 4).is_err());
    }

    #[test]
    fn test_password_empty() {
        assert!(validate_new_password("", "", 0).is_err());
        assert!(validate_new_password("         ", "         ", 8).is_err());
    }

    #[test]
    fn test_confirmation_mismatch() {
        let err = validate_new_password("correctpw1", "correctpw2", 8).unwrap_err();
        assert!(err.to_string().contains("do not match"));
    }
}
