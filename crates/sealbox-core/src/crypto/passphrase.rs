//! Passphrase validation.
//!
//! Enforces minimum security requirements for new vault passphrases.

use crate::error::{Result, VaultError};

/// Minimum passphrase length in characters.
const MIN_PASSPHRASE_LENGTH: usize = 8;

/// Validate passphrase meets minimum security requirements.
///
/// Only applied when a vault is created; unlock accepts whatever the
/// verifier accepts.
///
/// # Examples
///
/// ```
/// use sealbox_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase("my-secure-passphrase-123").is_ok());
/// assert!(validate_passphrase("short").is_err());
/// ```
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.trim().is_empty() {
        return Err(VaultError::InvalidInput(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    let length = passphrase.chars().count();
    if length < MIN_PASSPHRASE_LENGTH {
        return Err(VaultError::InvalidInput(format!(
            "Passphrase must be at least {} characters (got {})",
            MIN_PASSPHRASE_LENGTH, length
        )));
    }

    Ok(())
}
