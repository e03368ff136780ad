//! Error types for Sealbox core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.

use thiserror::Error;

/// Result type alias for Sealbox operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The passphrase passed the verifier but did not decrypt the private key
    #[error("Incorrect passphrase")]
    IncorrectPassphrase,

    /// The operation needs key material and the vault has not been unlocked
    #[error("Vault is locked")]
    Locked,

    /// No key material has been stored yet
    #[error("Vault is not initialized")]
    NotInitialized,

    /// Key material already exists; initialization would overwrite it
    #[error("Vault is already initialized")]
    AlreadyInitialized,

    /// Encryption or decryption error
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Blob store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// The persisted index exists but cannot be decrypted or parsed
    #[error("Account index is unreadable: {0}")]
    CorruptIndex(String),

    /// Every identifier candidate collided with an existing account
    #[error("No free account identifier after {0} attempts")]
    IdSpaceExhausted(usize),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl From<tokio::task::JoinError> for VaultError {
    fn from(err: tokio::task::JoinError) -> Self {
        VaultError::Crypto(format!("Background task failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(VaultError::Locked.to_string(), "Vault is locked");
        assert_eq!(
            VaultError::IdSpaceExhausted(64).to_string(),
            "No free account identifier after 64 attempts"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let converted: VaultError = err.into();
        assert!(matches!(converted, VaultError::Json { .. }));
    }
}
