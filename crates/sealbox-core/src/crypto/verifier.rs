//! Passphrase oracle.
//!
//! The vault asks a [`PasswordCheck`] whether a passphrase is right before it
//! touches any key material. [`StoredVerifier`] answers from an Argon2id PHC
//! string kept next to the keys in the blob store.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use rand::Rng;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};
use crate::store::{BlobSlot, BlobStore};

/// Salt length for verifier hashes, in bytes.
const SALT_LENGTH: usize = 16;

/// Decides whether a passphrase is the vault passphrase.
#[async_trait]
pub trait PasswordCheck: Send + Sync {
    /// Returns `Ok(false)` for a wrong passphrase; errors are reserved for
    /// failures of the check itself.
    async fn test_password(&self, passphrase: &str) -> Result<bool>;

    /// Record `passphrase` as the one future checks accept.
    async fn enroll(&self, passphrase: &str) -> Result<()>;
}

/// Argon2id verifier persisted in the [`BlobSlot::Verifier`] slot.
#[derive(Debug, Clone)]
pub struct StoredVerifier<S> {
    store: S,
}

impl<S: BlobStore> StoredVerifier<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: BlobStore> PasswordCheck for StoredVerifier<S> {
    async fn test_password(&self, passphrase: &str) -> Result<bool> {
        let phc = self
            .store
            .read(BlobSlot::Verifier)
            .await?
            .ok_or(VaultError::NotInitialized)?;
        let passphrase = Zeroizing::new(passphrase.to_string());
        let valid = tokio::task::spawn_blocking(move || verify_passphrase(&passphrase, &phc))
            .await??;
        debug!(valid, "Passphrase check complete");
        Ok(valid)
    }

    async fn enroll(&self, passphrase: &str) -> Result<()> {
        let passphrase = Zeroizing::new(passphrase.to_string());
        let phc = tokio::task::spawn_blocking(move || hash_passphrase(&passphrase)).await??;
        self.store.write(BlobSlot::Verifier, &phc).await
    }
}

/// Hash `passphrase` into an Argon2id PHC string with a random salt.
pub fn hash_passphrase(passphrase: &str) -> Result<String> {
    let mut salt_bytes = [0u8; SALT_LENGTH];
    rand::rng().fill(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| VaultError::Crypto(format!("Failed to encode salt: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| VaultError::Crypto(format!("Passphrase hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Check `passphrase` against a PHC string produced by [`hash_passphrase`].
pub fn verify_passphrase(passphrase: &str, phc: &str) -> Result<bool> {
    let parsed = PasswordHash::new(phc.trim())
        .map_err(|e| VaultError::Crypto(format!("Invalid passphrase verifier: {}", e)))?;
    match Argon2::default().verify_password(passphrase.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(VaultError::Crypto(format!(
            "Passphrase verification failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_hash_verifies_only_hashed_passphrase() {
        let phc = hash_passphrase("correct-passphrase-123").unwrap();
        assert!(phc.starts_with("$argon2id$"));
        assert!(verify_passphrase("correct-passphrase-123", &phc).unwrap());
        assert!(!verify_passphrase("wrong-passphrase-456", &phc).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let first = hash_passphrase("same-passphrase").unwrap();
        let second = hash_passphrase("same-passphrase").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_verifier_is_error() {
        let result = verify_passphrase("anything", "not-a-phc-string");
        assert!(matches!(result, Err(VaultError::Crypto(_))));
    }

    #[tokio::test]
    async fn test_stored_verifier_enroll_then_check() {
        let verifier = StoredVerifier::new(MemoryStore::new());

        assert!(matches!(
            verifier.test_password("anything").await,
            Err(VaultError::NotInitialized)
        ));

        verifier.enroll("correct-passphrase-123").await.unwrap();
        assert!(verifier.test_password("correct-passphrase-123").await.unwrap());
        assert!(!verifier.test_password("wrong-passphrase-456").await.unwrap());
    }
}
