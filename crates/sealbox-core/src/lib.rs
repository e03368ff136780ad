//! # Sealbox Core
//!
//! Core library for Sealbox - an encrypted account vault unlocked by a single passphrase.
//!
//! A passphrase unlocks an age X25519 private key; the private key decrypts a JSON
//! index of account records stored as one armored blob. The index is decrypted
//! lazily on first access and re-encrypted to the public key after every change.
//!
//! ## Architecture
//!
//! - **vault**: controller sequencing unlock, cached reads, inserts, write-back
//! - **crypto**: cipher and passphrase-check seams, with age and Argon2id implementations
//! - **store**: blob persistence (directory and in-memory)
//! - **index** / **id**: the decrypted index and its random identifiers
//!
//! ## Example
//!
//! ```no_run
//! use sealbox_core::{DirVault, VaultConfig};
//!
//! # async fn run() -> sealbox_core::Result<()> {
//! let vault = DirVault::open_dir("/tmp/my-vault", VaultConfig::default());
//! vault.initialize("correct horse battery staple").await?;
//! assert!(vault.unlock("correct horse battery staple").await?);
//! let id = vault.add_account(serde_json::json!({ "name": "github" })).await?;
//! println!("stored as {}", id);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod id;
pub mod index;
pub mod store;
pub mod vault;

pub use config::VaultConfig;
pub use error::{Result, VaultError};
pub use id::AccountId;
pub use index::{IndexStatus, VaultIndex};
pub use store::{BlobSlot, BlobStore, DirStore, MemoryStore};
pub use vault::{DirVault, Vault, VaultEvent};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
