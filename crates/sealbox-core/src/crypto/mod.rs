//! Cryptographic collaborators for the vault.
//!
//! The vault never touches ciphers directly. It goes through two seams:
//! - [`Cipher`]: key parsing, private-key unlock, message encrypt/decrypt
//! - [`PasswordCheck`]: the passphrase oracle consulted before any key work
//!
//! ## Shipped implementations
//!
//! - **Age** ([`AgeCipher`]): X25519 key pair, private key stored as an
//!   ASCII-armored, scrypt passphrase-encrypted age file (https://age-encryption.org/)
//! - **Argon2id** ([`StoredVerifier`]): PHC verifier string kept in the blob store
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the stored blobs
//! - Offline brute-force attacks on the passphrase
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked process / memory

pub mod age_cipher;
pub mod passphrase;
pub mod verifier;

pub use age_cipher::AgeCipher;
pub use passphrase::validate_passphrase;
pub use verifier::{hash_passphrase, PasswordCheck, StoredVerifier};

use crate::error::Result;

/// Armored key material produced when a vault is created.
pub struct ArmoredKeyPair {
    /// Passphrase-protected private key text.
    pub private_key: String,
    /// Public key text.
    pub public_key: String,
}

impl std::fmt::Debug for ArmoredKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmoredKeyPair")
            .field("private_key", &"[REDACTED]")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// Key and message operations over armored text.
///
/// `unlock_private_key` and `generate_keypair` run a passphrase KDF and may
/// take a noticeable amount of CPU time; the vault calls them off the async
/// executor.
pub trait Cipher: Send + Sync + 'static {
    /// Decrypted private key, usable for message decryption.
    type PrivateKey: Send + Sync + 'static;
    /// Public key, usable for message encryption.
    type PublicKey: Send + Sync + 'static;

    /// Create a fresh key pair whose private half is locked by `passphrase`.
    fn generate_keypair(&self, passphrase: &str) -> Result<ArmoredKeyPair>;

    /// Parse armored private key text and decrypt it with `passphrase`.
    ///
    /// Returns `VaultError::IncorrectPassphrase` when the passphrase does not fit.
    fn unlock_private_key(&self, armored: &str, passphrase: &str) -> Result<Self::PrivateKey>;

    /// Parse armored public key text.
    fn read_public_key(&self, armored: &str) -> Result<Self::PublicKey>;

    /// Parse an armored message and decrypt it to UTF-8 plaintext.
    fn decrypt_message(&self, armored: &str, key: &Self::PrivateKey) -> Result<String>;

    /// Encrypt plaintext to an armored message.
    fn encrypt_message(&self, plaintext: &str, key: &Self::PublicKey) -> Result<String>;
}

/// Unlocked key material held while the vault is open.
pub struct KeyPair<C: Cipher> {
    pub(crate) private_key: C::PrivateKey,
    pub(crate) public_key: C::PublicKey,
}

impl<C: Cipher> std::fmt::Debug for KeyPair<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"[REDACTED]")
            .field("public_key", &"[..]")
            .finish()
    }
}
