//! Age-backed [`Cipher`].
//!
//! Layout of the stored text:
//! - private key: ASCII-armored age file, scrypt-encrypted with the passphrase,
//!   whose plaintext is an `AGE-SECRET-KEY-1…` identity
//! - public key: the bare `age1…` recipient string
//! - messages: ASCII-armored age files encrypted to the recipient

use std::io::{Read, Write};
use std::iter;
use std::str::FromStr;

use age::armor::{ArmoredReader, ArmoredWriter, Format};
use secrecy::{ExposeSecret, SecretString};
use age::x25519;
use zeroize::Zeroizing;

use super::{ArmoredKeyPair, Cipher};
use crate::error::{Result, VaultError};

/// Marker line that opens every armored age file.
pub const ARMOR_HEADER: &str = "-----BEGIN AGE ENCRYPTED FILE-----";

/// X25519 key pair with a passphrase-locked private half.
#[derive(Debug, Default, Clone, Copy)]
pub struct AgeCipher;

impl AgeCipher {
    pub fn new() -> Self {
        Self
    }
}

impl Cipher for AgeCipher {
    type PrivateKey = x25519::Identity;
    type PublicKey = x25519::Recipient;

    fn generate_keypair(&self, passphrase: &str) -> Result<ArmoredKeyPair> {
        let identity = x25519::Identity::generate();
        let public_key = identity.to_public().to_string();
        let secret = identity.to_string();

        let encryptor =
            age::Encryptor::with_user_passphrase(SecretString::from(passphrase.to_string()));
        let private_key = seal(encryptor, secret.expose_secret().as_bytes())?;

        Ok(ArmoredKeyPair {
            private_key,
            public_key,
        })
    }

    fn unlock_private_key(&self, armored: &str, passphrase: &str) -> Result<x25519::Identity> {
        let identity = age::scrypt::Identity::new(SecretString::from(passphrase.to_string()));
        let plaintext = open(armored, &identity, |e| match e {
            age::DecryptError::NoMatchingKeys
            | age::DecryptError::DecryptionFailed
            | age::DecryptError::KeyDecryptionFailed => VaultError::IncorrectPassphrase,
            _ => VaultError::Crypto(format!("Private key decryption failed: {}", e)),
        })?;

        let text = std::str::from_utf8(&plaintext)
            .map_err(|_| VaultError::Crypto("Private key is not valid UTF-8".to_string()))?;
        x25519::Identity::from_str(text.trim())
            .map_err(|e| VaultError::Crypto(format!("Invalid private key: {}", e)))
    }

    fn read_public_key(&self, armored: &str) -> Result<x25519::Recipient> {
        x25519::Recipient::from_str(armored.trim())
            .map_err(|e| VaultError::Crypto(format!("Invalid public key: {}", e)))
    }

    fn decrypt_message(&self, armored: &str, key: &x25519::Identity) -> Result<String> {
        let plaintext = open(armored, key, |e| {
            VaultError::Crypto(format!("Decryption failed: {}", e))
        })?;
        String::from_utf8(plaintext.to_vec())
            .map_err(|_| VaultError::Crypto("Decrypted message is not valid UTF-8".to_string()))
    }

    fn encrypt_message(&self, plaintext: &str, key: &x25519::Recipient) -> Result<String> {
        let encryptor = age::Encryptor::with_recipients(iter::once(key as &dyn age::Recipient))
            .map_err(|e| VaultError::Crypto(format!("Failed to create encryptor: {}", e)))?;
        seal(encryptor, plaintext.as_bytes())
    }
}

fn seal(encryptor: age::Encryptor, plaintext: &[u8]) -> Result<String> {
    let mut armored = Vec::new();
    let output = ArmoredWriter::wrap_output(&mut armored, Format::AsciiArmor)
        .map_err(|e| VaultError::Crypto(format!("Failed to create armor: {}", e)))?;
    let mut writer = encryptor
        .wrap_output(output)
        .map_err(|e| VaultError::Crypto(format!("Failed to create encryptor: {}", e)))?;

    writer
        .write_all(plaintext)
        .map_err(|e| VaultError::Crypto(format!("Encryption write failed: {}", e)))?;
    writer
        .finish()
        .and_then(|armor| armor.finish())
        .map_err(|e| VaultError::Crypto(format!("Encryption finish failed: {}", e)))?;

    String::from_utf8(armored)
        .map_err(|_| VaultError::Crypto("Armored output is not valid UTF-8".to_string()))
}

fn open<F>(armored: &str, identity: &dyn age::Identity, on_decrypt_error: F) -> Result<Zeroizing<Vec<u8>>>
where
    F: FnOnce(age::DecryptError) -> VaultError,
{
    let decryptor = age::Decryptor::new(ArmoredReader::new(armored.as_bytes()))
        .map_err(|e| VaultError::Crypto(format!("Failed to parse message: {}", e)))?;
    let mut reader = decryptor
        .decrypt(iter::once(identity))
        .map_err(on_decrypt_error)?;

    let mut plaintext = Zeroizing::new(Vec::new());
    reader
        .read_to_end(&mut plaintext)
        .map_err(|e| VaultError::Crypto(format!("Failed to read decrypted data: {}", e)))?;
    Ok(plaintext)
}
