//! Account identifiers.
//!
//! Identifiers are short random strings. They are not unique on their own;
//! [`allocate_id`] rejects candidates already present in the index.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};
use crate::index::VaultIndex;

/// Symbols an identifier may contain.
pub const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Number of symbols in an identifier.
pub const ID_LENGTH: usize = 8;

/// Key addressing a single record in the vault index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(value: &str) -> Result<()> {
        if value.len() != ID_LENGTH {
            return Err(VaultError::InvalidInput(format!(
                "Account ID must be {} characters (got {})",
                ID_LENGTH,
                value.len()
            )));
        }
        if let Some(bad) = value.bytes().find(|b| !ID_ALPHABET.contains(b)) {
            return Err(VaultError::InvalidInput(format!(
                "Account ID contains invalid character {:?}",
                bad as char
            )));
        }
        Ok(())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for AccountId {
    type Error = VaultError;

    fn try_from(value: String) -> Result<Self> {
        Self::validate(&value)?;
        Ok(Self(value))
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

/// Draw a random identifier, each symbol uniform over the whole alphabet.
pub fn generate_id<R: Rng>(rng: &mut R) -> AccountId {
    let id = (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect();
    AccountId(id)
}

/// Generate identifiers until one is not already a key of `index`.
///
/// # Errors
///
/// Returns `VaultError::IdSpaceExhausted` after `max_attempts` collisions.
pub fn allocate_id<R: Rng>(
    index: &VaultIndex,
    max_attempts: usize,
    rng: &mut R,
) -> Result<AccountId> {
    for _ in 0..max_attempts {
        let candidate = generate_id(rng);
        if !index.contains(&candidate) {
            return Ok(candidate);
        }
        tracing::debug!("Account ID collision, retrying");
    }
    Err(VaultError::IdSpaceExhausted(max_attempts))
}
