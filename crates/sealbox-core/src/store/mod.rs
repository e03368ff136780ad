//! Blob storage for armored key material and the encrypted index.
//!
//! The vault persists four opaque text blobs. A [`BlobStore`] only moves
//! text in and out; it never sees plaintext records.

mod dir;
mod memory;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use dir::DirStore;
pub use memory::MemoryStore;

/// Named blob locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlobSlot {
    /// Passphrase-encrypted private key.
    PrivateKey,
    /// Public key.
    PublicKey,
    /// Encrypted, serialized account index.
    AccountIndex,
    /// Passphrase verifier for the password check.
    Verifier,
}

impl BlobSlot {
    pub const ALL: [BlobSlot; 4] = [
        BlobSlot::PrivateKey,
        BlobSlot::PublicKey,
        BlobSlot::AccountIndex,
        BlobSlot::Verifier,
    ];

    /// File name used by directory-backed stores.
    pub fn file_name(self) -> &'static str {
        match self {
            BlobSlot::PrivateKey => "private.key.age",
            BlobSlot::PublicKey => "public.key",
            BlobSlot::AccountIndex => "accounts.age",
            BlobSlot::Verifier => "passphrase.phc",
        }
    }
}

impl fmt::Display for BlobSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlobSlot::PrivateKey => "private key",
            BlobSlot::PublicKey => "public key",
            BlobSlot::AccountIndex => "account index",
            BlobSlot::Verifier => "passphrase verifier",
        };
        f.write_str(name)
    }
}

/// Text blob persistence.
///
/// Implementations must ensure:
/// - `write` replaces the whole blob (no partial or appended state is observable)
/// - `read` of a never-written slot is `Ok(None)`, not an error
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read a blob.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(text))` if the blob exists
    /// - `Ok(None)` if it was never written
    async fn read(&self, slot: BlobSlot) -> Result<Option<String>>;

    /// Replace a blob with `contents`.
    async fn write(&self, slot: BlobSlot, contents: &str) -> Result<()>;
}

#[async_trait]
impl<T: BlobStore + ?Sized> BlobStore for Arc<T> {
    async fn read(&self, slot: BlobSlot) -> Result<Option<String>> {
        (**self).read(slot).await
    }

    async fn write(&self, slot: BlobSlot, contents: &str) -> Result<()> {
        (**self).write(slot, contents).await
    }
}
