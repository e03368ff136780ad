//! In-memory [`BlobStore`].
//!
//! Keeps blobs in a map and counts every read and write per slot, so tests
//! can assert how often the vault touched storage. Writes can be made to
//! fail on demand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{BlobSlot, BlobStore};
use crate::error::{Result, VaultError};

#[derive(Default)]
struct Inner {
    blobs: HashMap<BlobSlot, String>,
    reads: HashMap<BlobSlot, usize>,
    writes: HashMap<BlobSlot, usize>,
}

/// Map-backed blob store with access counters.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| VaultError::Storage("Memory store poisoned".to_string()))
    }

    /// Current contents of a slot, without counting a read.
    pub fn peek(&self, slot: BlobSlot) -> Option<String> {
        self.lock().ok()?.blobs.get(&slot).cloned()
    }

    /// Set a slot directly, without counting a write.
    pub fn seed(&self, slot: BlobSlot, contents: impl Into<String>) {
        if let Ok(mut inner) = self.lock() {
            inner.blobs.insert(slot, contents.into());
        }
    }

    pub fn reads(&self, slot: BlobSlot) -> usize {
        self.lock()
            .map(|inner| inner.reads.get(&slot).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn writes(&self, slot: BlobSlot) -> usize {
        self.lock()
            .map(|inner| inner.writes.get(&slot).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Make subsequent writes fail with a storage error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn read(&self, slot: BlobSlot) -> Result<Option<String>> {
        let mut inner = self.lock()?;
        *inner.reads.entry(slot).or_insert(0) += 1;
        Ok(inner.blobs.get(&slot).cloned())
    }

    async fn write(&self, slot: BlobSlot, contents: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(VaultError::Storage(format!("Write to {} rejected", slot)));
        }
        let mut inner = self.lock()?;
        *inner.writes.entry(slot).or_insert(0) += 1;
        inner.blobs.insert(slot, contents.to_string());
        Ok(())
    }
}
