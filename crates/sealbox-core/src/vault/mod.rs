//! Vault controller.
//!
//! [`Vault`] owns the unlocked key pair and the decrypted index cache, and
//! sequences every operation that touches them:
//!
//! - **unlock**: passphrase check, then private and public key loads in parallel
//! - **account_index**: decrypt the stored index once, then serve from memory
//! - **add_account**: allocate an identifier, insert, re-encrypt, persist
//!
//! Index reads and mutations share one async mutex, so a read-modify-write
//! cycle (including the write-back) never interleaves with another.

mod events;

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::config::VaultConfig;
use crate::crypto::{validate_passphrase, AgeCipher, Cipher, KeyPair, PasswordCheck, StoredVerifier};
use crate::error::{Result, VaultError};
use crate::id::{allocate_id, AccountId};
use crate::index::{IndexStatus, VaultIndex};
use crate::store::{BlobSlot, BlobStore, DirStore};

pub use events::VaultEvent;

/// Directory-backed vault using age keys and a stored Argon2id verifier.
pub type DirVault = Vault<Arc<DirStore>, AgeCipher, StoredVerifier<Arc<DirStore>>>;

#[derive(Default)]
struct IndexCache {
    index: Option<Arc<VaultIndex>>,
    status: Option<IndexStatus>,
}

/// Encrypted account vault.
pub struct Vault<S, C: Cipher, P> {
    store: S,
    cipher: Arc<C>,
    password_check: P,
    config: VaultConfig,
    keys: RwLock<Option<Arc<KeyPair<C>>>>,
    index: Mutex<IndexCache>,
    events: broadcast::Sender<VaultEvent>,
}

impl DirVault {
    /// Vault stored as files under `root`.
    pub fn open_dir(root: impl Into<PathBuf>, config: VaultConfig) -> Self {
        let store = Arc::new(DirStore::new(root));
        Vault::new(
            Arc::clone(&store),
            AgeCipher::new(),
            StoredVerifier::new(store),
            config,
        )
    }
}

impl<S, C, P> Vault<S, C, P>
where
    S: BlobStore,
    C: Cipher,
    P: PasswordCheck,
{
    pub fn new(store: S, cipher: C, password_check: P, config: VaultConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        Self {
            store,
            cipher: Arc::new(cipher),
            password_check,
            config,
            keys: RwLock::new(None),
            index: Mutex::new(IndexCache::default()),
            events,
        }
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Receive lifecycle events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<VaultEvent> {
        self.events.subscribe()
    }

    /// Whether key material has been stored.
    pub async fn is_initialized(&self) -> Result<bool> {
        Ok(self.store.read(BlobSlot::PrivateKey).await?.is_some())
    }

    pub async fn is_unlocked(&self) -> bool {
        self.keys.read().await.is_some()
    }

    /// Create key material for a new vault locked by `passphrase`.
    ///
    /// The private key is written last, so an interrupted initialization does
    /// not leave a vault that reports itself as initialized. No index blob is
    /// written; the first read starts empty.
    ///
    /// # Errors
    ///
    /// - `VaultError::InvalidInput` if the passphrase is too weak
    /// - `VaultError::AlreadyInitialized` if a private key is already stored
    pub async fn initialize(&self, passphrase: &str) -> Result<()> {
        validate_passphrase(passphrase)?;
        if self.is_initialized().await? {
            return Err(VaultError::AlreadyInitialized);
        }

        let cipher = Arc::clone(&self.cipher);
        let secret = Zeroizing::new(passphrase.to_string());
        let pair = tokio::task::spawn_blocking(move || cipher.generate_keypair(&secret)).await??;

        self.store.write(BlobSlot::PublicKey, &pair.public_key).await?;
        self.password_check.enroll(passphrase).await?;
        self.store
            .write(BlobSlot::PrivateKey, &pair.private_key)
            .await?;

        info!("Vault initialized");
        Ok(())
    }

    /// Unlock the key pair with `passphrase`.
    ///
    /// Returns `Ok(false)` when the passphrase check rejects the passphrase;
    /// nothing else happens in that case. Otherwise both keys are loaded
    /// concurrently and committed together, so a failure on either side
    /// leaves the previous key state untouched. [`VaultEvent::Unlocked`] is
    /// broadcast after the keys are in place.
    ///
    /// # Errors
    ///
    /// - `VaultError::IncorrectPassphrase` if the check passed but the private key did not decrypt
    /// - `VaultError::NotInitialized` if a key blob is missing
    pub async fn unlock(&self, passphrase: &str) -> Result<bool> {
        if !self.password_check.test_password(passphrase).await? {
            info!("Unlock rejected by passphrase check");
            return Ok(false);
        }

        let private_branch = async {
            let armored = self.read_required(BlobSlot::PrivateKey).await?;
            let cipher = Arc::clone(&self.cipher);
            let secret = Zeroizing::new(passphrase.to_string());
            let key =
                tokio::task::spawn_blocking(move || cipher.unlock_private_key(&armored, &secret))
                    .await??;
            debug!("Private key unlocked");
            Ok::<_, VaultError>(key)
        };
        let public_branch = async {
            let armored = self.read_required(BlobSlot::PublicKey).await?;
            let key = self.cipher.read_public_key(&armored)?;
            debug!("Public key loaded");
            Ok::<_, VaultError>(key)
        };

        let (private_key, public_key) = tokio::try_join!(private_branch, public_branch)?;
        *self.keys.write().await = Some(Arc::new(KeyPair {
            private_key,
            public_key,
        }));

        info!("Vault unlocked");
        let _ = self.events.send(VaultEvent::Unlocked);
        Ok(true)
    }

    /// Drop the key pair and the decrypted index.
    pub async fn lock(&self) {
        let was_unlocked = self.keys.write().await.take().is_some();
        *self.index.lock().await = IndexCache::default();
        if was_unlocked {
            info!("Vault locked");
            let _ = self.events.send(VaultEvent::Locked);
        }
    }

    /// The decrypted account index.
    ///
    /// The stored blob is fetched and decrypted at most once per unlock; later
    /// calls return the same cached `Arc`. A missing blob yields an empty
    /// index. An unreadable blob also yields an empty index unless
    /// [`VaultConfig::strict_index_load`] is set.
    ///
    /// # Errors
    ///
    /// - `VaultError::Locked` if called before a successful unlock
    /// - `VaultError::CorruptIndex` under strict loading
    pub async fn account_index(&self) -> Result<Arc<VaultIndex>> {
        let mut cache = self.index.lock().await;
        self.ensure_loaded(&mut cache).await
    }

    /// How the cached index was obtained, or `None` before the first load.
    pub async fn index_status(&self) -> Option<IndexStatus> {
        self.index.lock().await.status.clone()
    }

    /// Look up a single record.
    pub async fn account(&self, id: &AccountId) -> Result<Option<Value>> {
        Ok(self.account_index().await?.get(id).cloned())
    }

    /// Insert `record` under a fresh identifier and persist the index.
    ///
    /// The in-memory index keeps the new record even if persisting fails;
    /// the next successful write stores it.
    ///
    /// # Errors
    ///
    /// - `VaultError::Locked` if called before a successful unlock
    /// - `VaultError::IdSpaceExhausted` if no free identifier was found
    /// - any encryption or storage error from the write-back
    pub async fn add_account(&self, record: Value) -> Result<AccountId> {
        let mut cache = self.index.lock().await;
        let current = self.ensure_loaded(&mut cache).await?;
        let id = {
            let mut rng = rand::rng();
            allocate_id(&current, self.config.max_id_attempts, &mut rng)?
        };
        drop(current);

        let index = cache.index.get_or_insert_with(Default::default);
        Arc::make_mut(index).insert(id.clone(), record);
        let snapshot = Arc::clone(index);
        debug!(%id, "Account added");

        self.write_index(&snapshot).await?;
        Ok(id)
    }

    async fn ensure_loaded(&self, cache: &mut IndexCache) -> Result<Arc<VaultIndex>> {
        if let Some(index) = &cache.index {
            return Ok(Arc::clone(index));
        }

        let keys = self.keys().await?;
        let (index, status) = match self.load_index(&keys).await {
            Ok(Some(index)) => {
                debug!(accounts = index.len(), "Account index loaded");
                if index.unrecognized_len() > 0 {
                    warn!(
                        entries = index.unrecognized_len(),
                        "Account index has entries with invalid IDs; keeping them as stored"
                    );
                }
                (index, IndexStatus::Loaded)
            }
            Ok(None) => {
                debug!("No account index stored, starting empty");
                (VaultIndex::new(), IndexStatus::NotFound)
            }
            Err(err) if self.config.strict_index_load => {
                return Err(VaultError::CorruptIndex(err.to_string()));
            }
            Err(err) => {
                warn!(error = %err, "Account index unreadable, starting empty");
                (VaultIndex::new(), IndexStatus::Corrupt(err.to_string()))
            }
        };

        let index = Arc::new(index);
        cache.index = Some(Arc::clone(&index));
        cache.status = Some(status);
        Ok(index)
    }

    async fn load_index(&self, keys: &KeyPair<C>) -> Result<Option<VaultIndex>> {
        let Some(armored) = self.store.read(BlobSlot::AccountIndex).await? else {
            return Ok(None);
        };
        let plaintext = Zeroizing::new(self.cipher.decrypt_message(&armored, &keys.private_key)?);
        let index = serde_json::from_str(&plaintext)?;
        Ok(Some(index))
    }

    async fn write_index(&self, index: &VaultIndex) -> Result<()> {
        let keys = self.keys().await?;
        let plaintext = Zeroizing::new(serde_json::to_string(index)?);
        let armored = self.cipher.encrypt_message(&plaintext, &keys.public_key)?;
        self.store.write(BlobSlot::AccountIndex, &armored).await?;
        info!(accounts = index.len(), "Account index written");
        Ok(())
    }

    async fn keys(&self) -> Result<Arc<KeyPair<C>>> {
        self.keys.read().await.clone().ok_or(VaultError::Locked)
    }

    async fn read_required(&self, slot: BlobSlot) -> Result<String> {
        self.store
            .read(slot)
            .await?
            .ok_or(VaultError::NotInitialized)
    }
}
