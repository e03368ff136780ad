use std::fs;
use std::sync::Arc;

use serde_json::json;
use tempfile::tempdir;

use sealbox_core::crypto::{AgeCipher, Cipher, StoredVerifier};
use sealbox_core::{
    BlobSlot, DirStore, DirVault, IndexStatus, MemoryStore, Vault, VaultConfig, VaultError,
    VaultEvent, VaultIndex,
};

const PASSPHRASE: &str = "test-passphrase-secure-123";

#[tokio::test]
async fn test_full_lifecycle_on_disk() {
    let dir = tempdir().expect("tempdir should be created");
    let root = dir.path().join("vault");

    let vault = DirVault::open_dir(&root, VaultConfig::default());
    vault.initialize(PASSPHRASE).await.expect("initialize should succeed");

    let mut events = vault.subscribe();
    assert!(!vault.unlock("wrong-passphrase-456").await.expect("check should run"));
    assert!(vault.unlock(PASSPHRASE).await.expect("unlock should succeed"));
    assert_eq!(events.recv().await.expect("event should arrive"), VaultEvent::Unlocked);

    let empty = vault.account_index().await.expect("index should load");
    assert!(empty.is_empty());
    assert_eq!(vault.index_status().await, Some(IndexStatus::NotFound));

    let github = vault
        .add_account(json!({"name": "github"}))
        .await
        .expect("add should succeed");
    let gitlab = vault
        .add_account(json!({"name": "gitlab"}))
        .await
        .expect("add should succeed");
    assert_ne!(github, gitlab);

    let on_disk = fs::read_to_string(root.join(BlobSlot::AccountIndex.file_name()))
        .expect("index blob should exist");
    assert!(on_disk.starts_with("-----BEGIN AGE ENCRYPTED FILE-----"));
    assert!(!on_disk.contains("github"));

    let expected = vault.account_index().await.expect("index should be cached");

    let reopened = DirVault::open_dir(&root, VaultConfig::default());
    assert!(reopened.unlock(PASSPHRASE).await.expect("unlock should succeed"));
    let loaded = reopened.account_index().await.expect("index should load");
    assert_eq!(*loaded, *expected);
    assert_eq!(reopened.index_status().await, Some(IndexStatus::Loaded));
}

#[tokio::test]
async fn test_persisted_blob_decrypts_independently() {
    let dir = tempdir().expect("tempdir should be created");
    let vault = DirVault::open_dir(dir.path(), VaultConfig::default());
    vault.initialize(PASSPHRASE).await.expect("initialize should succeed");
    vault.unlock(PASSPHRASE).await.expect("unlock should succeed");
    vault
        .add_account(json!({"name": "github", "user": "octocat"}))
        .await
        .expect("add should succeed");

    let cipher = AgeCipher::new();
    let armored_key = fs::read_to_string(dir.path().join(BlobSlot::PrivateKey.file_name()))
        .expect("private key should exist");
    let key = cipher
        .unlock_private_key(&armored_key, PASSPHRASE)
        .expect("private key should unlock");
    let blob = fs::read_to_string(dir.path().join(BlobSlot::AccountIndex.file_name()))
        .expect("index blob should exist");
    let plaintext = cipher.decrypt_message(&blob, &key).expect("blob should decrypt");
    let parsed: VaultIndex = serde_json::from_str(&plaintext).expect("plaintext should parse");

    assert_eq!(parsed, *vault.account_index().await.expect("index should be cached"));
}

#[tokio::test]
async fn test_initialize_refuses_existing_vault() {
    let dir = tempdir().expect("tempdir should be created");
    let vault = DirVault::open_dir(dir.path(), VaultConfig::default());
    vault.initialize(PASSPHRASE).await.expect("initialize should succeed");

    let result = vault.initialize("another-passphrase-789").await;
    assert!(matches!(result, Err(VaultError::AlreadyInitialized)));
    assert!(vault.unlock(PASSPHRASE).await.expect("unlock should succeed"));
}

#[tokio::test]
async fn test_unlock_uninitialized_dir_fails() {
    let dir = tempdir().expect("tempdir should be created");
    let vault = DirVault::open_dir(dir.path(), VaultConfig::default());

    let result = vault.unlock(PASSPHRASE).await;
    assert!(matches!(result, Err(VaultError::NotInitialized)));
}

#[tokio::test]
async fn test_tampered_index_reads_as_empty_on_age() {
    let store = Arc::new(MemoryStore::new());
    let vault = Vault::new(
        Arc::clone(&store),
        AgeCipher::new(),
        StoredVerifier::new(Arc::clone(&store)),
        VaultConfig::default(),
    );
    vault.initialize(PASSPHRASE).await.expect("initialize should succeed");
    vault.unlock(PASSPHRASE).await.expect("unlock should succeed");
    vault
        .add_account(json!({"name": "github"}))
        .await
        .expect("add should succeed");

    let mut blob = store
        .peek(BlobSlot::AccountIndex)
        .expect("index should be persisted");
    blob.insert_str(40, "tampered");
    store.seed(BlobSlot::AccountIndex, blob);

    let fresh = Vault::new(
        Arc::clone(&store),
        AgeCipher::new(),
        StoredVerifier::new(Arc::clone(&store)),
        VaultConfig::default(),
    );
    fresh.unlock(PASSPHRASE).await.expect("unlock should succeed");
    assert!(fresh.account_index().await.expect("fallback should apply").is_empty());
    assert!(matches!(
        fresh.index_status().await,
        Some(IndexStatus::Corrupt(_))
    ));
}

#[tokio::test]
async fn test_dir_store_shares_files_with_verifier() {
    let dir = tempdir().expect("tempdir should be created");
    let store = Arc::new(DirStore::new(dir.path()));
    let vault = Vault::new(
        Arc::clone(&store),
        AgeCipher::new(),
        StoredVerifier::new(Arc::clone(&store)),
        VaultConfig::default(),
    );
    vault.initialize(PASSPHRASE).await.expect("initialize should succeed");

    for slot in [BlobSlot::PrivateKey, BlobSlot::PublicKey, BlobSlot::Verifier] {
        assert!(store.path_for(slot).exists(), "{} should be written", slot);
    }
    assert!(!store.path_for(BlobSlot::AccountIndex).exists());
}
