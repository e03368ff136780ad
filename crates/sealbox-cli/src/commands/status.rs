use sealbox_core::{DirVault, IndexStatus};

use crate::app::{open_unlocked, resolve_vault_path};
use crate::cli::{Cli, StatusArgs};

pub async fn handle_status(cli: &Cli, args: &StatusArgs) -> anyhow::Result<()> {
    let path = resolve_vault_path(cli)?;
    println!("Vault: {}", path.display());

    let initialized = DirVault::open_dir(&path, Default::default())
        .is_initialized()
        .await?;
    println!("Initialized: {}", if initialized { "yes" } else { "no" });
    if !initialized || !args.unlock {
        return Ok(());
    }

    let (vault, _) = open_unlocked(cli, args.no_input).await?;
    let index = vault.account_index().await?;
    let state = match vault.index_status().await {
        Some(IndexStatus::Loaded) => "loaded".to_string(),
        Some(IndexStatus::NotFound) => "empty (no index stored yet)".to_string(),
        Some(IndexStatus::Corrupt(reason)) => format!("unreadable, started empty ({})", reason),
        None => "not loaded".to_string(),
    };
    println!("Index: {}", state);
    println!("Accounts: {}", index.len());
    Ok(())
}
