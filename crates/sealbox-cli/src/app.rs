//! Shared command plumbing: path resolution, vault opening, and unlock retry.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use sealbox_core::{DirVault, VaultConfig, VaultError};
use tracing::debug;

use crate::cli::Cli;
use crate::config::{default_config_path, read_config, SealboxConfig};
use crate::constants::{CONFIG_ENV, MAX_PROMPT_ATTEMPTS};
use crate::errors::CliError;
use crate::helpers::{env_passphrase, prompt_passphrase};

/// Resolve the config file path, checking `SEALBOX_CONFIG` first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

fn load_config() -> anyhow::Result<Option<SealboxConfig>> {
    let config_path = resolve_config_path()?;
    if !config_path.exists() {
        return Ok(None);
    }
    read_config(&config_path).map(Some)
}

/// Resolve the vault directory from `--vault`/`SEALBOX_PATH` or the config file.
pub fn resolve_vault_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.vault.as_ref() {
        return Ok(PathBuf::from(path));
    }
    match load_config()? {
        Some(config) => Ok(PathBuf::from(config.vault.path)),
        None => Err(CliError::not_found("No vault configured.")
            .with_hint(MISSING_VAULT_HINT)
            .into()),
    }
}

const MISSING_VAULT_HINT: &str =
    "Run:\n  sealbox init\n\nOr specify a vault directory:\n  SEALBOX_PATH=/path/to/vault sealbox init";

/// Vault tunables from the `[index]` config section, or defaults.
pub fn load_vault_config() -> anyhow::Result<VaultConfig> {
    Ok(load_config()?
        .map(|config| config.vault_config())
        .unwrap_or_default())
}

/// Open the configured vault, failing with `NOT_FOUND` if it has no keys yet.
pub async fn open_vault(cli: &Cli) -> anyhow::Result<(DirVault, PathBuf)> {
    let path = resolve_vault_path(cli)?;
    let vault = DirVault::open_dir(&path, load_vault_config()?);
    if !vault.is_initialized().await? {
        return Err(missing_vault(&path).into());
    }
    debug!(path = %path.display(), "Vault opened");
    Ok((vault, path))
}

fn missing_vault(path: &Path) -> CliError {
    CliError::not_found(format!("No vault found at {}", path.display()))
        .with_hint(MISSING_VAULT_HINT)
}

/// Open and unlock the vault, prompting up to three times on a TTY.
pub async fn open_unlocked(cli: &Cli, no_input: bool) -> anyhow::Result<(DirVault, PathBuf)> {
    let (vault, path) = open_vault(cli).await?;
    let interactive = std::io::stdin().is_terminal() && !no_input;

    if let Some(passphrase) = env_passphrase() {
        if vault.unlock(&passphrase).await? {
            return Ok((vault, path));
        }
        return Err(VaultError::IncorrectPassphrase.into());
    }

    let max_attempts = if interactive { MAX_PROMPT_ATTEMPTS } else { 1 };
    for attempt in 1..=max_attempts {
        let passphrase = prompt_passphrase(interactive)?;
        if try_unlock(&vault, &passphrase).await? {
            return Ok((vault, path));
        }
        if attempt < max_attempts {
            eprintln!("Incorrect passphrase. Try again.");
        }
    }

    Err(CliError::auth_failed("Too many failed passphrase attempts.")
        .with_hint("Hint: set SEALBOX_PASSPHRASE for non-interactive use.")
        .into())
}

/// `Ok(false)` for a rejected passphrase, whichever check caught it.
async fn try_unlock(vault: &DirVault, passphrase: &str) -> anyhow::Result<bool> {
    match vault.unlock(passphrase).await {
        Ok(unlocked) => Ok(unlocked),
        Err(VaultError::IncorrectPassphrase) => Ok(false),
        Err(err) => Err(err.into()),
    }
}
