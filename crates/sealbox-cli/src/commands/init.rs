use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use sealbox_core::DirVault;

use crate::app::{load_vault_config, resolve_config_path};
use crate::cli::{Cli, InitArgs};
use crate::config::{default_vault_path, write_config, SealboxConfig};
use crate::helpers::prompt_init_passphrase;

pub async fn handle_init(cli: &Cli, args: &InitArgs) -> anyhow::Result<()> {
    let target = match args.path.as_ref().or(cli.vault.as_ref()) {
        Some(path) => PathBuf::from(path),
        None => default_vault_path()?,
    };

    let interactive = std::io::stdin().is_terminal();
    let passphrase = prompt_init_passphrase(interactive)?;

    let vault = DirVault::open_dir(&target, load_vault_config()?);
    vault
        .initialize(&passphrase)
        .await
        .with_context(|| format!("Cannot initialize vault at {}", target.display()))?;

    if !args.no_config {
        let config_path = resolve_config_path()?;
        write_config(&config_path, &SealboxConfig::new(target.clone()))?;
        if !cli.quiet {
            println!("Wrote config to {}", config_path.display());
        }
    }

    if !cli.quiet {
        println!("Initialized new vault at {}", target.display());
    }
    Ok(())
}
