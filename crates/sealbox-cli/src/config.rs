use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sealbox_core::VaultConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct SealboxConfig {
    pub vault: VaultSection,
    #[serde(default)]
    pub index: IndexSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VaultSection {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct IndexSection {
    /// Fail instead of starting empty when the stored index is unreadable.
    #[serde(default)]
    pub strict_load: bool,
    pub max_id_attempts: Option<usize>,
}

impl SealboxConfig {
    pub fn new(vault_path: PathBuf) -> Self {
        Self {
            vault: VaultSection {
                path: vault_path.to_string_lossy().to_string(),
            },
            index: IndexSection::default(),
        }
    }

    pub fn vault_config(&self) -> VaultConfig {
        let mut config = VaultConfig::new().with_strict_index_load(self.index.strict_load);
        if let Some(attempts) = self.index.max_id_attempts {
            config = config.with_max_id_attempts(attempts);
        }
        config
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_vault_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("vault"))
}

pub fn read_config(path: &Path) -> anyhow::Result<SealboxConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &SealboxConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("sealbox"));
        }
    }
    Ok(home_dir()?.join(".config").join("sealbox"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("sealbox"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("sealbox"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
