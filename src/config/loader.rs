use super::core::AppConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Reads the per-user config file, writing the defaults there first if it is missing.
pub fn load_or_create_config() -> Result<AppConfig> {
    let config_path = get_config_path()?;
    load_or_create_at(&config_path)
}

/// Reads an explicit config file. A missing file is an error here.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))
}

fn load_or_create_at(config_path: &Path) -> Result<AppConfig> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    if !config_path.exists() {
        let default_config = AppConfig::default();
        let toml_content = toml::to_string_pretty(&default_config)?;
        std::fs::write(config_path, toml_content).context("Failed to write default config")?;
        log::info!("Wrote default config to {:?}", config_path);
        return Ok(default_config);
    }

    load_from_path(config_path)
}

fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "MetroManDevTeam", "glstep")
        .context("Couldn't determine project directory")?;
    Ok(proj_dirs.config_dir().join("glstep.toml"))
}
