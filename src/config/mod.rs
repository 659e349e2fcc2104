mod schema;

pub use schema::{Config, DEFAULT_ARPU};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/rice-calc/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("rice-calc"))
}

/// Get the default config file path (~/.config/rice-calc/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Ensure a directory exists, creating it and its parents if needed
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory at {}", dir.display()))?;
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/rice-calc/config.yaml)
///
/// A missing file at the default path yields the default config. An explicitly
/// given path must exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicit config path does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(arpu) = config.arpu {
        if !arpu.is_finite() || arpu <= 0.0 {
            errors.push(format!("arpu: must be a positive number, got {}", arpu));
        }
    }

    if let Some(ref currency) = config.currency {
        if currency.trim().is_empty() {
            errors.push("currency: must not be empty".to_string());
        }
    }

    if let Some(ref store_path) = config.store_path {
        if store_path.trim().is_empty() {
            errors.push("store_path: must not be empty".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Resolve the store file: CLI flag, then config, then ~/.config/rice-calc/store.json.
/// A leading `~/` in the configured path expands to the home directory.
pub fn resolve_store_path(cli_path: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    if let Some(path) = cli_path {
        return Ok(path);
    }

    match config.store_path.as_deref() {
        Some(configured) => match configured.strip_prefix("~/") {
            Some(rest) => {
                let home = dirs::home_dir().context("Could not determine home directory")?;
                Ok(home.join(rest))
            }
            None => Ok(PathBuf::from(configured)),
        },
        None => Ok(get_config_dir()?.join("store.json")),
    }
}
