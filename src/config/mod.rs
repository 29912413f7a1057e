mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if let Some(dir) = config.dump.output_dir.take() {
        let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
        config.dump.output_dir = Some(PathBuf::from(expanded));
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./is3dump.toml",
        "~/.config/is3dump/config.toml",
        "/etc/is3dump/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.dump.id3_tag && config.dump.publisher.is_empty() {
        anyhow::bail!("ID3 tag is enabled but the publisher is empty");
    }

    if let Some(dir) = &config.dump.output_dir {
        if !dir.is_dir() {
            anyhow::bail!("Output directory does not exist: {:?}", dir);
        }
    }

    Ok(())
}
