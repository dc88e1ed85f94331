use anyhow::Context;
use fundly_curve_core::FundlyConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = ".fundly-curve.toml";

/// Loads `path`, else `./.fundly-curve.toml` if it exists, else the built-in
/// presets.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<FundlyConfig> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            local.exists().then_some(local)
        }
    };

    let Some(path) = path else {
        debug!("no config file, using built-in presets");
        return Ok(FundlyConfig::default());
    };

    debug!(path = %path.display(), "loading config");
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&text).with_context(|| format!("invalid config file {}", path.display()))
}

pub fn parse_config(text: &str) -> anyhow::Result<FundlyConfig> {
    let config: FundlyConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}
