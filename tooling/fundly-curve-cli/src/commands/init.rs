use anyhow::Context;
use clap::Args;
use colored::Colorize;
use fundly_curve_core::FundlyConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::CONFIG_FILE_NAME;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force overwrite existing configuration file
    #[arg(short = 'F', long)]
    pub force: bool,
}

/// What `init` did to the config file in the target directory.
#[derive(Debug, PartialEq)]
pub enum InitOutcome {
    Created(PathBuf),
    Overwritten(PathBuf),
    /// Left alone because `--force` was not given.
    Kept(PathBuf),
}

fn file_header(config: &FundlyConfig) -> String {
    format!(
        "# fundly-curve configuration\n\
         # {} curve presets, {} buyer scenarios, {} launch presets.\n\
         # Delete a section to fall back to its built-in defaults.\n\n",
        config.simulator.presets.len() + config.simulator.scenarios.len(),
        config.simulator.buyers.len(),
        config.launch.presets.len(),
    )
}

/// Writes `config` as `.fundly-curve.toml` in `dir`, unless one exists and
/// `force` is off.
pub fn write_config(
    dir: &Path,
    config: &FundlyConfig,
    force: bool,
) -> anyhow::Result<InitOutcome> {
    let path = dir.join(CONFIG_FILE_NAME);
    let existed = path.exists();
    if existed && !force {
        return Ok(InitOutcome::Kept(path));
    }

    let body = toml::to_string_pretty(config).context("failed to serialize presets")?;
    fs::write(&path, file_header(config) + &body)
        .with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), existed, "wrote config");

    Ok(if existed {
        InitOutcome::Overwritten(path)
    } else {
        InitOutcome::Created(path)
    })
}

pub fn exec(args: InitArgs) -> anyhow::Result<()> {
    let current_dir = std::env::current_dir()?;

    match write_config(&current_dir, &FundlyConfig::default(), args.force) {
        Ok(InitOutcome::Created(path)) => {
            println!("{} Wrote default presets to {}", "✓".green(), path.display());
            println!("   Edit it, then run `fundly-curve simulate` or `fundly-curve market-cap`");
            Ok(())
        }
        Ok(InitOutcome::Overwritten(path)) => {
            println!("{} Reset {} to the default presets", "✓".green(), path.display());
            Ok(())
        }
        Ok(InitOutcome::Kept(path)) => {
            eprintln!(
                "{} Configuration file already exists: {}",
                "⚠".yellow(),
                path.display()
            );
            eprintln!("   Use --force to overwrite the existing configuration");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{} Failed to create configuration file", "✗".red());
            eprintln!("   Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_config_in_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        let outcome = write_config(temp_dir.path(), &FundlyConfig::default(), false).unwrap();
        let expected = temp_dir.path().join(CONFIG_FILE_NAME);
        assert_eq!(outcome, InitOutcome::Created(expected.clone()));
        assert!(expected.exists());
    }

    #[test]
    fn test_written_config_parses_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        write_config(temp_dir.path(), &FundlyConfig::default(), false).unwrap();

        let content = fs::read_to_string(temp_dir.path().join(CONFIG_FILE_NAME)).unwrap();
        let parsed = crate::config::parse_config(&content).unwrap();
        assert_eq!(parsed, FundlyConfig::default());
        assert!(content.starts_with("# fundly-curve configuration"));
        assert!(content.contains("# 6 curve presets, 5 buyer scenarios, 5 launch presets."));
        assert!(content.contains("[[simulator.presets]]"));
        assert!(content.contains("Option 2 (200/600M)"));
    }

    #[test]
    fn test_existing_file_is_kept_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "existing content").unwrap();

        let outcome = write_config(temp_dir.path(), &FundlyConfig::default(), false).unwrap();
        assert_eq!(outcome, InitOutcome::Kept(config_path.clone()));
        assert_eq!(fs::read_to_string(&config_path).unwrap(), "existing content");
    }

    #[test]
    fn test_force_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "existing content").unwrap();

        let outcome = write_config(temp_dir.path(), &FundlyConfig::default(), true).unwrap();
        assert_eq!(outcome, InitOutcome::Overwritten(config_path.clone()));
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("total_supply"));
    }

    #[test]
    fn test_custom_config_is_written_as_given() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = FundlyConfig::default();
        config.launch.sol_price_usd = 150.0;

        write_config(temp_dir.path(), &config, false).unwrap();
        let content = fs::read_to_string(temp_dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(crate::config::parse_config(&content).unwrap(), config);
    }
}
