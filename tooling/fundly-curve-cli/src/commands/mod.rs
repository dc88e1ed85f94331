pub mod init;
pub mod market_cap;
pub mod simulate;

use fundly_curve_core::FundlyConfig;
use serde_json::json;

use crate::{branding, OutputFormat};

/// Both reports back to back, as a bare `fundly-curve` run prints them.
pub fn run_all(config: &FundlyConfig, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let report = json!({
                "simulator": simulate::build_report(config)?,
                "launch": market_cap::build_report(config)?,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            branding::print_logo();
            simulate::exec(config, &simulate::SimulateArgs::default(), format)?;
            market_cap::exec(config, format)?;
        }
    }
    Ok(())
}
