use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod branding;
mod chart;
mod commands;
mod config;
mod format;

#[derive(Parser)]
#[command(name = "fundly-curve")]
#[command(about = "Bonding curve and market cap launch analysis for Fundly", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./.fundly-curve.toml when present)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare curve parameter presets, buyer scenarios and whale resistance
    Simulate(commands::simulate::SimulateArgs),
    /// Size launches from USD market cap targets
    MarketCap,
    /// Write a default .fundly-curve.toml to the current directory
    Init(commands::init::InitArgs),
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let load_config = || config::load_config(cli.config.as_deref());
    let is_json = cli.format == OutputFormat::Json;

    match cli.command {
        Some(Commands::Simulate(args)) => {
            let config = load_config()?;
            if !is_json {
                branding::print_logo();
            }
            commands::simulate::exec(&config, &args, cli.format)?;
        }
        Some(Commands::MarketCap) => {
            let config = load_config()?;
            if !is_json {
                branding::print_logo();
            }
            commands::market_cap::exec(&config, cli.format)?;
        }
        Some(Commands::Init(args)) => {
            commands::init::exec(args)?;
        }
        None => {
            let config = load_config()?;
            commands::run_all(&config, cli.format)?;
        }
    }

    Ok(())
}
