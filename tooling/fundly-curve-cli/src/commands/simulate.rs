use std::fmt::Write;
use std::path::PathBuf;

use clap::Args;
use colored::*;
use fundly_curve_core::{
    cost_curve, cost_to_buy, price_curve, simulate_buyers, whale_table, CurveParameters,
    FundlyConfig, TradingRun, WhaleRow,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::chart::{self, ChartSeries};
use crate::format::{banner, millions, warning};
use crate::OutputFormat;

#[derive(Args, Debug, Default)]
pub struct SimulateArgs {
    /// Where to write the comparison chart (overrides the config)
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Skip chart generation
    #[arg(long)]
    pub no_chart: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckpointCost {
    pub fraction: f64,
    pub tokens: f64,
    pub sol_cost: f64,
}

#[derive(Debug, Serialize)]
pub struct PresetComparison {
    pub name: String,
    pub recommended: bool,
    pub params: CurveParameters,
    pub initial_price: f64,
    pub costs: Vec<CheckpointCost>,
}

#[derive(Debug, Serialize)]
pub struct SimulatorReport {
    pub total_supply: f64,
    pub comparisons: Vec<PresetComparison>,
    pub trading: Vec<TradingRun>,
    /// Column names for `whale_rows`.
    pub whale_curves: Vec<String>,
    pub whale_rows: Vec<WhaleRow>,
}

pub fn build_report(config: &FundlyConfig) -> anyhow::Result<SimulatorReport> {
    let supply = config.total_supply;
    let sim = &config.simulator;

    let mut comparisons = Vec::with_capacity(sim.presets.len());
    for preset in &sim.presets {
        let params = preset.params(supply)?;
        let costs = config
            .checkpoints
            .iter()
            .map(|&fraction| {
                let tokens = supply * fraction;
                Ok(CheckpointCost {
                    fraction,
                    tokens,
                    sol_cost: cost_to_buy(&params, tokens)?,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        comparisons.push(PresetComparison {
            name: preset.name.clone(),
            recommended: preset.recommended,
            params,
            initial_price: params.initial_price(),
            costs,
        });
    }

    let mut trading = Vec::with_capacity(sim.scenarios.len());
    let mut whale_params = Vec::with_capacity(sim.scenarios.len());
    for scenario in &sim.scenarios {
        let params = scenario.params(supply)?;
        trading.push(simulate_buyers(&scenario.name, params, &sim.buyers)?);
        whale_params.push(params);
    }

    Ok(SimulatorReport {
        total_supply: supply,
        comparisons,
        trading,
        whale_curves: sim.scenarios.iter().map(|s| s.name.clone()).collect(),
        whale_rows: whale_table(&whale_params, &sim.whale_budgets)?,
    })
}

fn render_comparison(out: &mut String, report: &SimulatorReport) -> std::fmt::Result {
    out.push_str(&banner("BONDING CURVE PARAMETER COMPARISON"));
    writeln!(out)?;
    for c in &report.comparisons {
        if c.recommended {
            writeln!(out, "{} {}", c.name.bold(), "⭐")?;
        } else {
            writeln!(out, "{}", c.name.bold())?;
        }
        writeln!(
            out,
            "  Virtual Reserves: {} SOL / {:.0}M tokens",
            c.params.virtual_sol,
            millions(c.params.virtual_tokens)
        )?;
        writeln!(out, "  Initial Price: {:.10} SOL/token", c.initial_price)?;
        writeln!(out, "  Costs:")?;
        for cost in &c.costs {
            writeln!(
                out,
                "    {:.0}% of supply ({:.0}M tokens): {:7.2} SOL",
                cost.fraction * 100.0,
                millions(cost.tokens),
                cost.sol_cost
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn render_trading(out: &mut String, report: &SimulatorReport) -> std::fmt::Result {
    out.push_str(&banner("REALISTIC TRADING SCENARIO SIMULATION"));
    let buyers = report.trading.first().map_or(0, |run| run.fills.len());
    writeln!(out, "\nScenario: {} buyers with different budgets", buyers)?;

    for run in &report.trading {
        writeln!(out, "\n{}", run.curve.bold())?;
        writeln!(out, "{}", "-".repeat(60))?;
        for entry in &run.fills {
            let fill = &entry.fill;
            write!(
                out,
                "{:25} → {:6.2}M tokens ({:5.2}% of supply)",
                entry.buyer,
                millions(fill.tokens_out),
                fill.supply_pct
            )?;
            if fill.sol_in < entry.budget_sol {
                write!(out, " {}", format!("sold out, {:.2} SOL used", fill.sol_in).yellow())?;
            }
            writeln!(out)?;
        }
        writeln!(out, "\nTotal SOL collected: {:.2} SOL", run.total_sol_collected)?;
        writeln!(
            out,
            "Tokens remaining: {:.2}M ({:.1}%)",
            millions(run.tokens_remaining),
            run.remaining_pct
        )?;
    }
    Ok(())
}

fn render_whales(out: &mut String, report: &SimulatorReport) -> std::fmt::Result {
    out.push_str(&banner("WHALE ATTACK RESISTANCE ANALYSIS"));
    writeln!(out)?;
    write!(out, "{:<15}", "Whale Budget")?;
    for name in &report.whale_curves {
        write!(out, " {:<25}", name)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(15 + 26 * report.whale_curves.len()))?;

    for row in &report.whale_rows {
        write!(out, "{:<15}", format!("{} SOL", row.budget_sol))?;
        for pct in &row.shares_pct {
            write!(out, " {:<25}", format!("{:5.1}% of supply", pct))?;
        }
        writeln!(out)?;
    }

    // Headline: the 100 SOL whale when the table has one, else the largest budget.
    let headline = report
        .whale_rows
        .iter()
        .find(|row| row.budget_sol == 100.0)
        .or_else(|| report.whale_rows.last());
    if let (Some(row), [first, .., last]) = (headline, report.whale_curves.as_slice()) {
        let (Some(first_pct), Some(last_pct)) = (row.shares_pct.first(), row.shares_pct.last())
        else {
            return Ok(());
        };
        writeln!(out, "\n💡 Analysis:")?;
        writeln!(
            out,
            "   With {}, a {} SOL whale gets {:.0}% of supply",
            last, row.budget_sol, last_pct
        )?;
        writeln!(out, "   vs. {:.0}% with {}!", first_pct, first)?;
    }
    Ok(())
}

pub fn render_text(report: &SimulatorReport) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "\n{}", "🚀 FUNDLY BONDING CURVE SIMULATOR".bold())?;
    writeln!(out, "{}", "=".repeat(80))?;
    render_comparison(&mut out, report)?;
    render_trading(&mut out, report)?;
    render_whales(&mut out, report)?;
    Ok(out)
}

fn chart_series(config: &FundlyConfig) -> anyhow::Result<Vec<ChartSeries>> {
    let percentages = chart::cost_percentages();
    config
        .simulator
        .presets
        .iter()
        .map(|preset| {
            let params = preset.params(config.total_supply)?;
            let price_points = price_curve(&params, config.simulator.sample_points)?
                .into_iter()
                .map(|p| (millions(p.tokens_bought), p.price))
                .collect();
            Ok(ChartSeries {
                name: preset.name.clone(),
                price_points,
                cost_points: cost_curve(&params, &percentages)?,
            })
        })
        .collect()
}

/// Renders the chart and returns the lines to print. Never fails the report.
fn render_chart_section(config: &FundlyConfig, args: &SimulateArgs) -> String {
    let mut out = banner("Generating visual comparison charts...");
    if !chart::is_available() {
        warn!("chart feature not enabled, skipping chart");
        out.push_str(&format!(
            "\n{}\n    To generate charts, rebuild with: cargo install fundly-curve-cli --features chart\n",
            warning("Chart support not built in. Skipping chart generation.")
        ));
        return out;
    }

    let path = args
        .chart
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.simulator.chart_path));
    let result = chart_series(config).and_then(|series| {
        chart::render(&path, &series, config.simulator.migration_threshold_sol)
    });
    match result {
        Ok(()) => {
            debug!(path = %path.display(), "chart written");
            out.push_str(&format!("\n📊 Chart saved as '{}'\n", path.display()));
        }
        Err(e) => {
            warn!(error = %e, "chart generation failed");
            out.push_str(&format!(
                "\n{}\n",
                warning(&format!("Chart generation failed: {}", e))
            ));
        }
    }
    out
}

fn render_footer(config: &FundlyConfig) -> String {
    let mut out = banner(&format!("{} Analysis complete!", "✅".green()));
    if let Some(best) = config.simulator.presets.iter().find(|p| p.recommended) {
        out.push_str(&format!(
            "\nRECOMMENDATION: Use {} for best balance\n                between accessibility and whale protection.\n",
            best.name.bold()
        ));
    }
    out
}

pub fn exec(config: &FundlyConfig, args: &SimulateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let report = build_report(config)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            print!("{}", render_text(&report)?);
            if !args.no_chart {
                print!("{}", render_chart_section(config, args));
            }
            print!("{}", render_footer(config));
        }
    }
    Ok(())
}
