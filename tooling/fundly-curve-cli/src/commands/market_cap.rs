use std::fmt::Write;

use colored::*;
use fundly_curve_core::{
    analyze_market_cap, implied_market_cap_usd, sol_price_sensitivity, whale_table, FundingGoal,
    FundlyConfig, LaunchPreset, MarketCapAnalysis, WhaleRow,
};
use serde::Serialize;

use crate::format::{banner, compact_usd, millions, thousands};
use crate::OutputFormat;

struct Recommendation {
    project: &'static str,
    team: &'static str,
    product: &'static str,
    traction: &'static str,
    recommended: &'static str,
    why: &'static str,
}

const RECOMMENDATIONS: [Recommendation; 5] = [
    Recommendation {
        project: "Meme Coin / Fun Project",
        team: "1-2 people",
        product: "Idea or concept",
        traction: "None yet",
        recommended: "Micro ($4.6k)",
        why: "Fast launch, maximum accessibility, viral potential",
    },
    Recommendation {
        project: "Early Stage Project",
        team: "2-5 people",
        product: "MVP or demo",
        traction: "Small community",
        recommended: "Small ($10k)",
        why: "Balanced approach, tests market interest",
    },
    Recommendation {
        project: "Serious Project",
        team: "5-10 people",
        product: "Working beta",
        traction: "Active users",
        recommended: "Medium ($25k)",
        why: "Professional signal, attracts serious investors",
    },
    Recommendation {
        project: "Established Project",
        team: "10+ people",
        product: "Launched product",
        traction: "Significant users",
        recommended: "Large ($50k)",
        why: "Premium positioning, filters for commitment",
    },
    Recommendation {
        project: "Major Protocol",
        team: "15+ people",
        product: "Proven product",
        traction: "Strong metrics",
        recommended: "Premium ($100k)",
        why: "Maximum credibility, institutional interest",
    },
];

#[derive(Debug, Serialize)]
pub struct LaunchRow {
    pub preset: LaunchPreset,
    pub analysis: MarketCapAnalysis,
}

#[derive(Debug, Serialize)]
pub struct FundingRow {
    pub goal: FundingGoal,
    pub implied_market_cap_usd: f64,
}

#[derive(Debug, Serialize)]
pub struct SensitivityRow {
    pub sol_price_usd: f64,
    pub analysis: MarketCapAnalysis,
}

#[derive(Debug, Serialize)]
pub struct LaunchReport {
    pub sol_price_usd: f64,
    pub total_supply: f64,
    pub launches: Vec<LaunchRow>,
    pub whale_rows: Vec<WhaleRow>,
    pub funding: Vec<FundingRow>,
    pub sensitivity_market_cap_usd: f64,
    pub sensitivity: Vec<SensitivityRow>,
}

/// "Micro Launch" at $4,600 -> "Micro ($4.6k)".
fn short_label(preset: &LaunchPreset) -> String {
    let word = preset.name.split_whitespace().next().unwrap_or(&preset.name);
    format!("{} ({})", word, compact_usd(preset.market_cap_usd))
}

pub fn build_report(config: &FundlyConfig) -> anyhow::Result<LaunchReport> {
    let launch = &config.launch;
    let supply = config.total_supply;

    let launches = launch
        .presets
        .iter()
        .map(|preset| {
            let analysis = analyze_market_cap(
                preset.market_cap_usd,
                launch.sol_price_usd,
                launch.virtual_sol,
                supply,
                &config.checkpoints,
            )?;
            Ok(LaunchRow {
                preset: preset.clone(),
                analysis,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let curves = launches
        .iter()
        .map(|row| row.analysis.params())
        .collect::<Result<Vec<_>, _>>()?;
    let whale_rows = whale_table(&curves, &launch.whale_budgets)?;

    let funding = launch
        .funding_goals
        .iter()
        .map(|goal| {
            Ok(FundingRow {
                goal: goal.clone(),
                implied_market_cap_usd: implied_market_cap_usd(
                    goal.target_sol,
                    goal.sell_fraction,
                    launch.sol_price_usd,
                )?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let sensitivity = sol_price_sensitivity(
        launch.sensitivity_market_cap_usd,
        &launch.sensitivity_sol_prices,
        launch.virtual_sol,
        supply,
    )?
    .into_iter()
    .map(|(sol_price_usd, analysis)| SensitivityRow {
        sol_price_usd,
        analysis,
    })
    .collect();

    Ok(LaunchReport {
        sol_price_usd: launch.sol_price_usd,
        total_supply: supply,
        launches,
        whale_rows,
        funding,
        sensitivity_market_cap_usd: launch.sensitivity_market_cap_usd,
        sensitivity,
    })
}

fn render_presets(out: &mut String, report: &LaunchReport) -> std::fmt::Result {
    out.push_str(&banner("MARKET CAP LAUNCH ANALYZER"));
    writeln!(out, "\nSOL Price: ${}", report.sol_price_usd)?;
    writeln!(out, "Total Supply: {} tokens\n", thousands(report.total_supply))?;

    for row in &report.launches {
        let a = &row.analysis;
        writeln!(out, "{}", "=".repeat(80))?;
        writeln!(
            out,
            "\n{}",
            format!("{}: ${}", row.preset.name, thousands(a.market_cap_usd)).bold()
        )?;
        writeln!(out, "{}", "-".repeat(80))?;
        writeln!(
            out,
            "Market Cap: ${} ({:.2} SOL)",
            thousands(a.market_cap_usd),
            a.market_cap_sol
        )?;
        writeln!(out, "Initial Price: {:.10} SOL per token", a.initial_price_sol)?;
        writeln!(out, "Virtual SOL: {} SOL", a.virtual_sol)?;
        writeln!(out, "Virtual Tokens: {:.2}M", millions(a.virtual_tokens))?;
        writeln!(out)?;
        writeln!(out, "Cost to buy supply:")?;
        for cost in &a.costs {
            writeln!(
                out,
                "  {} {:>3}: {:7.2} SOL",
                cost.tier.marker(),
                format!("{:.0}%", cost.fraction * 100.0),
                cost.sol_cost
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn render_whales(out: &mut String, report: &LaunchReport) -> std::fmt::Result {
    out.push_str(&banner("WHALE RESISTANCE ANALYSIS"));
    writeln!(out, "\nHow much supply can a whale buy with different budgets?\n")?;

    write!(out, "{:<20}", "Whale Budget")?;
    for row in &report.launches {
        write!(out, "{:<15}", short_label(&row.preset))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(20 + 15 * report.launches.len()))?;

    for row in &report.whale_rows {
        write!(out, "{:<20}", format!("{} SOL", row.budget_sol))?;
        for pct in &row.shares_pct {
            write!(out, "{:<15}", format!("{:5.1}%", pct))?;
        }
        writeln!(out)?;
    }
    writeln!(out, "\n💡 Lower percentages = Better whale resistance")?;
    Ok(())
}

fn render_time_estimates(out: &mut String, report: &LaunchReport) -> std::fmt::Result {
    out.push_str(&banner("ESTIMATED TIME TO COMPLETE"));
    writeln!(out, "\nBased on typical trading patterns:\n")?;
    for row in &report.launches {
        let preset = &row.preset;
        let Some(time) = &preset.time_to_complete else {
            continue;
        };
        let label = format!("{} ({})", preset.name, compact_usd(preset.market_cap_usd));
        writeln!(
            out,
            "{:<25} {:<15} - {}",
            label,
            time,
            preset.pace.as_deref().unwrap_or("")
        )?;
    }
    writeln!(
        out,
        "\n{}  Actual time depends on marketing, community size, and market conditions",
        "⚠️".yellow()
    )?;
    Ok(())
}

fn render_funding(out: &mut String, report: &LaunchReport) -> std::fmt::Result {
    out.push_str(&banner("FUNDING GOAL CALCULATOR"));
    writeln!(out, "\nReverse engineer market cap from fundraising goals:\n")?;
    for row in &report.funding {
        writeln!(out, "{}", row.goal.description)?;
        writeln!(
            out,
            "  Target: Raise {} SOL after selling {:.0}% of supply",
            row.goal.target_sol,
            row.goal.sell_fraction * 100.0
        )?;
        writeln!(
            out,
            "  Implied Market Cap: ~${:.1}k",
            row.implied_market_cap_usd / 1_000.0
        )?;
        writeln!(out)?;
    }
    Ok(())
}

fn render_recommendations(out: &mut String) -> std::fmt::Result {
    out.push_str(&banner("MARKET CAP RECOMMENDATION ENGINE"));
    writeln!(out)?;
    for (i, rec) in RECOMMENDATIONS.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, rec.project.bold())?;
        writeln!(out, "   Team: {}", rec.team)?;
        writeln!(out, "   Product: {}", rec.product)?;
        writeln!(out, "   Traction: {}", rec.traction)?;
        writeln!(out, "   → Recommended: {}", rec.recommended.green())?;
        writeln!(out, "   Why: {}", rec.why)?;
        writeln!(out)?;
    }
    Ok(())
}

fn render_sensitivity(out: &mut String, report: &LaunchReport) -> std::fmt::Result {
    out.push_str(&banner("SOL PRICE SENSITIVITY ANALYSIS"));
    writeln!(
        out,
        "\nHow virtual tokens change with SOL price for {} market cap:\n",
        compact_usd(report.sensitivity_market_cap_usd)
    )?;
    writeln!(
        out,
        "{:<12} {:<18} {:<15} {:<20}",
        "SOL Price", "Market Cap (SOL)", "Virtual Tokens", "Initial Price (SOL)"
    )?;
    writeln!(out, "{}", "-".repeat(70))?;
    for row in &report.sensitivity {
        let a = &row.analysis;
        writeln!(
            out,
            "${:<11} {:<18.2} {:<15.2}M {:<20.10}",
            row.sol_price_usd,
            a.market_cap_sol,
            millions(a.virtual_tokens),
            a.initial_price_sol
        )?;
    }
    writeln!(
        out,
        "\n💡 The system auto-adjusts virtual tokens to maintain USD market cap"
    )?;
    Ok(())
}

pub fn render_text(report: &LaunchReport) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let rockets = "🚀".repeat(40);
    writeln!(out, "\n{}", rockets)?;
    writeln!(out, "{}", "FUNDLY MARKET CAP LAUNCH ANALYZER".bold())?;
    writeln!(out, "{}", rockets)?;

    render_presets(&mut out, report)?;
    render_whales(&mut out, report)?;
    render_time_estimates(&mut out, report)?;
    render_funding(&mut out, report)?;
    render_recommendations(&mut out)?;
    render_sensitivity(&mut out, report)?;

    out.push_str(&banner(&format!("{} Analysis Complete!", "✅".green())));
    writeln!(
        out,
        "\n🔧 Run `fundly-curve init` to copy these presets into {} and tune them.\n",
        crate::config::CONFIG_FILE_NAME
    )?;
    Ok(out)
}

pub fn exec(config: &FundlyConfig, format: OutputFormat) -> anyhow::Result<()> {
    let report = build_report(config)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", render_text(&report)?),
    }
    Ok(())
}
