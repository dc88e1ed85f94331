//! Core math and analysis for Fundly bonding curve launches.
//!
//! The curve is a constant-product market (`x * y = k`) over virtual plus real
//! reserves. Everything in this crate is a pure function of its inputs: the
//! CLI builds reports by calling into [`curve`], [`simulation`] and [`launch`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod curve;
pub mod launch;
pub mod simulation;

pub use curve::{
    cost_curve, cost_to_buy, price_curve, solve_virtual_tokens, spot_price, tokens_for_sol,
    whale_share_pct, CurveParameters, CurvePoint,
};
pub use launch::{
    analyze_market_cap, implied_market_cap_usd, sol_price_sensitivity, CostTier,
    MarketCapAnalysis, SupplyCost,
};
pub use simulation::{simulate_buyers, whale_table, BuyerFill, CurveState, Fill, TradingRun, WhaleRow};

// ── Errors ────────────────────────────────────────────────────────────────────

/// Failures of the curve math. Every fallible function in this crate returns
/// [`CurveResult`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    #[error("invalid curve parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("cannot buy {requested} tokens: only {available} remain on the curve")]
    ExceedsSupply { requested: f64, available: f64 },

    /// The effective token reserve would reach zero (100% sold with no
    /// virtual tokens), so the price is undefined.
    #[error("curve supply exhausted: token reserve would reach zero")]
    SupplyExhausted,

    #[error("invalid market cap: {0}")]
    InvalidMarketCap(String),
}

pub type CurveResult<T> = Result<T, CurveError>;

/// Rejects negative, NaN and infinite amounts.
pub(crate) fn check_amount(name: &str, value: f64) -> CurveResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CurveError::InvalidAmount(format!(
            "{} must be a finite, non-negative number (got {})",
            name, value
        )));
    }
    Ok(())
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// A named set of virtual reserves. Defined in .fundly-curve.toml under
/// `[[simulator.presets]]` or `[[simulator.scenarios]]`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurvePreset {
    pub name: String,
    pub virtual_sol: f64,
    pub virtual_tokens: f64,
    #[serde(default)]
    pub recommended: bool,
}

impl CurvePreset {
    pub fn new(name: &str, virtual_sol: f64, virtual_tokens: f64) -> Self {
        Self {
            name: name.to_string(),
            virtual_sol,
            virtual_tokens,
            recommended: false,
        }
    }

    pub fn params(&self, real_token_supply: f64) -> CurveResult<CurveParameters> {
        CurveParameters::new(self.virtual_sol, self.virtual_tokens, real_token_supply)
    }
}

/// A launch configuration expressed as a USD market cap.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LaunchPreset {
    pub name: String,
    pub market_cap_usd: f64,
    /// Rough wall-clock estimate to fill the curve, e.g. "1-2 days".
    #[serde(default)]
    pub time_to_complete: Option<String>,
    #[serde(default)]
    pub pace: Option<String>,
}

impl LaunchPreset {
    fn new(name: &str, market_cap_usd: f64, time_to_complete: &str, pace: &str) -> Self {
        Self {
            name: name.to_string(),
            market_cap_usd,
            time_to_complete: Some(time_to_complete.to_string()),
            pace: Some(pace.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Buyer {
    pub name: String,
    pub budget_sol: f64,
}

impl Buyer {
    fn new(name: &str, budget_sol: f64) -> Self {
        Self {
            name: name.to_string(),
            budget_sol,
        }
    }
}

/// "Raise `target_sol` after selling `sell_fraction` of supply".
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FundingGoal {
    pub description: String,
    pub target_sol: f64,
    pub sell_fraction: f64,
}

impl FundingGoal {
    fn new(description: &str, target_sol: f64, sell_fraction: f64) -> Self {
        Self {
            description: description.to_string(),
            target_sol,
            sell_fraction,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SimulatorConfig {
    #[serde(default = "default_presets")]
    pub presets: Vec<CurvePreset>,
    /// Curves compared in the trading and whale scenarios.
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<CurvePreset>,
    #[serde(default = "default_buyers")]
    pub buyers: Vec<Buyer>,
    #[serde(default = "default_simulator_whale_budgets")]
    pub whale_budgets: Vec<f64>,
    #[serde(default = "default_sample_points")]
    pub sample_points: usize,
    #[serde(default = "default_migration_threshold_sol")]
    pub migration_threshold_sol: f64,
    #[serde(default = "default_chart_path")]
    pub chart_path: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LaunchConfig {
    #[serde(default = "default_sol_price_usd")]
    pub sol_price_usd: f64,
    #[serde(default = "default_launch_virtual_sol")]
    pub virtual_sol: f64,
    #[serde(default = "default_launch_presets")]
    pub presets: Vec<LaunchPreset>,
    #[serde(default = "default_launch_whale_budgets")]
    pub whale_budgets: Vec<f64>,
    #[serde(default = "default_funding_goals")]
    pub funding_goals: Vec<FundingGoal>,
    #[serde(default = "default_sensitivity_market_cap_usd")]
    pub sensitivity_market_cap_usd: f64,
    #[serde(default = "default_sensitivity_sol_prices")]
    pub sensitivity_sol_prices: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FundlyConfig {
    #[serde(default = "default_total_supply")]
    pub total_supply: f64,
    /// Fractions of supply priced in the comparison tables.
    #[serde(default = "default_checkpoints")]
    pub checkpoints: Vec<f64>,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub launch: LaunchConfig,
}

fn default_total_supply() -> f64 {
    1_000_000_000.0
}

fn default_checkpoints() -> Vec<f64> {
    vec![0.10, 0.25, 0.50, 0.75, 0.90]
}

fn default_presets() -> Vec<CurvePreset> {
    vec![
        CurvePreset::new("Current (30/1B)", 30.0, 1_000_000_000.0),
        CurvePreset::new("Option 1 (85/800M)", 85.0, 800_000_000.0),
        CurvePreset {
            recommended: true,
            ..CurvePreset::new("Option 2 (200/600M)", 200.0, 600_000_000.0)
        },
        CurvePreset::new("Option 3 (500/500M)", 500.0, 500_000_000.0),
    ]
}

fn default_scenarios() -> Vec<CurvePreset> {
    vec![
        CurvePreset::new("Current (30/1B)", 30.0, 1_000_000_000.0),
        CurvePreset::new("Optimized (200/600M)", 200.0, 600_000_000.0),
    ]
}

fn default_buyers() -> Vec<Buyer> {
    vec![
        Buyer::new("Small retail (0.5 SOL)", 0.5),
        Buyer::new("Medium retail (2 SOL)", 2.0),
        Buyer::new("Large retail (5 SOL)", 5.0),
        Buyer::new("Small whale (20 SOL)", 20.0),
        Buyer::new("Large whale (100 SOL)", 100.0),
    ]
}

fn default_simulator_whale_budgets() -> Vec<f64> {
    vec![10.0, 20.0, 50.0, 100.0, 200.0, 500.0]
}

fn default_sample_points() -> usize {
    100
}

fn default_migration_threshold_sol() -> f64 {
    85.0
}

fn default_chart_path() -> String {
    "bonding_curve_comparison.png".to_string()
}

fn default_sol_price_usd() -> f64 {
    200.0
}

fn default_launch_virtual_sol() -> f64 {
    200.0
}

fn default_launch_presets() -> Vec<LaunchPreset> {
    vec![
        LaunchPreset::new("Micro Launch", 4_600.0, "2-6 hours", "Fast viral launch"),
        LaunchPreset::new("Small Launch", 10_000.0, "6-12 hours", "Active trading day"),
        LaunchPreset::new("Medium Launch", 25_000.0, "1-2 days", "Steady growth"),
        LaunchPreset::new("Large Launch", 50_000.0, "2-4 days", "Serious project timeline"),
        LaunchPreset::new("Premium Launch", 100_000.0, "4-7 days", "Major launch event"),
    ]
}

fn default_launch_whale_budgets() -> Vec<f64> {
    vec![10.0, 20.0, 50.0, 100.0, 200.0]
}

fn default_funding_goals() -> Vec<FundingGoal> {
    vec![
        FundingGoal::new("Raise 85 SOL (migration threshold)", 85.0, 0.50),
        FundingGoal::new("Raise 50 SOL (small project)", 50.0, 0.50),
        FundingGoal::new("Raise 150 SOL (large project)", 150.0, 0.50),
        FundingGoal::new("Raise 85 SOL, sell only 30%", 85.0, 0.30),
    ]
}

fn default_sensitivity_market_cap_usd() -> f64 {
    25_000.0
}

fn default_sensitivity_sol_prices() -> Vec<f64> {
    vec![100.0, 150.0, 200.0, 250.0, 300.0]
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            presets: default_presets(),
            scenarios: default_scenarios(),
            buyers: default_buyers(),
            whale_budgets: default_simulator_whale_budgets(),
            sample_points: default_sample_points(),
            migration_threshold_sol: default_migration_threshold_sol(),
            chart_path: default_chart_path(),
        }
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            sol_price_usd: default_sol_price_usd(),
            virtual_sol: default_launch_virtual_sol(),
            presets: default_launch_presets(),
            whale_budgets: default_launch_whale_budgets(),
            funding_goals: default_funding_goals(),
            sensitivity_market_cap_usd: default_sensitivity_market_cap_usd(),
            sensitivity_sol_prices: default_sensitivity_sol_prices(),
        }
    }
}

impl Default for FundlyConfig {
    fn default() -> Self {
        Self {
            total_supply: default_total_supply(),
            checkpoints: default_checkpoints(),
            simulator: SimulatorConfig::default(),
            launch: LaunchConfig::default(),
        }
    }
}

fn check_positive(name: &str, value: f64) -> CurveResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CurveError::InvalidParameters(format!(
            "{} must be positive (got {})",
            name, value
        )));
    }
    Ok(())
}

impl FundlyConfig {
    /// Checks every preset and knob so reports never start on a bad curve.
    pub fn validate(&self) -> CurveResult<()> {
        check_positive("total_supply", self.total_supply)?;
        // A full-supply checkpoint has no price once a launch preset clamps
        // its virtual tokens to zero.
        for fraction in &self.checkpoints {
            if !(*fraction > 0.0 && *fraction < 1.0) {
                return Err(CurveError::InvalidParameters(format!(
                    "checkpoint {} must be in (0, 1)",
                    fraction
                )));
            }
        }

        let sim = &self.simulator;
        for preset in sim.presets.iter().chain(sim.scenarios.iter()) {
            preset.params(self.total_supply).map_err(|e| {
                CurveError::InvalidParameters(format!("preset '{}': {}", preset.name, e))
            })?;
        }
        for buyer in &sim.buyers {
            check_amount(&buyer.name, buyer.budget_sol)?;
        }
        for budget in &sim.whale_budgets {
            check_amount("whale budget", *budget)?;
        }
        if sim.sample_points == 0 {
            return Err(CurveError::InvalidParameters(
                "sample_points must be at least 1".to_string(),
            ));
        }
        check_amount("migration_threshold_sol", sim.migration_threshold_sol)?;

        let launch = &self.launch;
        check_positive("sol_price_usd", launch.sol_price_usd)?;
        check_positive("launch virtual_sol", launch.virtual_sol)?;
        for preset in &launch.presets {
            check_positive(&preset.name, preset.market_cap_usd)?;
        }
        for budget in &launch.whale_budgets {
            check_amount("whale budget", *budget)?;
        }
        for goal in &launch.funding_goals {
            check_amount(&goal.description, goal.target_sol)?;
            if !(goal.sell_fraction > 0.0 && goal.sell_fraction <= 1.0) {
                return Err(CurveError::InvalidParameters(format!(
                    "funding goal '{}': sell_fraction must be in (0, 1]",
                    goal.description
                )));
            }
        }
        check_positive("sensitivity_market_cap_usd", launch.sensitivity_market_cap_usd)?;
        for price in &launch.sensitivity_sol_prices {
            check_positive("sensitivity SOL price", *price)?;
        }
        Ok(())
    }
}
