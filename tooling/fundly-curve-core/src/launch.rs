//! Launch sizing from a USD market cap target.

use serde::Serialize;
use tracing::debug;

use crate::curve::{cost_to_buy, solve_virtual_tokens, CurveParameters};
use crate::{CurveError, CurveResult};

/// How hard a checkpoint is to reach, by SOL cost.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CostTier {
    /// Under 10 SOL.
    Fast,
    /// Under 50 SOL.
    Good,
    /// Under 100 SOL.
    Balanced,
    Expensive,
}

impl CostTier {
    pub fn classify(sol_cost: f64) -> Self {
        if sol_cost < 10.0 {
            CostTier::Fast
        } else if sol_cost < 50.0 {
            CostTier::Good
        } else if sol_cost < 100.0 {
            CostTier::Balanced
        } else {
            CostTier::Expensive
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            CostTier::Fast => "⚡",
            CostTier::Good => "✓",
            CostTier::Balanced => "◆",
            CostTier::Expensive => "◉",
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct SupplyCost {
    /// Fraction of supply bought, 0-1.
    pub fraction: f64,
    pub sol_cost: f64,
    pub tier: CostTier,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MarketCapAnalysis {
    pub market_cap_usd: f64,
    pub market_cap_sol: f64,
    pub virtual_sol: f64,
    pub virtual_tokens: f64,
    pub initial_price_sol: f64,
    pub total_supply: f64,
    pub costs: Vec<SupplyCost>,
}

impl MarketCapAnalysis {
    pub fn params(&self) -> CurveResult<CurveParameters> {
        CurveParameters::new(self.virtual_sol, self.virtual_tokens, self.total_supply)
    }
}

pub fn analyze_market_cap(
    market_cap_usd: f64,
    sol_price_usd: f64,
    virtual_sol: f64,
    total_supply: f64,
    checkpoints: &[f64],
) -> CurveResult<MarketCapAnalysis> {
    if !sol_price_usd.is_finite() || sol_price_usd <= 0.0 {
        return Err(CurveError::InvalidMarketCap(format!(
            "SOL price must be positive (got ${})",
            sol_price_usd
        )));
    }
    let market_cap_sol = market_cap_usd / sol_price_usd;
    let virtual_tokens = solve_virtual_tokens(market_cap_sol, virtual_sol, total_supply)?;
    let params = CurveParameters::new(virtual_sol, virtual_tokens, total_supply)?;

    let costs = checkpoints
        .iter()
        .map(|&fraction| {
            let sol_cost = cost_to_buy(&params, total_supply * fraction)?;
            Ok(SupplyCost {
                fraction,
                sol_cost,
                tier: CostTier::classify(sol_cost),
            })
        })
        .collect::<CurveResult<Vec<_>>>()?;

    debug!(market_cap_usd, market_cap_sol, virtual_tokens, "analyzed market cap");

    Ok(MarketCapAnalysis {
        market_cap_usd,
        market_cap_sol,
        virtual_sol,
        virtual_tokens,
        // The target price, not the curve's: the two differ once the solve clamps.
        initial_price_sol: market_cap_sol / total_supply,
        total_supply,
        costs,
    })
}

/// Rough market cap needed to raise `target_sol` by the time
/// `sell_fraction` of supply is sold. A rule of thumb (twice the naive
/// linear estimate), not a solve against the curve.
pub fn implied_market_cap_usd(
    target_sol: f64,
    sell_fraction: f64,
    sol_price_usd: f64,
) -> CurveResult<f64> {
    if !(sell_fraction > 0.0 && sell_fraction <= 1.0) {
        return Err(CurveError::InvalidAmount(format!(
            "sell fraction {} must be in (0, 1]",
            sell_fraction
        )));
    }
    crate::check_amount("target_sol", target_sol)?;
    Ok(target_sol / sell_fraction * 2.0 * sol_price_usd)
}

/// How the launch configuration for a fixed USD cap moves with the SOL price.
pub fn sol_price_sensitivity(
    market_cap_usd: f64,
    sol_prices: &[f64],
    virtual_sol: f64,
    total_supply: f64,
) -> CurveResult<Vec<(f64, MarketCapAnalysis)>> {
    sol_prices
        .iter()
        .map(|&price| {
            let analysis = analyze_market_cap(market_cap_usd, price, virtual_sol, total_supply, &[])?;
            Ok((price, analysis))
        })
        .collect()
}
