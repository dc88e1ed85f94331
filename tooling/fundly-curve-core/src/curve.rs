//! Constant-product bonding curve: `k = virtual_sol * (virtual_tokens + real_token_supply)`.
//!
//! Prices are in SOL per token, amounts in whole tokens and SOL. Nothing here
//! holds state; every function prices one hypothetical buy against a fresh
//! curve.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::simulation::CurveState;
use crate::{check_amount, CurveError, CurveResult};

/// One bonding curve instance.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct CurveParameters {
    pub virtual_sol: f64,
    pub virtual_tokens: f64,
    pub real_token_supply: f64,
}

impl CurveParameters {
    pub fn new(virtual_sol: f64, virtual_tokens: f64, real_token_supply: f64) -> CurveResult<Self> {
        let params = Self {
            virtual_sol,
            virtual_tokens,
            real_token_supply,
        };
        params.validate()?;
        Ok(params)
    }

    /// `virtual_sol` and `real_token_supply` must be positive; `virtual_tokens`
    /// may be zero (the market cap solver clamps there).
    pub fn validate(&self) -> CurveResult<()> {
        if !self.virtual_sol.is_finite() || self.virtual_sol <= 0.0 {
            return Err(CurveError::InvalidParameters(format!(
                "virtual_sol must be positive (got {})",
                self.virtual_sol
            )));
        }
        if !self.virtual_tokens.is_finite() || self.virtual_tokens < 0.0 {
            return Err(CurveError::InvalidParameters(format!(
                "virtual_tokens must be non-negative (got {})",
                self.virtual_tokens
            )));
        }
        if !self.real_token_supply.is_finite() || self.real_token_supply <= 0.0 {
            return Err(CurveError::InvalidParameters(format!(
                "real_token_supply must be positive (got {})",
                self.real_token_supply
            )));
        }
        Ok(())
    }

    /// The constant-product invariant.
    pub fn k(&self) -> f64 {
        self.virtual_sol * (self.virtual_tokens + self.real_token_supply)
    }

    /// Spot price before anything is sold.
    pub fn initial_price(&self) -> f64 {
        self.virtual_sol / (self.virtual_tokens + self.real_token_supply)
    }
}

/// A sample of the price curve after `tokens_bought` have left the curve.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub tokens_bought: f64,
    pub sol_spent: f64,
    pub price: f64,
}

/// Token reserve left after selling `tokens_to_buy`, or the reason it can't be.
fn token_reserve_after(params: &CurveParameters, tokens_to_buy: f64) -> CurveResult<f64> {
    check_amount("tokens_to_buy", tokens_to_buy)?;
    if tokens_to_buy > params.real_token_supply {
        return Err(CurveError::ExceedsSupply {
            requested: tokens_to_buy,
            available: params.real_token_supply,
        });
    }
    let reserve = params.virtual_tokens + (params.real_token_supply - tokens_to_buy);
    if reserve <= 0.0 {
        return Err(CurveError::SupplyExhausted);
    }
    Ok(reserve)
}

/// SOL needed to buy `tokens_to_buy` from a fresh curve.
pub fn cost_to_buy(params: &CurveParameters, tokens_to_buy: f64) -> CurveResult<f64> {
    params.validate()?;
    let reserve = token_reserve_after(params, tokens_to_buy)?;
    if tokens_to_buy == 0.0 {
        return Ok(0.0);
    }
    let new_sol = params.k() / reserve;
    Ok(new_sol - params.virtual_sol)
}

/// Marginal price once `tokens_sold` have been bought.
pub fn spot_price(params: &CurveParameters, tokens_sold: f64) -> CurveResult<f64> {
    let sol_spent = cost_to_buy(params, tokens_sold)?;
    let reserve = token_reserve_after(params, tokens_sold)?;
    Ok((params.virtual_sol + sol_spent) / reserve)
}

/// Virtual token reserve that makes the initial price equal
/// `target_market_cap_sol / supply`. Clamped at zero: above
/// `virtual_sol` market cap no amount of virtual tokens can lower the
/// starting price far enough.
pub fn solve_virtual_tokens(
    target_market_cap_sol: f64,
    virtual_sol: f64,
    supply: f64,
) -> CurveResult<f64> {
    if !target_market_cap_sol.is_finite() || target_market_cap_sol <= 0.0 {
        return Err(CurveError::InvalidMarketCap(format!(
            "target market cap must be positive (got {} SOL)",
            target_market_cap_sol
        )));
    }
    // Validates virtual_sol and supply; virtual_tokens is what we're solving for.
    CurveParameters::new(virtual_sol, 0.0, supply)?;

    let initial_price = target_market_cap_sol / supply;
    let virtual_tokens = virtual_sol / initial_price - supply;
    if virtual_tokens < 0.0 {
        debug!(
            target_market_cap_sol,
            virtual_sol, virtual_tokens, "virtual token solve clamped to zero"
        );
        return Ok(0.0);
    }
    debug!(target_market_cap_sol, virtual_sol, virtual_tokens, "solved virtual tokens");
    Ok(virtual_tokens)
}

/// Tokens a single buyer gets for `sol_budget` on a fresh curve, capped at
/// the real supply.
pub fn tokens_for_sol(params: &CurveParameters, sol_budget: f64) -> CurveResult<f64> {
    let (fill, _) = CurveState::fresh(*params)?.buy_with_sol(sol_budget)?;
    Ok(fill.tokens_out)
}

/// Share of the real supply (0-100) a whale takes with `sol_budget`.
pub fn whale_share_pct(params: &CurveParameters, sol_budget: f64) -> CurveResult<f64> {
    Ok(tokens_for_sol(params, sol_budget)? / params.real_token_supply * 100.0)
}

/// Samples the curve at `num_points` evenly spaced buy sizes, ending at the
/// full supply.
pub fn price_curve(params: &CurveParameters, num_points: usize) -> CurveResult<Vec<CurvePoint>> {
    if num_points == 0 {
        return Err(CurveError::InvalidAmount(
            "price curve needs at least one point".to_string(),
        ));
    }
    let increment = params.real_token_supply / num_points as f64;
    (1..=num_points)
        .map(|i| {
            // Last sample lands on the supply exactly, not a rounding hair above it.
            let tokens_bought = if i == num_points {
                params.real_token_supply
            } else {
                increment * i as f64
            };
            let sol_spent = cost_to_buy(params, tokens_bought)?;
            let price = spot_price(params, tokens_bought)?;
            Ok(CurvePoint {
                tokens_bought,
                sol_spent,
                price,
            })
        })
        .collect()
}

/// `(percentage, SOL cost)` for each percentage of supply in `percentages`.
pub fn cost_curve(params: &CurveParameters, percentages: &[f64]) -> CurveResult<Vec<(f64, f64)>> {
    percentages
        .iter()
        .map(|&pct| {
            if !(0.0..=100.0).contains(&pct) {
                return Err(CurveError::InvalidAmount(format!(
                    "percentage {} outside 0-100",
                    pct
                )));
            }
            let cost = cost_to_buy(params, params.real_token_supply * pct / 100.0)?;
            Ok((pct, cost))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPLY: f64 = 1_000_000_000.0;

    fn current() -> CurveParameters {
        CurveParameters::new(30.0, 1_000_000_000.0, SUPPLY).unwrap()
    }

    #[test]
    fn test_cost_of_ten_percent_on_current_curve() {
        // k = 30 * 2e9; k / 1.9e9 - 30
        let cost = cost_to_buy(&current(), 100_000_000.0).unwrap();
        assert!((cost - (6e10 / 1.9e9 - 30.0)).abs() < 1e-9);
        assert!((cost - 1.578_947_368).abs() < 1e-6);
    }

    #[test]
    fn test_cost_of_nothing_is_zero() {
        assert_eq!(cost_to_buy(&current(), 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_buying_whole_supply_with_virtual_tokens() {
        // Reserve drops to the virtual tokens only: k / 1e9 - 30 = 30
        let cost = cost_to_buy(&current(), SUPPLY).unwrap();
        assert!((cost - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_whole_supply_without_virtual_tokens_is_exhausted() {
        let params = CurveParameters::new(200.0, 0.0, SUPPLY).unwrap();
        assert_eq!(cost_to_buy(&params, SUPPLY), Err(CurveError::SupplyExhausted));
        assert_eq!(spot_price(&params, SUPPLY), Err(CurveError::SupplyExhausted));
    }

    #[test]
    fn test_buying_more_than_supply_fails() {
        let err = cost_to_buy(&current(), SUPPLY + 1.0).unwrap_err();
        assert!(matches!(err, CurveError::ExceedsSupply { .. }));
    }

    #[test]
    fn test_negative_and_nan_amounts_rejected() {
        assert!(matches!(
            cost_to_buy(&current(), -1.0),
            Err(CurveError::InvalidAmount(_))
        ));
        assert!(matches!(
            cost_to_buy(&current(), f64::NAN),
            Err(CurveError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(CurveParameters::new(0.0, 1.0, 1.0).is_err());
        assert!(CurveParameters::new(1.0, -1.0, 1.0).is_err());
        assert!(CurveParameters::new(1.0, 1.0, 0.0).is_err());
        assert!(CurveParameters::new(f64::INFINITY, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_spot_price_starts_at_initial_price() {
        let params = current();
        let price = spot_price(&params, 0.0).unwrap();
        assert!((price - 30.0 / 2e9).abs() < 1e-20);
        assert_eq!(price, params.initial_price());
    }

    #[test]
    fn test_spot_price_rises_as_supply_sells() {
        let params = current();
        let early = spot_price(&params, 100_000_000.0).unwrap();
        let late = spot_price(&params, 900_000_000.0).unwrap();
        assert!(late > early);
    }

    #[test]
    fn test_solve_virtual_tokens_medium_launch() {
        // $25k at $200/SOL = 125 SOL; 200 / 1.25e-7 - 1e9 = 6e8
        let vt = solve_virtual_tokens(125.0, 200.0, SUPPLY).unwrap();
        assert!((vt - 600_000_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_solve_virtual_tokens_clamps_at_zero() {
        // $50k = 250 SOL > 200 virtual SOL
        assert_eq!(solve_virtual_tokens(250.0, 200.0, SUPPLY).unwrap(), 0.0);
    }

    #[test]
    fn test_solve_virtual_tokens_rejects_zero_market_cap() {
        assert!(matches!(
            solve_virtual_tokens(0.0, 200.0, SUPPLY),
            Err(CurveError::InvalidMarketCap(_))
        ));
    }

    #[test]
    fn test_whale_share_is_capped_at_full_supply() {
        // Uncapped this would be ~188.7% of supply.
        let pct = whale_share_pct(&current(), 500.0).unwrap();
        assert_eq!(pct, 100.0);
    }

    #[test]
    fn test_whale_share_on_optimized_curve() {
        let params = CurveParameters::new(200.0, 600_000_000.0, SUPPLY).unwrap();
        // 1.6e9 - 200 * 1.6e9 / 300
        let pct = whale_share_pct(&params, 100.0).unwrap();
        assert!((pct - 53.333_333).abs() < 1e-4);
    }

    #[test]
    fn test_price_curve_ends_at_full_supply() {
        let points = price_curve(&current(), 100).unwrap();
        assert_eq!(points.len(), 100);
        assert_eq!(points[99].tokens_bought, SUPPLY);
        assert!(points.windows(2).all(|w| w[1].price > w[0].price));
    }

    #[test]
    fn test_price_curve_requires_points() {
        assert!(price_curve(&current(), 0).is_err());
    }

    #[test]
    fn test_cost_curve_rejects_out_of_range_percentage() {
        assert!(cost_curve(&current(), &[50.0, 101.0]).is_err());
        let costs = cost_curve(&current(), &[0.0, 50.0]).unwrap();
        assert_eq!(costs[0], (0.0, 0.0));
        assert!(costs[1].1 > 0.0);
    }
}
