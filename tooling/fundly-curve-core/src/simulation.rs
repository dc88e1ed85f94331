//! Sequential buys against a live curve, and whale-share tables.

use serde::Serialize;
use tracing::debug;

use crate::curve::{whale_share_pct, CurveParameters};
use crate::{check_amount, Buyer, CurveResult};

/// A curve after some SOL has been paid in and some supply has left.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct CurveState {
    pub params: CurveParameters,
    pub sol_collected: f64,
    pub tokens_remaining: f64,
}

/// Outcome of one buy with a SOL budget.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct Fill {
    /// SOL actually spent. Below the budget only when the curve sells out.
    pub sol_in: f64,
    pub tokens_out: f64,
    /// `tokens_out` as a percentage of the real supply.
    pub supply_pct: f64,
    pub average_price: f64,
}

impl CurveState {
    pub fn fresh(params: CurveParameters) -> CurveResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            sol_collected: 0.0,
            tokens_remaining: params.real_token_supply,
        })
    }

    pub fn sol_reserve(&self) -> f64 {
        self.params.virtual_sol + self.sol_collected
    }

    pub fn token_reserve(&self) -> f64 {
        self.params.virtual_tokens + self.tokens_remaining
    }

    pub fn remaining_pct(&self) -> f64 {
        self.tokens_remaining / self.params.real_token_supply * 100.0
    }

    /// Spends `budget` SOL on the curve and returns the fill together with the
    /// resulting state. The buyer never receives more than what remains; if the
    /// budget would overshoot, only the SOL needed to empty the curve is taken.
    pub fn buy_with_sol(&self, budget: f64) -> CurveResult<(Fill, CurveState)> {
        check_amount("budget", budget)?;
        if self.tokens_remaining <= 0.0 {
            debug!(budget, "curve already sold out");
            let fill = Fill {
                sol_in: 0.0,
                tokens_out: 0.0,
                supply_pct: 0.0,
                average_price: 0.0,
            };
            return Ok((fill, *self));
        }

        let sol_reserve = self.sol_reserve();
        let token_reserve = self.token_reserve();
        let k = sol_reserve * token_reserve;
        let new_token_reserve = k / (sol_reserve + budget);
        let uncapped = (token_reserve - new_token_reserve).max(0.0);

        let (tokens_out, sol_in) = if uncapped > self.tokens_remaining {
            // Only reachable with virtual tokens > 0, so the division is safe.
            let sol_to_empty = (k / self.params.virtual_tokens - sol_reserve).max(0.0);
            debug!(budget, sol_to_empty, "buy sells out the curve");
            (self.tokens_remaining, sol_to_empty)
        } else {
            (uncapped, budget)
        };

        let fill = Fill {
            sol_in,
            tokens_out,
            supply_pct: tokens_out / self.params.real_token_supply * 100.0,
            average_price: if tokens_out > 0.0 { sol_in / tokens_out } else { 0.0 },
        };
        let next = CurveState {
            params: self.params,
            sol_collected: self.sol_collected + sol_in,
            tokens_remaining: self.tokens_remaining - tokens_out,
        };
        Ok((fill, next))
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct BuyerFill {
    pub buyer: String,
    pub budget_sol: f64,
    pub fill: Fill,
}

/// Buyers hitting one curve in order.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TradingRun {
    pub curve: String,
    pub fills: Vec<BuyerFill>,
    pub total_sol_collected: f64,
    pub tokens_remaining: f64,
    pub remaining_pct: f64,
}

pub fn simulate_buyers(
    curve_name: &str,
    params: CurveParameters,
    buyers: &[Buyer],
) -> CurveResult<TradingRun> {
    let mut state = CurveState::fresh(params)?;
    let mut fills = Vec::with_capacity(buyers.len());

    for buyer in buyers {
        let (fill, next) = state.buy_with_sol(buyer.budget_sol)?;
        debug!(
            curve = curve_name,
            buyer = %buyer.name,
            tokens_out = fill.tokens_out,
            "buyer filled"
        );
        fills.push(BuyerFill {
            buyer: buyer.name.clone(),
            budget_sol: buyer.budget_sol,
            fill,
        });
        state = next;
    }

    Ok(TradingRun {
        curve: curve_name.to_string(),
        fills,
        total_sol_collected: state.sol_collected,
        tokens_remaining: state.tokens_remaining,
        remaining_pct: state.remaining_pct(),
    })
}

/// Whale share of supply for one budget, one entry per compared curve.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct WhaleRow {
    pub budget_sol: f64,
    pub shares_pct: Vec<f64>,
}

pub fn whale_table(curves: &[CurveParameters], budgets: &[f64]) -> CurveResult<Vec<WhaleRow>> {
    budgets
        .iter()
        .map(|&budget_sol| {
            let shares_pct = curves
                .iter()
                .map(|params| whale_share_pct(params, budget_sol))
                .collect::<CurveResult<Vec<_>>>()?;
            Ok(WhaleRow {
                budget_sol,
                shares_pct,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPLY: f64 = 1_000_000_000.0;

    fn buyers() -> Vec<Buyer> {
        [0.5, 2.0, 5.0, 20.0, 100.0]
            .iter()
            .map(|&budget_sol| Buyer {
                name: format!("{} SOL", budget_sol),
                budget_sol,
            })
            .collect()
    }

    #[test]
    fn test_fresh_state_has_full_supply() {
        let params = CurveParameters::new(30.0, 1e9, SUPPLY).unwrap();
        let state = CurveState::fresh(params).unwrap();
        assert_eq!(state.tokens_remaining, SUPPLY);
        assert_eq!(state.sol_collected, 0.0);
        assert_eq!(state.remaining_pct(), 100.0);
    }

    #[test]
    fn test_buy_keeps_constant_product() {
        let params = CurveParameters::new(200.0, 6e8, SUPPLY).unwrap();
        let state = CurveState::fresh(params).unwrap();
        let (_, next) = state.buy_with_sol(20.0).unwrap();
        let k_before = state.sol_reserve() * state.token_reserve();
        let k_after = next.sol_reserve() * next.token_reserve();
        assert!((k_after - k_before).abs() / k_before < 1e-12);
    }

    #[test]
    fn test_zero_budget_buys_nothing() {
        let params = CurveParameters::new(30.0, 1e9, SUPPLY).unwrap();
        let (fill, next) = CurveState::fresh(params).unwrap().buy_with_sol(0.0).unwrap();
        assert_eq!(fill.tokens_out, 0.0);
        assert_eq!(fill.average_price, 0.0);
        assert_eq!(next.tokens_remaining, SUPPLY);
    }

    #[test]
    fn test_sell_out_refunds_excess_budget() {
        let params = CurveParameters::new(30.0, 1e9, SUPPLY).unwrap();
        let (fill, next) = CurveState::fresh(params).unwrap().buy_with_sol(1_000.0).unwrap();
        assert_eq!(fill.tokens_out, SUPPLY);
        // k / vt - vsol = 6e10 / 1e9 - 30
        assert!((fill.sol_in - 30.0).abs() < 1e-9);
        assert_eq!(next.tokens_remaining, 0.0);
    }

    #[test]
    fn test_buy_after_sell_out_is_free_and_empty() {
        for vsol in [17.0, 30.0, 73.3, 200.0, 311.7] {
            for vt in [1.0, 3.3e8, 6e8, 1e9, 2.7e9] {
                let params = CurveParameters::new(vsol, vt, SUPPLY).unwrap();
                let (_, sold_out) = CurveState::fresh(params)
                    .unwrap()
                    .buy_with_sol(1e15)
                    .unwrap();
                assert_eq!(sold_out.tokens_remaining, 0.0);

                let (fill, after) = sold_out.buy_with_sol(5.0).unwrap();
                assert_eq!(fill.sol_in, 0.0);
                assert_eq!(fill.tokens_out, 0.0);
                assert_eq!(after, sold_out);
            }
        }
    }

    #[test]
    fn test_sequential_buyers_conserve_supply() {
        let params = CurveParameters::new(30.0, 1e9, SUPPLY).unwrap();
        let run = simulate_buyers("Current", params, &buyers()).unwrap();
        let sold: f64 = run.fills.iter().map(|f| f.fill.tokens_out).sum();
        assert!((sold + run.tokens_remaining - SUPPLY).abs() < 1e-3);
        assert_eq!(run.fills.len(), 5);
        // The 100 SOL whale empties the curve after 2.5 SOL.
        assert_eq!(run.tokens_remaining, 0.0);
        assert!((run.total_sol_collected - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_later_buyers_pay_more_per_token() {
        let params = CurveParameters::new(200.0, 6e8, SUPPLY).unwrap();
        let run = simulate_buyers("Optimized", params, &buyers()).unwrap();
        let prices: Vec<f64> = run.fills.iter().map(|f| f.fill.average_price).collect();
        assert!(prices.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_whale_table_shape() {
        let curves = vec![
            CurveParameters::new(30.0, 1e9, SUPPLY).unwrap(),
            CurveParameters::new(200.0, 6e8, SUPPLY).unwrap(),
        ];
        let rows = whale_table(&curves, &[10.0, 100.0]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].shares_pct.len(), 2);
        // The optimized curve is more whale resistant.
        assert!(rows[1].shares_pct[1] < rows[1].shares_pct[0]);
    }
}
