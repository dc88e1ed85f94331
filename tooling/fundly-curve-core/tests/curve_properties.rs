use fundly_curve_core::{
    cost_to_buy, simulate_buyers, solve_virtual_tokens, spot_price, whale_share_pct, Buyer,
    CurveParameters,
};
use proptest::prelude::*;

const SUPPLY: f64 = 1_000_000_000.0;

// ── Property-based tests for the pricing formula ────────────────────────────────

proptest! {
    /// Property: buying more always costs more
    #[test]
    fn prop_cost_monotonic(
        virtual_sol in 1.0f64..1_000.0,
        virtual_tokens in 100_000_000.0f64..2_000_000_000.0,
        supply in 100_000_000.0f64..2_000_000_000.0,
        small in 0.0f64..0.9,
        gap in 0.001f64..0.1,
    ) {
        let params = CurveParameters::new(virtual_sol, virtual_tokens, supply).unwrap();
        let a = cost_to_buy(&params, supply * small).unwrap();
        let b = cost_to_buy(&params, supply * (small + gap)).unwrap();
        prop_assert!(b > a);
    }

    /// Property: nothing bought, nothing paid
    #[test]
    fn prop_zero_buy_is_free(
        virtual_sol in 0.001f64..10_000.0,
        virtual_tokens in 0.0f64..1e12,
        supply in 1.0f64..1e12,
    ) {
        let params = CurveParameters::new(virtual_sol, virtual_tokens, supply).unwrap();
        prop_assert_eq!(cost_to_buy(&params, 0.0).unwrap(), 0.0);
    }

    /// Property: cost is never negative anywhere on the curve
    #[test]
    fn prop_cost_non_negative(
        virtual_sol in 1.0f64..1_000.0,
        virtual_tokens in 1.0f64..2_000_000_000.0,
        fraction in 0.0f64..=1.0,
    ) {
        let params = CurveParameters::new(virtual_sol, virtual_tokens, SUPPLY).unwrap();
        // Rounding can leave a hair below zero for vanishingly small buys.
        prop_assert!(cost_to_buy(&params, SUPPLY * fraction).unwrap() >= -1e-9);
    }

    /// Property: the solved curve starts at the target price
    #[test]
    fn prop_solve_reproduces_initial_price(
        virtual_sol in 10.0f64..1_000.0,
        // Keep the cap below virtual_sol so the solve isn't clamped.
        cap_ratio in 0.05f64..0.95,
    ) {
        let market_cap_sol = virtual_sol * cap_ratio;
        let vt = solve_virtual_tokens(market_cap_sol, virtual_sol, SUPPLY).unwrap();
        let params = CurveParameters::new(virtual_sol, vt, SUPPLY).unwrap();
        let target = market_cap_sol / SUPPLY;
        let price = spot_price(&params, 0.0).unwrap();
        prop_assert!(((price - target) / target).abs() < 1e-9);
    }

    /// Property: the solver never returns negative virtual tokens
    #[test]
    fn prop_solve_non_negative(
        market_cap_sol in 0.01f64..100_000.0,
        virtual_sol in 0.01f64..10_000.0,
    ) {
        let vt = solve_virtual_tokens(market_cap_sol, virtual_sol, SUPPLY).unwrap();
        prop_assert!(vt >= 0.0);
    }
}

// ── Property-based tests for whales and sequential buyers ──────────────────────

proptest! {
    /// Property: whale share stays within 0-100% and grows with the budget
    #[test]
    fn prop_whale_share_bounded_and_monotonic(
        virtual_sol in 10.0f64..1_000.0,
        virtual_tokens in 0.0f64..2_000_000_000.0,
        budget in 0.1f64..500.0,
        extra in 1.0f64..500.0,
    ) {
        let params = CurveParameters::new(virtual_sol, virtual_tokens, SUPPLY).unwrap();
        let small = whale_share_pct(&params, budget).unwrap();
        let large = whale_share_pct(&params, budget + extra).unwrap();
        prop_assert!((0.0..=100.0).contains(&small));
        prop_assert!((0.0..=100.0).contains(&large));
        prop_assert!(large >= small);
    }

    /// Property: tokens sold plus tokens remaining equals the supply
    #[test]
    fn prop_buyers_conserve_supply(
        virtual_sol in 10.0f64..1_000.0,
        virtual_tokens in 100_000_000.0f64..2_000_000_000.0,
        budgets in proptest::collection::vec(0.0f64..200.0, 1..8),
    ) {
        let params = CurveParameters::new(virtual_sol, virtual_tokens, SUPPLY).unwrap();
        let buyers: Vec<Buyer> = budgets
            .iter()
            .enumerate()
            .map(|(i, &budget_sol)| Buyer { name: format!("buyer {}", i), budget_sol })
            .collect();
        let run = simulate_buyers("prop", params, &buyers).unwrap();
        let sold: f64 = run.fills.iter().map(|f| f.fill.tokens_out).sum();
        prop_assert!(run.tokens_remaining >= 0.0);
        prop_assert!((sold + run.tokens_remaining - SUPPLY).abs() < 1.0);
        let spent: f64 = run.fills.iter().map(|f| f.fill.sol_in).sum();
        prop_assert!(spent <= budgets.iter().sum::<f64>() + 1e-9);
    }
}
