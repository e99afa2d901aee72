//! Property tests for the dispatch pricer over the slider ranges.

mod common;

use proptest::prelude::*;

use shadow_price::market::fleet::{Fleet, TierKind};
use shadow_price::market::pricer::{DispatchPricer, time_multiplier, weather_multiplier};

use common::params;

proptest! {
    #[test]
    fn lambda_never_decreases_with_demand(
        d1 in 0.0f64..400.0,
        d2 in 0.0f64..400.0,
        transmission in 80.0f64..200.0,
        availability in 60.0f64..100.0,
        hour in 0u8..24,
        weather in 1u8..=5,
    ) {
        let (lo, hi) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
        let pricer = DispatchPricer::default();
        let a = pricer.price(&params(lo, transmission, availability, hour, weather));
        let b = pricer.price(&params(hi, transmission, availability, hour, weather));
        prop_assert!(
            a.system_lambda <= b.system_lambda,
            "lambda fell from {} to {} as demand rose {lo} -> {hi}",
            a.system_lambda,
            b.system_lambda
        );
    }

    #[test]
    fn regional_prices_differ_by_spread(
        demand in 150.0f64..300.0,
        transmission in 80.0f64..200.0,
        availability in 60.0f64..100.0,
        hour in 0u8..24,
        weather in 1u8..=5,
    ) {
        let r = DispatchPricer::default()
            .price(&params(demand, transmission, availability, hour, weather));
        // each field is rounded on its own
        prop_assert!((r.lmp_region2 - r.lmp_region1 - r.price_spread).abs() <= 1.0);
        prop_assert_eq!(r.lmp_region1, r.system_lambda);
        prop_assert_eq!(r.price_spread, r.congestion_cost);
        prop_assert!(r.is_bounded());
    }

    #[test]
    fn effective_capacities_scale_with_availability(availability in 0.0f64..=100.0) {
        let r = DispatchPricer::default()
            .price(&params(200.0, 120.0, availability, 12, 1));
        let fraction = availability / 100.0;
        prop_assert!((r.effective_capacities.coal - 100.0 * fraction).abs() < 1e-9);
        prop_assert!((r.effective_capacities.gas - 150.0 * fraction).abs() < 1e-9);
        prop_assert!((r.effective_capacities.peaker - 50.0 * fraction).abs() < 1e-9);
    }

    #[test]
    fn coal_only_dispatch_is_uncongested(
        demand in 0.0f64..300.0,
        transmission in 80.0f64..200.0,
        availability in 90.0f64..=100.0,
        hour in 0u8..24,
        weather in 1u8..=3,
    ) {
        let adjusted = demand * time_multiplier(hour) * weather_multiplier(weather);
        prop_assume!(adjusted <= Fleet::default().effective_capacities(availability / 100.0).coal);

        let r = DispatchPricer::default()
            .price(&params(demand, transmission, availability, hour, weather));
        prop_assert_eq!(r.congestion_cost, 0.0);
        prop_assert_eq!(r.generation_mix.gas, 0.0);
        prop_assert_eq!(r.generation_mix.peaker, 0.0);
        prop_assert_eq!(r.system_lambda, 25.0);
        prop_assert_eq!(r.price_setter, TierKind::Coal);
    }

    #[test]
    fn pricing_is_idempotent(
        demand in 0.0f64..400.0,
        transmission in 0.0f64..300.0,
        availability in 1.0f64..=100.0,
        hour in 0u8..24,
        weather in 1u8..=5,
    ) {
        let pricer = DispatchPricer::default();
        let p = params(demand, transmission, availability, hour, weather);
        prop_assert_eq!(pricer.price(&p), pricer.price(&p));
    }

    #[test]
    fn dispatch_never_exceeds_available_capacity(
        demand in 150.0f64..300.0,
        transmission in 100.0f64..200.0,
        availability in 60.0f64..100.0,
        hour in 0u8..24,
        weather in 1u8..=5,
    ) {
        let r = DispatchPricer::default()
            .price(&params(demand, transmission, availability, hour, weather));
        for kind in TierKind::ALL {
            prop_assert!(r.generation_mix.get(kind) <= r.effective_capacities.get(kind) + 1e-9);
            prop_assert!(r.generation_mix.get(kind) >= 0.0);
        }
    }

    #[test]
    fn generation_mix_covers_demand_until_capacity_runs_out(
        demand in 150.0f64..300.0,
        transmission in 80.0f64..200.0,
        availability in 60.0f64..=100.0,
        hour in 0u8..24,
        weather in 1u8..=5,
    ) {
        let adjusted = demand * time_multiplier(hour) * weather_multiplier(weather);
        let effective = Fleet::default().effective_capacities(availability / 100.0);
        // gas only reaches load through what is left of the path after coal
        let gas_available = effective.gas.min(transmission - effective.coal);
        let deliverable = effective.coal + gas_available + effective.peaker;
        prop_assume!((adjusted - deliverable).abs() > 1e-6);

        let r = DispatchPricer::default()
            .price(&params(demand, transmission, availability, hour, weather));
        let served = r.generation_mix.total();
        if adjusted <= deliverable {
            prop_assert!(
                (served - adjusted).abs() < 1e-9,
                "served {served} MW of {adjusted} MW with {deliverable} MW deliverable"
            );
        } else {
            prop_assert!(served < adjusted, "served {served} MW of {adjusted} MW");
            prop_assert!((served - deliverable).abs() < 1e-9);
        }
        // the rounded result stays within half a MW of the raw figure
        prop_assert!((r.adjusted_demand - adjusted).abs() <= 0.5);
    }
}
