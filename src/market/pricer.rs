//! Merit-order dispatch and shadow-price formula.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::fleet::{Fleet, TierKind, TierValues};
use super::params::MarketParameters;

/// Upper bound on the pre-stress congestion cost ($/MWh).
pub const CONGESTION_COST_CAP: f64 = 125.0;
/// Congestion cost per unit of congestion severity ($/MWh).
const CONGESTION_COST_PER_SEVERITY: f64 = 50.0;
/// Weather level at and above which prices are escalated.
pub const WEATHER_STRESS_LEVEL: u8 = 4;
/// Availability (percent) below which system lambda is escalated.
pub const AVAILABILITY_STRESS_PCT: f64 = 90.0;

/// Demand multiplier for the hour of day.
///
/// Evening peak (17-20) raises demand by 20%, solar hours (11-15) lower net
/// demand by 10%.
pub fn time_multiplier(hour_of_day: u8) -> f64 {
    match hour_of_day {
        17..=20 => 1.2,
        11..=15 => 0.9,
        _ => 1.0,
    }
}

/// Demand multiplier for the weather stress level: `0.4 + (level - 1) * 0.3`.
pub fn weather_multiplier(weather_level: u8) -> f64 {
    0.4 + (f64::from(weather_level) - 1.0) * 0.3
}

/// Rounds to the nearest integer with halves going toward positive infinity.
fn round_price(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Output of one pricing call.
///
/// Price and cost fields (and `adjusted_demand`) are rounded to whole
/// numbers; `generation_mix` and `effective_capacities` are unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Marginal price of the last dispatched unit after escalation ($/MWh).
    pub system_lambda: f64,
    /// Congestion uplift on the constrained path ($/MWh).
    pub congestion_cost: f64,
    /// LMP on the unconstrained side, equal to `system_lambda`.
    pub lmp_region1: f64,
    /// LMP behind the constraint, `system_lambda + congestion_cost`.
    pub lmp_region2: f64,
    /// Price difference between regions, equal to `congestion_cost`.
    pub price_spread: f64,
    /// `adjusted_demand * system_lambda` ($/h).
    pub total_cost: f64,
    /// Demand after time-of-day and weather multipliers (MW).
    pub adjusted_demand: f64,
    /// MW dispatched from each tier.
    pub generation_mix: TierValues,
    /// Available MW of each tier after derating.
    pub effective_capacities: TierValues,
    /// Tier whose marginal cost set the base price.
    pub price_setter: TierKind,
}

impl DispatchResult {
    /// Returns `true` when every price and cost field is finite.
    ///
    /// Only false when peaker dispatch was needed with zero effective
    /// peaker capacity.
    pub fn is_bounded(&self) -> bool {
        [
            self.system_lambda,
            self.congestion_cost,
            self.lmp_region2,
            self.total_cost,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

impl fmt::Display for DispatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lambda={} $/MWh  congestion={} $/MWh | lmp1={}  lmp2={}  spread={} | \
             demand={} MW (coal={:.1}, gas={:.1}, peaker={:.1}) | cost={} $/h",
            self.system_lambda,
            self.congestion_cost,
            self.lmp_region1,
            self.lmp_region2,
            self.price_spread,
            self.adjusted_demand,
            self.generation_mix.coal,
            self.generation_mix.gas,
            self.generation_mix.peaker,
            self.total_cost,
        )
    }
}

/// Stateless single-snapshot economic dispatch pricer.
///
/// # Examples
///
/// ```
/// use shadow_price::market::params::MarketParameters;
/// use shadow_price::market::pricer::DispatchPricer;
///
/// let result = DispatchPricer::default().price(&MarketParameters::default());
/// assert_eq!(result.system_lambda, 25.0);
/// assert_eq!(result.total_cost, 2400.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DispatchPricer {
    fleet: Fleet,
}

impl DispatchPricer {
    /// Creates a pricer over the given fleet.
    pub fn new(fleet: Fleet) -> Self {
        Self { fleet }
    }

    /// Returns the fleet this pricer dispatches.
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Prices one market snapshot.
    ///
    /// Total over finite input. When peaker dispatch is needed and effective
    /// peaker capacity is zero, the scarcity multiplier is unbounded and the
    /// price fields become infinite (see [`DispatchResult::is_bounded`]).
    /// Negative availability is extrapolated like any other input, which
    /// can yield negative prices.
    pub fn price(&self, params: &MarketParameters) -> DispatchResult {
        let fleet = &self.fleet;
        let availability_fraction = params.availability_pct / 100.0;
        let effective = fleet.effective_capacities(availability_fraction);

        let adjusted_demand = params.demand
            * time_multiplier(params.hour_of_day)
            * weather_multiplier(params.weather_level);

        let mut mix = TierValues::default();
        let mut congestion_cost = 0.0;
        let mut system_lambda;
        let price_setter;

        if adjusted_demand <= effective.coal {
            mix.coal = adjusted_demand;
            system_lambda = fleet.coal.marginal_cost;
            price_setter = TierKind::Coal;
        } else {
            mix.coal = effective.coal;
            let remaining = adjusted_demand - effective.coal;

            // Gas sits behind the constrained path, which coal also uses.
            let gas_available = effective
                .gas
                .min(params.transmission_capacity - effective.coal);

            if remaining <= gas_available {
                mix.gas = remaining;
                system_lambda = fleet.gas.marginal_cost;
                price_setter = TierKind::Gas;
            } else {
                mix.gas = gas_available;
                system_lambda = fleet.peaker.marginal_cost;
                price_setter = TierKind::Peaker;

                if effective.gas > gas_available {
                    let severity = (remaining - gas_available) / gas_available;
                    congestion_cost =
                        CONGESTION_COST_CAP.min(severity * CONGESTION_COST_PER_SEVERITY);
                }

                let peaker_needed = remaining - gas_available;
                mix.peaker = peaker_needed.min(effective.peaker);

                if peaker_needed > effective.peaker {
                    let scarcity_multiplier = if effective.peaker == 0.0 {
                        f64::INFINITY
                    } else {
                        1.0 + (peaker_needed - effective.peaker) / effective.peaker
                    };
                    system_lambda *= scarcity_multiplier;
                }
            }
        }

        if params.weather_level >= WEATHER_STRESS_LEVEL {
            let stress = 1.0 + (f64::from(params.weather_level) - 3.0) * 1.5;
            system_lambda *= stress;
            congestion_cost *= stress;
        }

        if params.availability_pct < AVAILABILITY_STRESS_PCT {
            system_lambda *= 1.0 + (AVAILABILITY_STRESS_PCT - params.availability_pct) / 30.0;
        }

        let lmp_region1 = system_lambda;
        let lmp_region2 = system_lambda + congestion_cost;
        let price_spread = congestion_cost;
        let total_cost = adjusted_demand * system_lambda;

        DispatchResult {
            system_lambda: round_price(system_lambda),
            congestion_cost: round_price(congestion_cost),
            lmp_region1: round_price(lmp_region1),
            lmp_region2: round_price(lmp_region2),
            price_spread: round_price(price_spread),
            total_cost: round_price(total_cost),
            adjusted_demand: round_price(adjusted_demand),
            generation_mix: mix,
            effective_capacities: effective,
            price_setter,
        }
    }
}
