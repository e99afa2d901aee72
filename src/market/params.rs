//! Market input parameters and boundary clamping.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// The five scalar inputs of one pricing snapshot.
///
/// The pricer applies no validation: out-of-range values simply produce
/// extrapolated output. Boundary layers call [`MarketParameters::clamped`]
/// before pricing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParameters {
    /// System demand (MW).
    pub demand: f64,
    /// Transmission capacity of the constrained path (MW).
    pub transmission_capacity: f64,
    /// Generator availability (percent, 0-100).
    pub availability_pct: f64,
    /// Hour of day (0-23).
    pub hour_of_day: u8,
    /// Weather stress level (1 = normal, 5 = extreme).
    pub weather_level: u8,
}

impl Default for MarketParameters {
    fn default() -> Self {
        Self {
            demand: 200.0,
            transmission_capacity: 120.0,
            availability_pct: 100.0,
            hour_of_day: 18,
            weather_level: 1,
        }
    }
}

impl MarketParameters {
    /// Returns a copy with every field clamped into `bounds`.
    ///
    /// Non-finite continuous values are replaced by the range minimum.
    pub fn clamped(&self, bounds: &ParameterBounds) -> Self {
        Self {
            demand: clamp_f64(self.demand, &bounds.demand),
            transmission_capacity: clamp_f64(
                self.transmission_capacity,
                &bounds.transmission_capacity,
            ),
            availability_pct: clamp_f64(self.availability_pct, &bounds.availability_pct),
            hour_of_day: self
                .hour_of_day
                .clamp(*bounds.hour_of_day.start(), *bounds.hour_of_day.end()),
            weather_level: self
                .weather_level
                .clamp(*bounds.weather_level.start(), *bounds.weather_level.end()),
        }
    }
}

fn clamp_f64(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        *range.start()
    }
}

/// Inclusive admissible range for each market parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBounds {
    pub demand: RangeInclusive<f64>,
    pub transmission_capacity: RangeInclusive<f64>,
    pub availability_pct: RangeInclusive<f64>,
    pub hour_of_day: RangeInclusive<u8>,
    pub weather_level: RangeInclusive<u8>,
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self {
            demand: 150.0..=300.0,
            transmission_capacity: 80.0..=200.0,
            availability_pct: 60.0..=100.0,
            hour_of_day: 0..=23,
            weather_level: 1..=5,
        }
    }
}
