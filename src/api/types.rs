//! API query and response types.

use serde::{Deserialize, Serialize};

use crate::config::{SliderSet, to_u8};
use crate::market::insights::Insight;
use crate::market::params::MarketParameters;
use crate::market::pricer::DispatchResult;

/// Query parameters for `GET /price`. Missing values use slider initials.
#[derive(Debug, Default, Deserialize)]
pub struct PriceQuery {
    pub demand: Option<f64>,
    pub transmission: Option<f64>,
    pub availability: Option<f64>,
    pub hour: Option<f64>,
    pub weather: Option<f64>,
}

impl PriceQuery {
    /// Fills missing values from `sliders` and clamps into the slider ranges.
    pub fn to_parameters(&self, sliders: &SliderSet) -> MarketParameters {
        let initial = sliders.initial_parameters();
        let raw = MarketParameters {
            demand: self.demand.unwrap_or(initial.demand),
            transmission_capacity: self
                .transmission
                .unwrap_or(initial.transmission_capacity),
            availability_pct: self.availability.unwrap_or(initial.availability_pct),
            hour_of_day: self.hour.map_or(initial.hour_of_day, to_u8),
            weather_level: self.weather.map_or(initial.weather_level, to_u8),
        };
        raw.clamped(&sliders.bounds())
    }
}

/// Body of `GET /price`.
#[derive(Debug, Serialize)]
pub struct PriceResponse {
    /// Parameters actually priced, after defaults and clamping.
    pub inputs: MarketParameters,
    pub result: DispatchResult,
    pub insights: Vec<Insight>,
}

/// Query parameters for `GET /sweep`. Missing values use the demand slider.
#[derive(Debug, Default, Deserialize)]
pub struct SweepQuery {
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub step: Option<f64>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_query_defaults_to_initials() {
        let params = PriceQuery::default().to_parameters(&SliderSet::default());
        assert_eq!(params, MarketParameters::default());
    }

    #[test]
    fn price_query_clamps_and_rounds() {
        let q = PriceQuery {
            demand: Some(10_000.0),
            availability: Some(0.0),
            hour: Some(19.6),
            weather: Some(7.0),
            ..PriceQuery::default()
        };
        let params = q.to_parameters(&SliderSet::default());
        assert_eq!(params.demand, 300.0);
        assert_eq!(params.availability_pct, 60.0);
        assert_eq!(params.hour_of_day, 20);
        assert_eq!(params.weather_level, 5);
        assert_eq!(params.transmission_capacity, 120.0);
    }
}
