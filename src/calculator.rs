//! Interactive shadow-price calculator: current slider values and results.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CalculatorConfig, ConfigError, SliderKey, to_u8};
use crate::market::insights::{Insight, assess};
use crate::market::params::MarketParameters;
use crate::market::pricer::{DispatchPricer, DispatchResult};

/// Length of the random suffix of an instance id.
const INSTANCE_ID_LEN: usize = 9;

/// Partial slider update; `None` leaves a slider where it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterUpdate {
    pub demand: Option<f64>,
    pub transmission: Option<f64>,
    pub availability: Option<f64>,
    pub time: Option<f64>,
    pub weather: Option<f64>,
}

impl ParameterUpdate {
    fn get(&self, key: SliderKey) -> Option<f64> {
        match key {
            SliderKey::Demand => self.demand,
            SliderKey::Transmission => self.transmission,
            SliderKey::Availability => self.availability,
            SliderKey::Time => self.time,
            SliderKey::Weather => self.weather,
        }
    }
}

/// Point-in-time export of a calculator.
#[derive(Debug, Clone, Serialize)]
pub struct CalculatorSnapshot {
    pub timestamp: DateTime<Utc>,
    pub instance_id: String,
    pub inputs: MarketParameters,
    pub outputs: DispatchResult,
    pub insights: Vec<Insight>,
    pub config: CalculatorConfig,
}

/// Stateful calculator wrapping the stateless pricer.
///
/// Holds the current slider positions and the results priced from them.
/// Every mutation reprices immediately.
#[derive(Debug, Clone)]
pub struct Calculator {
    id: String,
    config: CalculatorConfig,
    pricer: DispatchPricer,
    values: MarketParameters,
    results: DispatchResult,
    insights: Vec<Insight>,
}

impl Calculator {
    /// Creates a calculator with a random `calc-` instance id.
    ///
    /// # Errors
    ///
    /// Returns every validation error of `config`.
    pub fn new(config: CalculatorConfig) -> Result<Self, Vec<ConfigError>> {
        Self::with_id(config, random_instance_id())
    }

    /// Creates a calculator with an explicit instance id.
    ///
    /// # Errors
    ///
    /// Returns every validation error of `config`.
    pub fn with_id(config: CalculatorConfig, id: String) -> Result<Self, Vec<ConfigError>> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        let pricer = DispatchPricer::new(config.generators);
        let values = config.sliders.initial_parameters();
        let results = pricer.price(&values);
        let insights = assess(&values, &results, pricer.fleet(), &config.weather_labels);
        Ok(Self {
            id,
            config,
            pricer,
            values,
            results,
            insights,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn pricer(&self) -> &DispatchPricer {
        &self.pricer
    }

    /// Current slider positions.
    pub fn values(&self) -> MarketParameters {
        self.values
    }

    /// Results for the current slider positions.
    pub fn results(&self) -> DispatchResult {
        self.results
    }

    pub fn insights(&self) -> &[Insight] {
        &self.insights
    }

    /// Current position of one slider.
    pub fn value(&self, key: SliderKey) -> f64 {
        match key {
            SliderKey::Demand => self.values.demand,
            SliderKey::Transmission => self.values.transmission_capacity,
            SliderKey::Availability => self.values.availability_pct,
            SliderKey::Time => f64::from(self.values.hour_of_day),
            SliderKey::Weather => f64::from(self.values.weather_level),
        }
    }

    /// Moves the provided sliders (snapped to their step and range) and reprices.
    pub fn set_values(&mut self, update: ParameterUpdate) {
        for key in SliderKey::ALL {
            if let Some(v) = update.get(key) {
                self.set_slider(key, v);
            }
        }
        self.recalculate();
    }

    /// Moves one slider by `steps` increments and reprices.
    pub fn nudge(&mut self, key: SliderKey, steps: i32) {
        let step = self.config.sliders.get(key).step;
        let target = self.value(key) + f64::from(steps) * step;
        self.set_slider(key, target);
        self.recalculate();
    }

    /// Returns every slider to its configured initial value and reprices.
    pub fn reset(&mut self) {
        self.values = self.config.sliders.initial_parameters();
        self.recalculate();
    }

    /// Exports inputs, outputs, insights and configuration.
    pub fn snapshot(&self) -> CalculatorSnapshot {
        CalculatorSnapshot {
            timestamp: Utc::now(),
            instance_id: self.id.clone(),
            inputs: self.values,
            outputs: self.results,
            insights: self.insights.clone(),
            config: self.config.clone(),
        }
    }

    fn set_slider(&mut self, key: SliderKey, value: f64) {
        let snapped = self.config.sliders.get(key).snap(value);
        match key {
            SliderKey::Demand => self.values.demand = snapped,
            SliderKey::Transmission => self.values.transmission_capacity = snapped,
            SliderKey::Availability => self.values.availability_pct = snapped,
            SliderKey::Time => self.values.hour_of_day = to_u8(snapped),
            SliderKey::Weather => self.values.weather_level = to_u8(snapped),
        }
    }

    fn recalculate(&mut self) {
        self.results = self.pricer.price(&self.values);
        self.insights = assess(
            &self.values,
            &self.results,
            self.pricer.fleet(),
            &self.config.weather_labels,
        );
        debug!(
            calculator = %self.id,
            system_lambda = self.results.system_lambda,
            congestion_cost = self.results.congestion_cost,
            insights = self.insights.len(),
            "calculation updated"
        );
    }
}

fn random_instance_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..INSTANCE_ID_LEN)
        .map(|_| char::from_digit(rng.random_range(0..36), 36).unwrap_or('0'))
        .collect();
    format!("calc-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> Calculator {
        Calculator::with_id(CalculatorConfig::default(), "calc-test".to_string())
            .expect("default config should be valid")
    }

    #[test]
    fn starts_at_initial_values() {
        let calc = calculator();
        assert_eq!(calc.values(), MarketParameters::default());
        assert_eq!(calc.results().system_lambda, 25.0);
        assert_eq!(calc.id(), "calc-test");
    }

    #[test]
    fn random_ids_have_expected_shape() {
        let calc = Calculator::new(CalculatorConfig::default()).expect("valid config");
        let suffix = calc.id().strip_prefix("calc-").expect("calc- prefix");
        assert_eq!(suffix.len(), INSTANCE_ID_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = CalculatorConfig::default();
        cfg.sliders.demand.step = 0.0;
        let errors = Calculator::new(cfg).err().expect("zero step should be rejected");
        assert!(errors.iter().any(|e| e.field == "sliders.demand.step"));
    }

    #[test]
    fn set_values_reprices_and_clamps() {
        let mut calc = calculator();
        calc.set_values(ParameterUpdate {
            weather: Some(9.0),
            availability: Some(10.0),
            ..ParameterUpdate::default()
        });
        let v = calc.values();
        assert_eq!(v.weather_level, 5);
        assert_eq!(v.availability_pct, 60.0);
        assert!(calc.results().system_lambda > 25.0);
        assert!(
            calc.insights()
                .iter()
                .any(|i| matches!(i, Insight::WeatherStress { .. }))
        );
    }

    #[test]
    fn nudge_moves_by_step() {
        let mut calc = calculator();
        calc.nudge(SliderKey::Demand, 3);
        assert_eq!(calc.values().demand, 215.0);
        calc.nudge(SliderKey::Time, -20);
        assert_eq!(calc.values().hour_of_day, 0);
    }

    #[test]
    fn reset_restores_initial_values() {
        let mut calc = calculator();
        calc.nudge(SliderKey::Weather, 4);
        calc.reset();
        assert_eq!(calc.values(), MarketParameters::default());
        assert_eq!(calc.results().system_lambda, 25.0);
    }

    #[test]
    fn snapshot_serializes_inputs_and_outputs() {
        let calc = calculator();
        let json = serde_json::to_value(calc.snapshot()).expect("snapshot should serialize");
        assert_eq!(json["instance_id"], "calc-test");
        assert_eq!(json["inputs"]["demand"], 200.0);
        assert_eq!(json["outputs"]["total_cost"], 2400.0);
        assert!(json.get("timestamp").is_some());
        assert!(json["config"]["sliders"]["demand"].is_object());
    }

    #[test]
    fn update_parses_from_json() {
        let update: Result<ParameterUpdate, _> = serde_json::from_str(r#"{"demand": 250}"#);
        assert_eq!(
            update.ok().and_then(|u| u.demand),
            Some(250.0)
        );
    }
}
