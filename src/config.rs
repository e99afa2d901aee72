//! TOML-based calculator configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::market::fleet::Fleet;
use crate::market::params::{MarketParameters, ParameterBounds};

/// Top-level calculator configuration parsed from TOML.
///
/// Every section is optional and falls back to the `default` preset. Load
/// from TOML with [`CalculatorConfig::from_toml_file`] or use
/// [`CalculatorConfig::from_preset`] for a built-in scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Slider ranges, steps, initial values, and labels.
    pub sliders: SliderSet,
    /// Display labels for weather levels 1..=5.
    pub weather_labels: Vec<String>,
    /// Generator fleet. A provided tier table must set both fields.
    pub generators: Fleet,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            sliders: SliderSet::default(),
            weather_labels: [
                "Normal",
                "Mild Stress",
                "Moderate Stress",
                "High Stress",
                "Extreme",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
            generators: Fleet::default(),
        }
    }
}

/// One input slider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub initial: f64,
    pub step: f64,
    /// Unit suffix shown after the value.
    pub unit: String,
    pub label: String,
}

impl SliderConfig {
    fn new(min: f64, max: f64, initial: f64, step: f64, unit: &str, label: &str) -> Self {
        Self {
            min,
            max,
            initial,
            step,
            unit: unit.to_string(),
            label: label.to_string(),
        }
    }

    /// Clamps `value` into `[min, max]`; non-finite input maps to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_finite() {
            value.max(self.min).min(self.max)
        } else {
            self.min
        }
    }

    /// Clamps `value` and snaps it to the nearest step above `min`.
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = self.clamp(value);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).min(self.max)
    }

    fn apply(&mut self, patch: SliderPatch) {
        if let Some(v) = patch.min {
            self.min = v;
        }
        if let Some(v) = patch.max {
            self.max = v;
        }
        if let Some(v) = patch.initial {
            self.initial = v;
        }
        if let Some(v) = patch.step {
            self.step = v;
        }
        if let Some(v) = patch.unit {
            self.unit = v;
        }
        if let Some(v) = patch.label {
            self.label = v;
        }
    }
}

/// Which slider a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderKey {
    Demand,
    Transmission,
    Availability,
    Time,
    Weather,
}

impl SliderKey {
    /// All sliders in display order.
    pub const ALL: [Self; 5] = [
        Self::Demand,
        Self::Transmission,
        Self::Availability,
        Self::Time,
        Self::Weather,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Demand => "demand",
            Self::Transmission => "transmission",
            Self::Availability => "availability",
            Self::Time => "time",
            Self::Weather => "weather",
        }
    }
}

/// The five calculator sliders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SliderSetPatch")]
pub struct SliderSet {
    pub demand: SliderConfig,
    pub transmission: SliderConfig,
    pub availability: SliderConfig,
    pub time: SliderConfig,
    pub weather: SliderConfig,
}

impl Default for SliderSet {
    fn default() -> Self {
        Self {
            demand: SliderConfig::new(150.0, 300.0, 200.0, 5.0, "MW", "System Demand"),
            transmission: SliderConfig::new(
                80.0,
                200.0,
                120.0,
                10.0,
                "MW",
                "Transmission Capacity",
            ),
            availability: SliderConfig::new(
                60.0,
                100.0,
                100.0,
                5.0,
                "%",
                "Generator Availability",
            ),
            time: SliderConfig::new(0.0, 23.0, 18.0, 1.0, ":00", "Time of Day (Hour)"),
            weather: SliderConfig::new(1.0, 5.0, 1.0, 1.0, "", "Weather Stress Level"),
        }
    }
}

impl SliderSet {
    pub fn get(&self, key: SliderKey) -> &SliderConfig {
        match key {
            SliderKey::Demand => &self.demand,
            SliderKey::Transmission => &self.transmission,
            SliderKey::Availability => &self.availability,
            SliderKey::Time => &self.time,
            SliderKey::Weather => &self.weather,
        }
    }

    fn get_mut(&mut self, key: SliderKey) -> &mut SliderConfig {
        match key {
            SliderKey::Demand => &mut self.demand,
            SliderKey::Transmission => &mut self.transmission,
            SliderKey::Availability => &mut self.availability,
            SliderKey::Time => &mut self.time,
            SliderKey::Weather => &mut self.weather,
        }
    }

    /// Admissible parameter ranges derived from the slider ranges.
    pub fn bounds(&self) -> ParameterBounds {
        ParameterBounds {
            demand: self.demand.min..=self.demand.max,
            transmission_capacity: self.transmission.min..=self.transmission.max,
            availability_pct: self.availability.min..=self.availability.max,
            hour_of_day: to_u8(self.time.min)..=to_u8(self.time.max),
            weather_level: to_u8(self.weather.min)..=to_u8(self.weather.max),
        }
    }

    /// Market parameters at the sliders' initial positions.
    pub fn initial_parameters(&self) -> MarketParameters {
        MarketParameters {
            demand: self.demand.initial,
            transmission_capacity: self.transmission.initial,
            availability_pct: self.availability.initial,
            hour_of_day: to_u8(self.time.initial),
            weather_level: to_u8(self.weather.initial),
        }
    }
}

/// Rounds a slider value to an integer parameter.
pub(crate) fn to_u8(value: f64) -> u8 {
    if value.is_finite() {
        value.round().clamp(0.0, f64::from(u8::MAX)) as u8
    } else {
        0
    }
}

/// Partial slider table: each `Some` replaces the default field.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SliderPatch {
    min: Option<f64>,
    max: Option<f64>,
    initial: Option<f64>,
    step: Option<f64>,
    unit: Option<String>,
    label: Option<String>,
}

/// Partial `[sliders]` section, applied over [`SliderSet::default`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SliderSetPatch {
    demand: Option<SliderPatch>,
    transmission: Option<SliderPatch>,
    availability: Option<SliderPatch>,
    time: Option<SliderPatch>,
    weather: Option<SliderPatch>,
}

impl From<SliderSetPatch> for SliderSet {
    fn from(patch: SliderSetPatch) -> Self {
        let mut set = Self::default();
        let patches = [
            (SliderKey::Demand, patch.demand),
            (SliderKey::Transmission, patch.transmission),
            (SliderKey::Availability, patch.availability),
            (SliderKey::Time, patch.time),
            (SliderKey::Weather, patch.weather),
        ];
        for (key, p) in patches {
            if let Some(p) = p {
                set.get_mut(key).apply(p);
            }
        }
        set
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"sliders.demand.step"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl CalculatorConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "evening_peak", "heatwave", "outage", "congested"];

    /// Evening peak on a warm day: gas and peakers at the margin.
    pub fn evening_peak() -> Self {
        let mut cfg = Self::default();
        cfg.sliders.demand.initial = 260.0;
        cfg.sliders.time.initial = 19.0;
        cfg.sliders.weather.initial = 3.0;
        cfg
    }

    /// Extreme weather at the start of the evening peak.
    pub fn heatwave() -> Self {
        let mut cfg = Self::default();
        cfg.sliders.demand.initial = 280.0;
        cfg.sliders.time.initial = 17.0;
        cfg.sliders.weather.initial = 5.0;
        cfg
    }

    /// Forced outages derate the fleet during a morning shoulder.
    pub fn outage() -> Self {
        let mut cfg = Self::default();
        cfg.sliders.demand.initial = 240.0;
        cfg.sliders.availability.initial = 70.0;
        cfg.sliders.time.initial = 10.0;
        cfg.sliders.weather.initial = 2.0;
        cfg
    }

    /// Transmission barely above coal output, so gas is bottled up behind the path.
    pub fn congested() -> Self {
        let mut cfg = Self::default();
        cfg.sliders.demand.initial = 250.0;
        cfg.sliders.transmission.initial = 110.0;
        cfg.sliders.weather.initial = 3.0;
        cfg
    }

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default()),
            "evening_peak" => Ok(Self::evening_peak()),
            "heatwave" => Ok(Self::heatwave()),
            "outage" => Ok(Self::outage()),
            "congested" => Ok(Self::congested()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for key in SliderKey::ALL {
            let s = self.sliders.get(key);
            let path = format!("sliders.{}", key.name());
            if ![s.min, s.max, s.initial, s.step].iter().all(|v| v.is_finite()) {
                errors.push(ConfigError::new(&path, "values must be finite"));
                continue;
            }
            if s.min > s.max {
                errors.push(ConfigError::new(format!("{path}.min"), "must be <= max"));
            }
            if s.step <= 0.0 {
                errors.push(ConfigError::new(format!("{path}.step"), "must be > 0"));
            }
            if s.initial < s.min || s.initial > s.max {
                errors.push(ConfigError::new(
                    format!("{path}.initial"),
                    format!("must be in [{}, {}]", s.min, s.max),
                ));
            }
        }

        let sl = &self.sliders;
        if sl.availability.min <= 0.0 {
            errors.push(ConfigError::new(
                "sliders.availability.min",
                "must be > 0 (zero availability leaves no peaker capacity)",
            ));
        }
        if sl.time.min < 0.0 || sl.time.max > 23.0 {
            errors.push(ConfigError::new("sliders.time", "range must lie within [0, 23]"));
        }
        if sl.weather.min < 1.0 || sl.weather.max > 5.0 {
            errors.push(ConfigError::new("sliders.weather", "range must lie within [1, 5]"));
        }

        if self.weather_labels.len() < 5 {
            errors.push(ConfigError::new(
                "weather_labels",
                format!("must have 5 entries, got {}", self.weather_labels.len()),
            ));
        }

        let g = &self.generators;
        for (name, tier) in [("coal", &g.coal), ("gas", &g.gas), ("peaker", &g.peaker)] {
            if !(tier.capacity_mw > 0.0) {
                errors.push(ConfigError::new(
                    format!("generators.{name}.capacity_mw"),
                    "must be > 0",
                ));
            }
            if !(tier.marginal_cost > 0.0) {
                errors.push(ConfigError::new(
                    format!("generators.{name}.marginal_cost"),
                    "must be > 0",
                ));
            }
        }
        if !(g.coal.marginal_cost < g.gas.marginal_cost && g.gas.marginal_cost < g.peaker.marginal_cost)
        {
            errors.push(ConfigError::new(
                "generators",
                "marginal costs must ascend coal < gas < peaker",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_valid() {
        let cfg = CalculatorConfig::default();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = CalculatorConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in CalculatorConfig::PRESETS {
            let cfg = CalculatorConfig::from_preset(name).expect("preset should load");
            let errors = cfg.validate();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn initial_parameters_follow_sliders() {
        let p = CalculatorConfig::heatwave().sliders.initial_parameters();
        assert_eq!(p.demand, 280.0);
        assert_eq!(p.hour_of_day, 17);
        assert_eq!(p.weather_level, 5);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
weather_labels = ["Calm", "Breezy", "Warm", "Hot", "Scorching"]

[sliders.demand]
min = 100
max = 400
initial = 250
step = 10

[sliders.weather]
initial = 4

[generators.coal]
capacity_mw = 120.0
marginal_cost = 20.0

[generators.gas]
capacity_mw = 150.0
marginal_cost = 50.0

[generators.peaker]
capacity_mw = 60.0
marginal_cost = 180.0
"#;
        let cfg = CalculatorConfig::from_toml_str(toml).expect("valid TOML should parse");
        assert_eq!(cfg.sliders.demand.max, 400.0);
        assert_eq!(cfg.sliders.weather.initial, 4.0);
        assert_eq!(cfg.generators.peaker.marginal_cost, 180.0);
        assert_eq!(cfg.weather_labels[4], "Scorching");
    }

    #[test]
    fn partial_slider_table_keeps_other_fields() {
        let toml = r#"
[sliders.transmission]
initial = 150
"#;
        let cfg = CalculatorConfig::from_toml_str(toml).expect("partial TOML should parse");
        // initial overridden
        assert_eq!(cfg.sliders.transmission.initial, 150.0);
        // range and label kept default
        assert_eq!(cfg.sliders.transmission.max, 200.0);
        assert_eq!(cfg.sliders.transmission.label, "Transmission Capacity");
        // untouched sections kept default
        assert_eq!(cfg.generators, Fleet::default());
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[sliders.demand]
initial = 200
bogus_field = true
"#;
        assert!(CalculatorConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_initial_out_of_range() {
        let mut cfg = CalculatorConfig::default();
        cfg.sliders.demand.initial = 500.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "sliders.demand.initial"));
    }

    #[test]
    fn validation_catches_zero_availability_floor() {
        let mut cfg = CalculatorConfig::default();
        cfg.sliders.availability.min = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "sliders.availability.min"));
    }

    #[test]
    fn validation_catches_cost_order() {
        let mut cfg = CalculatorConfig::default();
        cfg.generators.gas.marginal_cost = 10.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "generators"));
    }

    #[test]
    fn validation_catches_short_weather_labels() {
        let mut cfg = CalculatorConfig::default();
        cfg.weather_labels.truncate(3);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "weather_labels"));
    }

    #[test]
    fn snap_rounds_to_step_and_clamps() {
        let demand = &SliderSet::default().demand;
        assert_eq!(demand.snap(203.0), 205.0);
        assert_eq!(demand.snap(202.0), 200.0);
        assert_eq!(demand.snap(999.0), 300.0);
        assert_eq!(demand.snap(f64::NAN), 150.0);
    }

    #[test]
    fn config_error_display() {
        let e = ConfigError::new("sliders.demand.step", "must be > 0");
        assert_eq!(e.to_string(), "config error: sliders.demand.step: must be > 0");
    }
}
