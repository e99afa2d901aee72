//! TUI application state.

use tracing::warn;

use crate::calculator::{Calculator, ParameterUpdate};
use crate::config::{CalculatorConfig, ConfigError, SliderKey};

/// TUI application state.
pub struct App {
    /// Calculator driven by the sliders.
    calculator: Calculator,
    /// Index into [`SliderKey::ALL`] of the slider under the cursor.
    pub selected: usize,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// Name of the active preset, or the config file path.
    pub preset_name: String,
}

impl App {
    /// Creates an app over a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns every validation error of `config`.
    pub fn new(config: CalculatorConfig, name: &str) -> Result<Self, Vec<ConfigError>> {
        Ok(Self {
            calculator: Calculator::new(config)?,
            selected: 0,
            quit: false,
            preset_name: name.to_string(),
        })
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Slider under the cursor.
    pub fn selected_key(&self) -> SliderKey {
        SliderKey::ALL[self.selected % SliderKey::ALL.len()]
    }

    /// Moves the cursor down one slider, wrapping at the end.
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % SliderKey::ALL.len();
    }

    /// Moves the cursor up one slider, wrapping at the start.
    pub fn select_prev(&mut self) {
        self.selected = (self.selected + SliderKey::ALL.len() - 1) % SliderKey::ALL.len();
    }

    /// Moves the selected slider by `steps` increments.
    pub fn nudge(&mut self, steps: i32) {
        let key = self.selected_key();
        self.calculator.nudge(key, steps);
    }

    /// Moves the provided sliders, as on the command line.
    pub fn set_values(&mut self, update: ParameterUpdate) {
        self.calculator.set_values(update);
    }

    /// Returns every slider to its initial value.
    pub fn reset(&mut self) {
        self.calculator.reset();
    }

    /// Replaces the configuration with a named preset, keeping the instance id.
    pub fn switch_preset(&mut self, name: &str) {
        let config = match CalculatorConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(error = %e, "preset switch ignored");
                return;
            }
        };
        match Calculator::with_id(config, self.calculator.id().to_string()) {
            Ok(calculator) => {
                self.calculator = calculator;
                self.preset_name = name.to_string();
            }
            Err(errors) => warn!(preset = name, errors = errors.len(), "invalid preset"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(CalculatorConfig::default(), "default").expect("default config is valid")
    }

    #[test]
    fn starts_on_first_slider() {
        let app = app();
        assert_eq!(app.selected_key(), SliderKey::Demand);
        assert_eq!(app.calculator().results().system_lambda, 25.0);
        assert!(!app.quit);
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut app = app();
        app.select_prev();
        assert_eq!(app.selected_key(), SliderKey::Weather);
        app.select_next();
        assert_eq!(app.selected_key(), SliderKey::Demand);
    }

    #[test]
    fn nudge_reprices() {
        let mut app = app();
        app.selected = 4;
        app.nudge(4);
        assert_eq!(app.calculator().values().weather_level, 5);
        assert_eq!(app.calculator().results().system_lambda, 3168.0);

        app.nudge(10);
        assert_eq!(app.calculator().values().weather_level, 5);
    }

    #[test]
    fn switch_preset_keeps_id() {
        let mut app = app();
        let id = app.calculator().id().to_string();
        app.switch_preset("outage");
        assert_eq!(app.preset_name, "outage");
        assert_eq!(app.calculator().id(), id);
        assert_eq!(app.calculator().values().availability_pct, 70.0);

        app.switch_preset("nope");
        assert_eq!(app.preset_name, "outage");
    }

    #[test]
    fn reset_restores_preset_initials() {
        let mut app = app();
        app.switch_preset("evening_peak");
        app.nudge(-6);
        app.reset();
        assert_eq!(app.calculator().values().demand, 260.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = CalculatorConfig::default();
        cfg.generators.gas.marginal_cost = 10.0;
        assert!(App::new(cfg, "bad").is_err());
    }
}
