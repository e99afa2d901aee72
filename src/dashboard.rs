//! Presentation controller owning every chart and calculator on a page.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::calculator::{Calculator, CalculatorSnapshot};
use crate::charts::{ChartRegistry, ChartSpec};
use crate::market::pricer::DispatchPricer;

/// Serializable view of a whole dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardExport<'a> {
    pub calculators: Vec<CalculatorSnapshot>,
    pub charts: BTreeMap<&'a str, &'a ChartSpec>,
}

/// Owns the chart registry and the calculators keyed by instance id.
#[derive(Debug, Default)]
pub struct Dashboard {
    charts: ChartRegistry,
    calculators: BTreeMap<String, Calculator>,
}

impl Dashboard {
    /// Creates an empty dashboard whose derived charts use `pricer`.
    pub fn new(pricer: DispatchPricer) -> Self {
        Self {
            charts: ChartRegistry::new(pricer),
            calculators: BTreeMap::new(),
        }
    }

    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    pub fn charts_mut(&mut self) -> &mut ChartRegistry {
        &mut self.charts
    }

    /// Takes ownership of `calculator` and returns its instance id.
    pub fn add_calculator(&mut self, calculator: Calculator) -> String {
        let id = calculator.id().to_string();
        info!(calculator = %id, "calculator added");
        self.calculators.insert(id.clone(), calculator);
        id
    }

    pub fn calculator(&self, id: &str) -> Option<&Calculator> {
        self.calculators.get(id)
    }

    pub fn calculator_mut(&mut self, id: &str) -> Option<&mut Calculator> {
        self.calculators.get_mut(id)
    }

    /// Removes and returns the calculator with `id`.
    pub fn remove_calculator(&mut self, id: &str) -> Option<Calculator> {
        self.calculators.remove(id)
    }

    pub fn calculator_count(&self) -> usize {
        self.calculators.len()
    }

    /// Snapshots every calculator and borrows every chart spec.
    pub fn export(&self) -> DashboardExport<'_> {
        DashboardExport {
            calculators: self.calculators.values().map(Calculator::snapshot).collect(),
            charts: self.charts.iter().collect(),
        }
    }
}
