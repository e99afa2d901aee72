//! Owned collection of live chart specs keyed by identifier.

use std::collections::BTreeMap;

use tracing::{info, warn};

use super::spec::{ChartKind, ChartOverrides, ChartSpec, default_spec};
use crate::market::pricer::DispatchPricer;

/// Chart registry with explicit create/update/destroy operations.
///
/// Iteration order is by identifier.
#[derive(Debug, Clone, Default)]
pub struct ChartRegistry {
    pricer: DispatchPricer,
    charts: BTreeMap<String, ChartSpec>,
    created: usize,
}

impl ChartRegistry {
    /// Creates an empty registry whose derived charts use `pricer`.
    pub fn new(pricer: DispatchPricer) -> Self {
        Self {
            pricer,
            charts: BTreeMap::new(),
            created: 0,
        }
    }

    /// Builds the default spec for `kind`, applies `overrides`, and stores it.
    ///
    /// Without an explicit `id` the chart is named `chart-<kind>-<n>`, where
    /// `n` counts charts created so far. An existing chart with the same id
    /// is replaced. Returns the id used.
    pub fn create(&mut self, kind: ChartKind, id: Option<&str>, overrides: ChartOverrides) -> String {
        let id = id.map_or_else(|| format!("chart-{kind}-{}", self.created), str::to_string);
        self.created += 1;

        let mut spec = default_spec(kind, &self.pricer);
        overrides.apply_to(&mut spec);

        if self.charts.insert(id.clone(), spec).is_some() {
            warn!(chart = %id, "replaced existing chart");
        }
        info!(chart = %id, %kind, "chart created");
        id
    }

    /// Applies `changes` to the chart with `id`.
    ///
    /// Returns `false` when no such chart exists.
    pub fn update(&mut self, id: &str, changes: ChartOverrides) -> bool {
        let Some(spec) = self.charts.get_mut(id) else {
            return false;
        };
        changes.apply_to(spec);
        info!(chart = %id, "chart updated");
        true
    }

    /// Removes the chart with `id`. Returns `false` when no such chart exists.
    pub fn destroy(&mut self, id: &str) -> bool {
        let removed = self.charts.remove(id).is_some();
        if removed {
            info!(chart = %id, "chart destroyed");
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&ChartSpec> {
        self.charts.get(id)
    }

    /// All charts as `(id, spec)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChartSpec)> {
        self.charts.iter().map(|(id, spec)| (id.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::spec::Dataset;

    #[test]
    fn create_assigns_sequential_ids() {
        let mut reg = ChartRegistry::default();
        let a = reg.create(ChartKind::MeritOrder, None, ChartOverrides::default());
        let b = reg.create(ChartKind::DuckCurve, None, ChartOverrides::default());
        assert_eq!(a, "chart-merit-order-0");
        assert_eq!(b, "chart-duck-curve-1");
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn create_with_id_replaces_existing() {
        let mut reg = ChartRegistry::default();
        reg.create(ChartKind::LmpHeatmap, Some("prices"), ChartOverrides::default());
        reg.create(ChartKind::TradingSpread, Some("prices"), ChartOverrides::default());
        assert_eq!(reg.len(), 1);
        assert_eq!(
            reg.get("prices").map(|s| s.kind),
            Some(ChartKind::TradingSpread)
        );
    }

    #[test]
    fn create_applies_overrides() {
        let mut reg = ChartRegistry::default();
        let id = reg.create(
            ChartKind::Sensitivity,
            None,
            ChartOverrides {
                title: Some("Stress test".to_string()),
                ..ChartOverrides::default()
            },
        );
        assert_eq!(reg.get(&id).map(|s| s.title.as_str()), Some("Stress test"));
    }

    #[test]
    fn update_replaces_datasets() {
        let mut reg = ChartRegistry::default();
        let id = reg.create(ChartKind::ConstraintFrequency, None, ChartOverrides::default());
        let changed = reg.update(
            &id,
            ChartOverrides {
                datasets: Some(vec![Dataset::new("Only", "#000000", 1.0, Vec::new())]),
                ..ChartOverrides::default()
            },
        );
        assert!(changed);
        assert_eq!(reg.get(&id).map(|s| s.datasets.len()), Some(1));
        assert!(!reg.update("missing", ChartOverrides::default()));
    }

    #[test]
    fn destroy_removes_once() {
        let mut reg = ChartRegistry::default();
        let id = reg.create(ChartKind::MeritOrder, None, ChartOverrides::default());
        assert!(reg.destroy(&id));
        assert!(!reg.destroy(&id));
        assert!(reg.is_empty());
    }

    #[test]
    fn iter_is_ordered_by_id() {
        let mut reg = ChartRegistry::default();
        reg.create(ChartKind::MeritOrder, Some("b"), ChartOverrides::default());
        reg.create(ChartKind::MeritOrder, Some("a"), ChartOverrides::default());
        let ids: Vec<&str> = reg.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
