//! Typed chart specifications and their default contents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::palette;
use crate::market::params::MarketParameters;
use crate::market::pricer::DispatchPricer;
use crate::market::sweep::{DemandSweep, SweepPoint};

/// The charts the dashboard knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    MeritOrder,
    Sensitivity,
    LmpHeatmap,
    DuckCurve,
    ConstraintFrequency,
    TradingSpread,
}

impl ChartKind {
    pub const ALL: [Self; 6] = [
        Self::MeritOrder,
        Self::Sensitivity,
        Self::LmpHeatmap,
        Self::DuckCurve,
        Self::ConstraintFrequency,
        Self::TradingSpread,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::MeritOrder => "merit-order",
            Self::Sensitivity => "sensitivity",
            Self::LmpHeatmap => "lmp-heatmap",
            Self::DuckCurve => "duck-curve",
            Self::ConstraintFrequency => "constraint-frequency",
            Self::TradingSpread => "trading-spread",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Chart kind name that matches none of [`ChartKind::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown chart kind \"{0}\"")]
pub struct UnknownChartKind(pub String);

impl FromStr for ChartKind {
    type Err = UnknownChartKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownChartKind(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Line,
    Bar,
    Scatter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    #[default]
    Linear,
    Logarithmic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    #[serde(default)]
    pub scale: AxisScale,
    #[serde(default)]
    pub begin_at_zero: bool,
    #[serde(default)]
    pub min: Option<f64>,
}

impl Axis {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            scale: AxisScale::Linear,
            begin_at_zero: true,
            min: None,
        }
    }
}

/// One `(x, y)` sample; `y = None` leaves a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: Option<f64>,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y: Some(y) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    /// Border colour, `#rrggbb`.
    pub color: String,
    /// Fill colour, CSS `rgba(...)`.
    pub fill: String,
    pub points: Vec<DataPoint>,
    #[serde(default)]
    pub stepped: bool,
    #[serde(default)]
    pub dashed: bool,
    /// Draw markers only, no connecting line.
    #[serde(default)]
    pub markers_only: bool,
    /// Plot against the secondary y axis.
    #[serde(default)]
    pub secondary_axis: bool,
}

impl Dataset {
    /// Builds a dataset with fill colour `color` at `alpha`.
    pub fn new(label: &str, color: &str, alpha: f64, points: Vec<DataPoint>) -> Self {
        Self {
            label: label.to_string(),
            color: color.to_string(),
            fill: palette::hex_to_rgba(color, alpha).unwrap_or_else(|| color.to_string()),
            points,
            stepped: false,
            dashed: false,
            markers_only: false,
            secondary_axis: false,
        }
    }

    /// Dataset with points at `x = 0, 1, 2, ...` for categorical charts.
    fn indexed(label: &str, color: &str, alpha: f64, values: &[f64]) -> Self {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &y)| DataPoint::new(i as f64, y))
            .collect();
        Self::new(label, color, alpha, points)
    }
}

/// A complete chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub chart_type: ChartType,
    pub title: String,
    /// Category names for categorical x axes; empty for numeric axes.
    pub labels: Vec<String>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub secondary_y_axis: Option<Axis>,
    pub datasets: Vec<Dataset>,
}

/// Typed partial chart options.
///
/// Each `Some` field replaces the corresponding field of the target spec
/// wholesale; `None` leaves it untouched. Datasets are never merged
/// element-wise. `secondary_y_axis: Some(None)` removes the secondary axis;
/// in JSON that is an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartOverrides {
    pub chart_type: Option<ChartType>,
    pub title: Option<String>,
    pub labels: Option<Vec<String>>,
    pub x_axis: Option<Axis>,
    pub y_axis: Option<Axis>,
    #[serde(deserialize_with = "present_or_null")]
    pub secondary_y_axis: Option<Option<Axis>>,
    pub datasets: Option<Vec<Dataset>>,
}

/// Maps a present field to `Some`, keeping `null` distinct from absence.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<Axis>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Axis>::deserialize(deserializer).map(Some)
}

impl ChartOverrides {
    /// Returns `true` when no field would change a spec.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(self, spec: &mut ChartSpec) {
        if let Some(v) = self.chart_type {
            spec.chart_type = v;
        }
        if let Some(v) = self.title {
            spec.title = v;
        }
        if let Some(v) = self.labels {
            spec.labels = v;
        }
        if let Some(v) = self.x_axis {
            spec.x_axis = v;
        }
        if let Some(v) = self.y_axis {
            spec.y_axis = v;
        }
        if let Some(v) = self.secondary_y_axis {
            spec.secondary_y_axis = v;
        }
        if let Some(v) = self.datasets {
            spec.datasets = v;
        }
    }
}

/// Demand (MW) marked on the default merit-order chart.
const MERIT_ORDER_MARKER_MW: f64 = 200.0;

/// Builds the default spec for `kind`.
///
/// Merit-order and sensitivity charts are derived from `pricer`; the other
/// kinds carry fixed illustrative data.
pub fn default_spec(kind: ChartKind, pricer: &DispatchPricer) -> ChartSpec {
    match kind {
        ChartKind::MeritOrder => merit_order(pricer, MERIT_ORDER_MARKER_MW),
        ChartKind::Sensitivity => sensitivity(pricer),
        ChartKind::LmpHeatmap => lmp_heatmap(),
        ChartKind::DuckCurve => duck_curve(),
        ChartKind::ConstraintFrequency => constraint_frequency(),
        ChartKind::TradingSpread => trading_spread(),
    }
}

/// Stepped supply curve with a marker at `demand_mw`.
pub fn merit_order(pricer: &DispatchPricer, demand_mw: f64) -> ChartSpec {
    let curve = pricer.fleet().merit_order_curve();
    let mut supply = Dataset::new(
        "Merit Order Curve",
        palette::PRIMARY,
        0.1,
        curve.iter().map(|&(x, y)| DataPoint::new(x, y)).collect(),
    );
    supply.stepped = true;

    // Price at the marker is the cost of the first tier whose cumulative end covers it.
    let marker_cost = curve
        .iter()
        .skip(1)
        .find(|(cumulative, _)| demand_mw <= *cumulative)
        .or(curve.last())
        .map_or(0.0, |&(_, cost)| cost);
    let mut marker = Dataset::new(
        &format!("Current Demand ({demand_mw} MW)"),
        palette::SECONDARY,
        1.0,
        vec![DataPoint::new(demand_mw, marker_cost)],
    );
    marker.markers_only = true;

    ChartSpec {
        kind: ChartKind::MeritOrder,
        chart_type: ChartType::Line,
        title: "Merit Order Curve and Shadow Price Formation".to_string(),
        labels: Vec::new(),
        x_axis: Axis::new("Cumulative Capacity (MW)"),
        y_axis: Axis::new("Marginal Cost ($/MWh)"),
        secondary_y_axis: None,
        datasets: vec![supply, marker],
    }
}

/// Market conditions behind the default sensitivity chart.
fn sensitivity_base() -> MarketParameters {
    MarketParameters {
        demand: 150.0,
        transmission_capacity: 200.0,
        availability_pct: 100.0,
        hour_of_day: 18,
        weather_level: 3,
    }
}

/// Shadow prices across a demand sweep, on a logarithmic price axis.
pub fn sensitivity(pricer: &DispatchPricer) -> ChartSpec {
    let points = DemandSweep::new(150.0, 290.0, 20.0)
        .map(|s| s.run(pricer, &sensitivity_base()))
        .unwrap_or_default();

    let series = |label: &str, color: &str, pick: fn(&SweepPoint) -> f64| {
        Dataset::new(
            label,
            color,
            0.1,
            points.iter().map(|p| DataPoint::new(p.demand, pick(p))).collect(),
        )
    };

    ChartSpec {
        kind: ChartKind::Sensitivity,
        chart_type: ChartType::Line,
        title: "Shadow Price Sensitivity to System Stress".to_string(),
        labels: Vec::new(),
        x_axis: Axis {
            begin_at_zero: false,
            ..Axis::new("System Demand (MW)")
        },
        y_axis: Axis {
            title: "Price ($/MWh)".to_string(),
            scale: AxisScale::Logarithmic,
            begin_at_zero: false,
            min: Some(1.0),
        },
        secondary_y_axis: None,
        datasets: vec![
            series("System Lambda", palette::INFO, |p| p.result.system_lambda),
            series("Congestion Cost", palette::SECONDARY, |p| {
                p.result.congestion_cost
            }),
            series("Total LMP", palette::SUCCESS, |p| p.result.lmp_region2),
        ],
    }
}

fn lmp_heatmap() -> ChartSpec {
    ChartSpec {
        kind: ChartKind::LmpHeatmap,
        chart_type: ChartType::Bar,
        title: "Locational Marginal Prices Across Market Regions".to_string(),
        labels: ["North Hub", "South Hub", "West Hub", "Houston Hub"]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        x_axis: Axis::new("Market Regions"),
        y_axis: Axis::new("LMP ($/MWh)"),
        secondary_y_axis: None,
        datasets: vec![
            Dataset::indexed(
                "Normal Conditions",
                palette::INFO,
                0.8,
                &[45.0, 47.0, 52.0, 48.0],
            ),
            Dataset::indexed(
                "Constrained Conditions",
                palette::SECONDARY,
                0.8,
                &[150.0, 275.0, 320.0, 180.0],
            ),
        ],
    }
}

const TOTAL_DEMAND_MW: [f64; 24] = [
    160.0, 150.0, 145.0, 140.0, 145.0, 160.0, 180.0, 200.0, 210.0, 215.0, 220.0, 225.0, 230.0,
    235.0, 240.0, 245.0, 250.0, 260.0, 270.0, 265.0, 250.0, 220.0, 190.0, 170.0,
];
const NET_DEMAND_MW: [f64; 24] = [
    160.0, 150.0, 145.0, 140.0, 145.0, 160.0, 180.0, 200.0, 190.0, 170.0, 150.0, 140.0, 130.0,
    135.0, 140.0, 165.0, 200.0, 240.0, 270.0, 265.0, 250.0, 220.0, 190.0, 170.0,
];
const HOURLY_SHADOW_PRICE: [f64; 24] = [
    25.0, 25.0, 25.0, 25.0, 25.0, 25.0, 45.0, 45.0, 25.0, 25.0, 25.0, 25.0, 25.0, 25.0, 25.0,
    45.0, 150.0, 350.0, 400.0, 300.0, 150.0, 45.0, 45.0, 25.0,
];

fn duck_curve() -> ChartSpec {
    let total = Dataset::indexed("Total Demand", palette::DARK, 0.1, &TOTAL_DEMAND_MW);
    let net = Dataset::indexed(
        "Net Demand (after Solar)",
        palette::WARNING,
        0.1,
        &NET_DEMAND_MW,
    );
    let mut price = Dataset::indexed(
        "Shadow Price",
        palette::SECONDARY,
        0.2,
        &HOURLY_SHADOW_PRICE,
    );
    price.dashed = true;
    price.secondary_axis = true;

    ChartSpec {
        kind: ChartKind::DuckCurve,
        chart_type: ChartType::Line,
        title: "Duck Curve and Shadow Price Patterns".to_string(),
        labels: (0..24).map(|h| format!("{h}:00")).collect(),
        x_axis: Axis::new("Hour of Day"),
        y_axis: Axis::new("Demand (MW)"),
        secondary_y_axis: Some(Axis::new("Shadow Price ($/MWh)")),
        datasets: vec![total, net, price],
    }
}

fn constraint_frequency() -> ChartSpec {
    ChartSpec {
        kind: ChartKind::ConstraintFrequency,
        chart_type: ChartType::Bar,
        title: "Monthly Constraint Binding Frequency".to_string(),
        labels: [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect(),
        x_axis: Axis::new("Month"),
        y_axis: Axis::new("Hours per Month"),
        secondary_y_axis: None,
        datasets: vec![
            Dataset::indexed(
                "Transmission Constraints (Hours)",
                palette::INFO,
                0.8,
                &[
                    50.0, 30.0, 20.0, 25.0, 40.0, 120.0, 200.0, 250.0, 180.0, 60.0, 35.0, 45.0,
                ],
            ),
            Dataset::indexed(
                "Generation Constraints (Hours)",
                palette::SECONDARY,
                0.8,
                &[
                    80.0, 60.0, 40.0, 30.0, 60.0, 150.0, 300.0, 350.0, 200.0, 80.0, 70.0, 85.0,
                ],
            ),
        ],
    }
}

fn trading_spread() -> ChartSpec {
    let points = [
        (25.0, 5.0),
        (50.0, 15.0),
        (75.0, 25.0),
        (100.0, 40.0),
        (150.0, 75.0),
        (200.0, 120.0),
        (300.0, 200.0),
        (500.0, 350.0),
    ]
    .iter()
    .map(|&(x, y)| DataPoint::new(x, y))
    .collect();
    let mut opportunities = Dataset::new("Arbitrage Opportunities", palette::SUCCESS, 0.7, points);
    opportunities.markers_only = true;

    ChartSpec {
        kind: ChartKind::TradingSpread,
        chart_type: ChartType::Scatter,
        title: "Trading Spread Opportunities vs Price Levels".to_string(),
        labels: Vec::new(),
        x_axis: Axis::new("Average LMP ($/MWh)"),
        y_axis: Axis::new("Maximum Spread ($/MWh)"),
        secondary_y_axis: None,
        datasets: vec![opportunities],
    }
}
