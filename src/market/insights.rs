//! Threshold-based market commentary on a priced snapshot.

use std::fmt;

use serde::Serialize;

use super::fleet::Fleet;
use super::params::MarketParameters;
use super::pricer::{AVAILABILITY_STRESS_PCT, DispatchResult, WEATHER_STRESS_LEVEL};

/// System lambda above which prices are extreme ($/MWh).
pub const LAMBDA_SEVERE: f64 = 500.0;
/// System lambda above which peakers are setting the price ($/MWh).
pub const LAMBDA_WARNING: f64 = 150.0;
/// System lambda at or below which operations are normal ($/MWh).
pub const LAMBDA_NORMAL: f64 = 45.0;
/// Congestion cost above which congestion is severe ($/MWh).
pub const CONGESTION_SEVERE: f64 = 100.0;
/// Congestion cost above which congestion is moderate ($/MWh).
pub const CONGESTION_MODERATE: f64 = 25.0;
/// Congestion cost above which transmission investment pays ($/MWh).
pub const CONGESTION_INVESTMENT: f64 = 50.0;
/// System lambda above which a derated fleet signals a capacity shortage.
pub const LAMBDA_CAPACITY_SHORTAGE: f64 = 200.0;
/// System lambda above which an evening-peak hour is flagged.
pub const LAMBDA_EVENING_PEAK: f64 = 100.0;

/// How urgent an insight is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    Info,
    Warning,
    Severe,
}

/// One piece of market commentary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    ExtremePrice { system_lambda: f64 },
    HighPrice { peaker_cost: f64 },
    NormalOperations { coal_sets_price: bool },
    SevereCongestion { congestion_cost: f64 },
    ModerateCongestion,
    WeatherStress { label: String },
    InvestmentOpportunity { congestion_cost: f64 },
    CapacityShortage { availability_pct: f64 },
    EveningPeak { hour_of_day: u8 },
    MarketAnalysis,
}

impl Insight {
    pub fn severity(&self) -> Severity {
        match self {
            Self::ExtremePrice { .. } | Self::SevereCongestion { .. } => Severity::Severe,
            Self::HighPrice { .. }
            | Self::ModerateCongestion
            | Self::WeatherStress { .. }
            | Self::CapacityShortage { .. }
            | Self::EveningPeak { .. } => Severity::Warning,
            Self::InvestmentOpportunity { .. } => Severity::Info,
            Self::NormalOperations { .. } | Self::MarketAnalysis => Severity::Normal,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ExtremePrice { .. } => "Extreme Price Conditions",
            Self::HighPrice { .. } => "High Price Alert",
            Self::NormalOperations { .. } => "Normal Operations",
            Self::SevereCongestion { .. } => "Severe Transmission Congestion",
            Self::ModerateCongestion => "Moderate Congestion",
            Self::WeatherStress { .. } => "Weather Stress Impact",
            Self::InvestmentOpportunity { .. } => "Investment Opportunity",
            Self::CapacityShortage { .. } => "Capacity Shortage Signal",
            Self::EveningPeak { .. } => "Evening Peak Challenge",
            Self::MarketAnalysis => "Market Analysis",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::ExtremePrice { system_lambda } => format!(
                "System lambda at ${system_lambda}/MWh indicates severe market stress. \
                 Emergency reserves may be needed."
            ),
            Self::HighPrice { peaker_cost } => format!(
                "Expensive peaker units (${peaker_cost}/MWh) are setting market price. \
                 System approaching capacity limits."
            ),
            Self::NormalOperations { coal_sets_price } => format!(
                "System operating efficiently with {} setting prices.",
                if *coal_sets_price {
                    "coal baseload"
                } else {
                    "gas generation"
                }
            ),
            Self::SevereCongestion { congestion_cost } => format!(
                "${congestion_cost}/MWh price spread creates significant arbitrage \
                 opportunities. Consider transmission investments."
            ),
            Self::ModerateCongestion => "Some transmission constraints binding. \
                                         Energy storage could capture value."
                .to_string(),
            Self::WeatherStress { label } => format!(
                "{label} conditions reducing generation efficiency and increasing cooling demand."
            ),
            Self::InvestmentOpportunity { congestion_cost } => format!(
                "High congestion costs (${congestion_cost}/MWh) suggest transmission \
                 expansion would provide significant economic value."
            ),
            Self::CapacityShortage { availability_pct } => format!(
                "High prices with {availability_pct}% availability suggest additional \
                 generation capacity would be valuable."
            ),
            Self::EveningPeak { hour_of_day } => format!(
                "High prices during evening peak ({hour_of_day}:00) suggest need for \
                 flexible resources or demand response programs."
            ),
            Self::MarketAnalysis => "System operating under normal conditions. Adjust \
                                     parameters to explore different market scenarios."
                .to_string(),
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.severity(), self.title(), self.message())
    }
}

/// Produces commentary for a priced snapshot, in display order.
///
/// Always returns at least one insight; [`Insight::MarketAnalysis`] is the
/// fallback when no threshold is crossed. `weather_labels` is indexed by
/// `weather_level - 1`; a missing label falls back to `"Level N"`.
pub fn assess(
    params: &MarketParameters,
    result: &DispatchResult,
    fleet: &Fleet,
    weather_labels: &[String],
) -> Vec<Insight> {
    let mut insights = Vec::new();
    let lambda = result.system_lambda;
    let congestion = result.congestion_cost;

    if lambda > LAMBDA_SEVERE {
        insights.push(Insight::ExtremePrice {
            system_lambda: lambda,
        });
    } else if lambda > LAMBDA_WARNING {
        insights.push(Insight::HighPrice {
            peaker_cost: fleet.peaker.marginal_cost,
        });
    } else if lambda <= LAMBDA_NORMAL {
        insights.push(Insight::NormalOperations {
            coal_sets_price: lambda <= fleet.coal.marginal_cost,
        });
    }

    if congestion > CONGESTION_SEVERE {
        insights.push(Insight::SevereCongestion {
            congestion_cost: congestion,
        });
    } else if congestion > CONGESTION_MODERATE {
        insights.push(Insight::ModerateCongestion);
    }

    if params.weather_level >= WEATHER_STRESS_LEVEL {
        let label = usize::from(params.weather_level)
            .checked_sub(1)
            .and_then(|i| weather_labels.get(i))
            .cloned()
            .unwrap_or_else(|| format!("Level {}", params.weather_level));
        insights.push(Insight::WeatherStress { label });
    }

    if congestion > CONGESTION_INVESTMENT {
        insights.push(Insight::InvestmentOpportunity {
            congestion_cost: congestion,
        });
    }

    if lambda > LAMBDA_CAPACITY_SHORTAGE && params.availability_pct < AVAILABILITY_STRESS_PCT {
        insights.push(Insight::CapacityShortage {
            availability_pct: params.availability_pct,
        });
    }

    if (17..=20).contains(&params.hour_of_day) && lambda > LAMBDA_EVENING_PEAK {
        insights.push(Insight::EveningPeak {
            hour_of_day: params.hour_of_day,
        });
    }

    if insights.is_empty() {
        insights.push(Insight::MarketAnalysis);
    }
    insights
}
