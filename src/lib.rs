//! Shadow price calculator for a three-tier, two-region electricity market.

#[cfg(feature = "api")]
pub mod api;
pub mod calculator;
/// Chart specifications and the chart registry.
pub mod charts;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod io;
pub mod logging;
/// Dispatch pricing, insights, and demand sweeps.
pub mod market;
pub mod report;
#[cfg(feature = "tui")]
pub mod tui;
