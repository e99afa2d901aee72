//! Color constants and threshold helpers for the TUI.

use ratatui::style::Color;

use crate::market::fleet::TierKind;
use crate::market::insights::{LAMBDA_NORMAL, LAMBDA_WARNING, Severity};

/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Selected slider highlight.
pub const SELECTED_FG: Color = Color::Cyan;
/// Supply curve line color.
pub const SUPPLY_COLOR: Color = Color::Blue;
/// Demand marker line color.
pub const DEMAND_COLOR: Color = Color::Red;

/// Bar color for a generation tier.
pub fn tier_color(kind: TierKind) -> Color {
    match kind {
        TierKind::Coal => Color::Gray,
        TierKind::Gas => Color::Blue,
        TierKind::Peaker => Color::Red,
    }
}

/// Returns a color for a price level: green at or below normal, yellow
/// up to the warning threshold, red above it.
pub fn price_color(system_lambda: f64) -> Color {
    if system_lambda <= LAMBDA_NORMAL {
        Color::Green
    } else if system_lambda <= LAMBDA_WARNING {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Normal => Color::Green,
        Severity::Info => Color::Cyan,
        Severity::Warning => Color::Yellow,
        Severity::Severe => Color::Red,
    }
}

/// Y-axis upper bound for the supply chart with 10% headroom.
///
/// Scarcity-escalated prices are clipped so the tier steps stay readable.
pub fn supply_bound_y(peaker_cost: f64) -> f64 {
    if peaker_cost.is_finite() && peaker_cost > 0.0 {
        peaker_cost * 1.1
    } else {
        1.0
    }
}
