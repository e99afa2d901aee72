//! Human-readable rendering of calculator state.

use std::fmt;

use crate::calculator::Calculator;
use crate::config::SliderKey;

/// Formats a whole number with `,` thousands separators.
///
/// Non-finite values print as `inf`, `-inf` or `NaN`.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Display text for a slider position: rounded availability, weather label,
/// `HH:00` for time, and the raw value otherwise.
pub fn slider_display(key: SliderKey, value: f64, weather_labels: &[String]) -> String {
    match key {
        SliderKey::Availability => format!("{}", value.round()),
        SliderKey::Weather => {
            let idx = (value.round() as usize).saturating_sub(1);
            weather_labels
                .get(idx)
                .cloned()
                .unwrap_or_else(|| format!("{value}"))
        }
        SliderKey::Time => format!("{}:00", value.round()),
        SliderKey::Demand | SliderKey::Transmission => format!("{value}"),
    }
}

/// Result card titles, in display order.
pub const CARD_TITLES: [&str; 6] = [
    "System Lambda",
    "Congestion Cost",
    "LMP Region 1",
    "LMP Region 2",
    "Price Spread",
    "Total Cost",
];

/// Text report of sliders, result cards, generation mix and insights.
pub struct PriceReport<'a> {
    calculator: &'a Calculator,
}

impl<'a> PriceReport<'a> {
    pub fn new(calculator: &'a Calculator) -> Self {
        Self { calculator }
    }
}

impl fmt::Display for PriceReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let calc = self.calculator;
        let cfg = calc.config();
        let r = calc.results();

        writeln!(f, "--- Market Parameters ---")?;
        for key in SliderKey::ALL {
            let slider = cfg.sliders.get(key);
            let shown = slider_display(key, calc.value(key), &cfg.weather_labels);
            let unit = if key == SliderKey::Time { "" } else { &slider.unit };
            writeln!(f, "{:<24}{shown}{unit}", format!("{}:", slider.label))?;
        }

        writeln!(f, "\n--- Shadow Price Results ---")?;
        let prices = [
            r.system_lambda,
            r.congestion_cost,
            r.lmp_region1,
            r.lmp_region2,
            r.price_spread,
        ];
        for (title, value) in CARD_TITLES.iter().zip(prices) {
            writeln!(f, "{:<24}${}/MWh", format!("{title}:"), format_thousands(value))?;
        }
        writeln!(
            f,
            "{:<24}${}/hr",
            format!("{}:", CARD_TITLES[5]),
            format_thousands(r.total_cost)
        )?;
        writeln!(
            f,
            "{:<24}{} MW (coal {:.1}, gas {:.1}, peaker {:.1})",
            "Adjusted Demand:",
            format_thousands(r.adjusted_demand),
            r.generation_mix.coal,
            r.generation_mix.gas,
            r.generation_mix.peaker,
        )?;

        writeln!(f, "\n--- Market Insights ---")?;
        let mut insights = calc.insights().iter().peekable();
        while let Some(insight) = insights.next() {
            if insights.peek().is_some() {
                writeln!(f, "{insight}")?;
            } else {
                write!(f, "{insight}")?;
            }
        }
        Ok(())
    }
}
