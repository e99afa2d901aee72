//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap,
};

use super::runtime::App;
use super::style;
use crate::config::SliderKey;
use crate::market::fleet::TierKind;
use crate::report::{format_thousands, slider_display};

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(7), // sliders + results
            Constraint::Min(10),   // supply chart + mix
            Constraint::Length(7), // insights
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(28)])
        .split(chunks[2]);

    render_header(frame, app, chunks[0]);
    render_sliders(frame, app, top[0]);
    render_results(frame, app, top[1]);
    render_supply_chart(frame, app, middle[0]);
    render_mix(frame, app, middle[1]);
    render_insights(frame, app, chunks[3]);
    render_footer(frame, chunks[4]);
}

/// Header bar: preset name and instance id.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let header = Line::from(vec![
        Span::styled(
            " SHADOW-PRICE ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            &app.preset_name,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" │ {} ", app.calculator().id())),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_sliders(frame: &mut Frame, app: &App, area: Rect) {
    let calc = app.calculator();
    let cfg = calc.config();
    let selected = app.selected_key();

    let lines: Vec<Line> = SliderKey::ALL
        .iter()
        .map(|&key| {
            let slider = cfg.sliders.get(key);
            let shown = slider_display(key, calc.value(key), &cfg.weather_labels);
            let unit = if key == SliderKey::Time { "" } else { &slider.unit };
            let text = format!("{:<24}{shown}{unit}", slider.label);
            if key == selected {
                Line::from(Span::styled(
                    format!("▶ {text}"),
                    Style::default()
                        .fg(style::SELECTED_FG)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("  {text}"))
            }
        })
        .collect();

    let block = Block::default()
        .title(" Market Parameters ")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let r = app.calculator().results();
    let price_style = Style::default()
        .fg(style::price_color(r.system_lambda))
        .add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![
            Span::raw("  System Lambda   "),
            Span::styled(
                format!("${}/MWh", format_thousands(r.system_lambda)),
                price_style,
            ),
        ]),
        Line::from(format!(
            "  Congestion Cost ${}/MWh",
            format_thousands(r.congestion_cost)
        )),
        Line::from(format!(
            "  LMP R1/R2       ${} / ${}",
            format_thousands(r.lmp_region1),
            format_thousands(r.lmp_region2)
        )),
        Line::from(format!(
            "  Price Spread    ${}/MWh",
            format_thousands(r.price_spread)
        )),
        Line::from(format!(
            "  Total Cost      ${}/hr  ({} sets price)",
            format_thousands(r.total_cost),
            r.price_setter
        )),
    ];

    let block = Block::default()
        .title(" Shadow Price Results ")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Derated supply curve with the adjusted demand marker.
fn render_supply_chart(frame: &mut Frame, app: &App, area: Rect) {
    let calc = app.calculator();
    let fleet = calc.pricer().fleet();
    let r = calc.results();

    let mut supply: Vec<(f64, f64)> = Vec::with_capacity(TierKind::ALL.len() * 2);
    let mut cumulative = 0.0;
    for kind in TierKind::ALL {
        let cost = fleet.tier(kind).marginal_cost;
        supply.push((cumulative, cost));
        cumulative += r.effective_capacities.get(kind);
        supply.push((cumulative, cost));
    }

    let y_hi = style::supply_bound_y(fleet.peaker.marginal_cost);
    let demand_x = r.adjusted_demand;
    let demand_line = [(demand_x, 0.0), (demand_x, r.system_lambda.min(y_hi))];
    let x_hi = cumulative.max(demand_x).max(1.0) * 1.05;

    let datasets = vec![
        Dataset::default()
            .name("Supply")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(style::SUPPLY_COLOR))
            .data(&supply),
        Dataset::default()
            .name("Demand")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(style::DEMAND_COLOR))
            .data(&demand_line),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Merit Order (available capacity) ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("MW")
                .bounds([0.0, x_hi])
                .labels(vec!["0".to_string(), format!("{x_hi:.0}")]),
        )
        .y_axis(
            Axis::default()
                .title("$/MWh")
                .bounds([0.0, y_hi])
                .labels(vec!["0".to_string(), format!("{y_hi:.0}")]),
        );

    frame.render_widget(chart, area);
}

/// Dispatched MW per tier.
fn render_mix(frame: &mut Frame, app: &App, area: Rect) {
    let mix = app.calculator().results().generation_mix;
    let bars: Vec<Bar> = TierKind::ALL
        .iter()
        .map(|&kind| {
            Bar::default()
                .label(Line::from(kind.name()))
                .value(mix.get(kind).max(0.0).round() as u64)
                .style(Style::default().fg(style::tier_color(kind)))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().title(" Dispatch MW ").borders(Borders::ALL))
        .data(BarGroup::default().bars(&bars))
        .bar_width(6)
        .bar_gap(2)
        .value_style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(chart, area);
}

fn render_insights(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .calculator()
        .insights()
        .iter()
        .map(|insight| {
            Line::from(vec![
                Span::styled(
                    format!(" {}: ", insight.title()),
                    Style::default()
                        .fg(style::severity_color(insight.severity()))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(insight.message()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Market Insights ")
        .borders(Borders::ALL);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  ↑/↓:Select  ←/→:Adjust  PgUp/PgDn:×5  1-5:Preset  r:Reset",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
