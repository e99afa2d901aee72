//! shadow-price entry point: CLI wiring and config-driven calculator construction.

use std::fs;
use std::path::Path;
use std::process;

use tracing::info;

use shadow_price::calculator::Calculator;
use shadow_price::cli::{CliOptions, parse_args, print_usage};
use shadow_price::charts::{ChartKind, ChartOverrides};
use shadow_price::config::CalculatorConfig;
use shadow_price::dashboard::Dashboard;
use shadow_price::io::export::export_csv;
use shadow_price::logging;
use shadow_price::market::sweep::DemandSweep;
use shadow_price::report::PriceReport;

/// Loads the configuration: `--config` takes priority, then `--preset`, then defaults.
fn load_config(cli: &CliOptions) -> CalculatorConfig {
    let loaded = if let Some(ref path) = cli.config {
        CalculatorConfig::from_toml_file(path)
    } else if let Some(ref name) = cli.preset {
        CalculatorConfig::from_preset(name)
    } else {
        Ok(CalculatorConfig::default())
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    })
}

fn source_name(cli: &CliOptions) -> String {
    if let Some(ref path) = cli.config {
        path.display().to_string()
    } else {
        cli.preset.clone().unwrap_or_else(|| "default".to_string())
    }
}

fn export_sweep(calculator: &Calculator, path: &Path) {
    let demand = &calculator.config().sliders.demand;
    let sweep = DemandSweep::new(demand.min, demand.max, demand.step).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });
    let points = sweep.run(calculator.pricer(), &calculator.values());
    if let Err(e) = export_csv(&points, path) {
        eprintln!("error: failed to write CSV: {e}");
        process::exit(1);
    }
    info!(path = %path.display(), points = points.len(), "sweep exported");
}

fn export_charts(calculator: &Calculator, path: &Path) {
    let mut dashboard = Dashboard::new(*calculator.pricer());
    for kind in ChartKind::ALL {
        dashboard
            .charts_mut()
            .create(kind, None, ChartOverrides::default());
    }
    dashboard.add_calculator(calculator.clone());

    let written = serde_json::to_string_pretty(&dashboard.export())
        .map_err(|e| e.to_string())
        .and_then(|json| fs::write(path, json).map_err(|e| e.to_string()));
    if let Err(e) = written {
        eprintln!("error: failed to write charts: {e}");
        process::exit(1);
    }
    info!(path = %path.display(), charts = dashboard.charts().len(), "charts exported");
}

fn main() {
    let cli = parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        print_usage();
        process::exit(1);
    });

    #[cfg(feature = "tui")]
    let interactive = cli.tui;
    #[cfg(not(feature = "tui"))]
    let interactive = false;
    // The TUI owns the terminal, so it only logs when RUST_LOG asks for it.
    logging::init(if interactive { "off" } else { "info" });

    let config = load_config(&cli);
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    #[cfg(feature = "tui")]
    if cli.tui {
        let mut app = shadow_price::tui::runtime::App::new(config, &source_name(&cli))
            .unwrap_or_else(|_| process::exit(1));
        app.set_values(cli.overrides);
        if let Err(e) = shadow_price::tui::run(app) {
            eprintln!("error: TUI crashed: {e}");
            process::exit(1);
        }
        return;
    }

    let mut calculator = Calculator::new(config).unwrap_or_else(|_| process::exit(1));
    calculator.set_values(cli.overrides);
    info!(
        calculator = calculator.id(),
        source = %source_name(&cli),
        "calculator ready"
    );

    if cli.json {
        match serde_json::to_string_pretty(&calculator.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize snapshot: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("{}", PriceReport::new(&calculator));
    }

    if let Some(ref path) = cli.sweep_out {
        export_sweep(&calculator, path);
    }

    if let Some(ref path) = cli.charts_out {
        export_charts(&calculator, path);
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(shadow_price::api::AppState::new(
            calculator.config().clone(),
        ));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(shadow_price::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
