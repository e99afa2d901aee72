//! Command-line argument parsing for the `shadow-price` binary.

use std::env;
use std::path::PathBuf;

use crate::calculator::ParameterUpdate;

/// Default port for `--serve`.
#[cfg(feature = "api")]
pub const DEFAULT_PORT: u16 = 3000;

/// Parsed CLI arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    /// Slider overrides applied after the configuration is loaded.
    pub overrides: ParameterUpdate,
    /// Print the snapshot as JSON instead of the text report.
    pub json: bool,
    pub sweep_out: Option<PathBuf>,
    /// Write every default chart plus the calculator snapshot as JSON.
    pub charts_out: Option<PathBuf>,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: u16,
    #[cfg(feature = "tui")]
    pub tui: bool,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

/// Parses arguments (without the program name).
///
/// `--help` prints usage and exits the process.
///
/// # Errors
///
/// Returns a message for unknown flags, missing or malformed values,
/// repeated flags, and `--config` combined with `--preset`.
pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut config = None;
    let mut preset = None;
    let mut overrides = ParameterUpdate::default();
    let mut json = false;
    let mut sweep_out = None;
    let mut charts_out = None;
    #[cfg(feature = "api")]
    let mut serve = false;
    #[cfg(feature = "api")]
    let mut port = DEFAULT_PORT;
    #[cfg(feature = "tui")]
    let mut tui = false;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --config (expected a TOML file path)",
                )?;
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            flag @ ("--demand" | "--transmission" | "--availability" | "--hour"
            | "--weather") => {
                i += 1;
                let raw = args.next_or_err(i, &format!("missing value for {flag}"))?;
                let value = parse_number(flag, raw)?;
                let slot = match flag {
                    "--demand" => &mut overrides.demand,
                    "--transmission" => &mut overrides.transmission,
                    "--availability" => &mut overrides.availability,
                    "--hour" => &mut overrides.time,
                    _ => &mut overrides.weather,
                };
                if slot.replace(value).is_some() {
                    return Err(format!("{flag} provided more than once"));
                }
            }
            "--json" => json = true,
            "--sweep-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --sweep-out (expected a file path)")?;
                if sweep_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--sweep-out provided more than once".to_string());
                }
            }
            "--charts-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --charts-out (expected a file path)")?;
                if charts_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--charts-out provided more than once".to_string());
                }
            }
            #[cfg(feature = "api")]
            "--serve" => serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            #[cfg(feature = "tui")]
            "--tui" => tui = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if config.is_some() && preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    Ok(CliOptions {
        config,
        preset,
        overrides,
        json,
        sweep_out,
        charts_out,
        #[cfg(feature = "api")]
        serve,
        #[cfg(feature = "api")]
        port,
        #[cfg(feature = "tui")]
        tui,
    })
}

fn parse_number(flag: &str, raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("{flag} value \"{raw}\" is not a finite number")),
    }
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("shadow-price: economic dispatch shadow price calculator");
    eprintln!();
    eprintln!("Usage: shadow-price [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load configuration from a TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (default, evening_peak,");
    eprintln!("                           heatwave, outage, congested)");
    eprintln!("  --demand <MW>            System demand");
    eprintln!("  --transmission <MW>      Transmission capacity");
    eprintln!("  --availability <pct>     Generator availability");
    eprintln!("  --hour <0-23>            Hour of day");
    eprintln!("  --weather <1-5>          Weather stress level");
    eprintln!("  --json                   Print a JSON snapshot instead of the report");
    eprintln!("  --sweep-out <path>       Export a demand sweep to CSV");
    eprintln!("  --charts-out <path>      Export all default chart specs to JSON");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start the REST API server");
        eprintln!("  --port <u16>             API server port (default: {DEFAULT_PORT})");
    }
    #[cfg(feature = "tui")]
    eprintln!("  --tui                    Launch the interactive terminal calculator");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Parameter values are clamped and snapped to the configured slider ranges.");
}

#[cfg(test)]
mod tests {
    use super::parse_args_from;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn defaults_with_no_arguments() {
        let opts = parse_args_from(Vec::new()).expect("parse should succeed");
        assert!(opts.config.is_none());
        assert!(opts.preset.is_none());
        assert!(!opts.json);
        assert_eq!(opts.overrides, Default::default());
    }

    #[test]
    fn supports_config_cli() {
        let opts = parse_args_from(args(&["--config", "market.toml"]))
            .expect("parse should succeed");
        assert_eq!(
            opts.config.as_deref().and_then(|p| p.to_str()),
            Some("market.toml")
        );
        assert!(opts.preset.is_none());
    }

    #[test]
    fn parses_parameter_overrides() {
        let opts = parse_args_from(args(&[
            "--preset", "heatwave", "--demand", "250", "--hour", "8", "--json",
        ]))
        .expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("heatwave"));
        assert_eq!(opts.overrides.demand, Some(250.0));
        assert_eq!(opts.overrides.time, Some(8.0));
        assert!(opts.overrides.weather.is_none());
        assert!(opts.json);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args_from(args(&["--demand"])).is_err());
        assert!(parse_args_from(args(&["--demand", "lots"])).is_err());
        assert!(parse_args_from(args(&["--demand", "NaN"])).is_err());
        assert!(parse_args_from(args(&["--weather", "2", "--weather", "3"])).is_err());
        assert!(parse_args_from(args(&["--bogus"])).is_err());
        assert!(parse_args_from(args(&["--config", "a.toml", "--preset", "default"])).is_err());
    }
}
