//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::process::{Command, Output};

use shadow_price::market::params::MarketParameters;

/// Market parameters from positional values.
pub fn params(
    demand: f64,
    transmission_capacity: f64,
    availability_pct: f64,
    hour_of_day: u8,
    weather_level: u8,
) -> MarketParameters {
    MarketParameters {
        demand,
        transmission_capacity,
        availability_pct,
        hour_of_day,
        weather_level,
    }
}

/// Runs the `shadow-price` binary with `args` and returns its output.
pub fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shadow-price"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("shadow-price process should run")
}

/// Runs the binary, asserts success, and returns stdout.
pub fn run_cli_ok(args: &[&str]) -> String {
    let output = run_cli(args);
    assert!(
        output.status.success(),
        "shadow-price {args:?} failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout should be valid UTF-8")
}

/// Parses a `$1,234/unit` report value from the line starting with `label`.
pub fn parse_dollars(stdout: &str, label: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing line `{label}` in output: {stdout}"));

    let raw = line
        .split_once('$')
        .map(|(_, right)| right.split('/').next().unwrap_or("").replace(',', ""))
        .unwrap_or_else(|| panic!("invalid price format for line `{line}`"));

    raw.trim()
        .parse::<f64>()
        .unwrap_or_else(|_| panic!("failed to parse `{raw}` from line `{line}`"))
}
