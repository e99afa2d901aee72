//! CSV export for demand sweeps.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::market::sweep::SweepPoint;

/// Column header for sweep CSV export.
const HEADER: &str = "demand,adjusted_demand,system_lambda,congestion_cost,\
                       lmp_region1,lmp_region2,price_spread,total_cost,\
                       coal_mw,gas_mw,peaker_mw";

/// Exports sweep points to a CSV file at the given path.
///
/// Writes a header row followed by one row per point. Prices are already
/// rounded and print as integers; generation columns keep four decimals.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(points: &[SweepPoint], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(points, buf)
}

/// Writes sweep points as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(points: &[SweepPoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for p in points {
        let r = &p.result;
        wtr.write_record(&[
            p.demand.to_string(),
            format!("{:.4}", r.adjusted_demand),
            r.system_lambda.to_string(),
            r.congestion_cost.to_string(),
            r.lmp_region1.to_string(),
            r.lmp_region2.to_string(),
            r.price_spread.to_string(),
            r.total_cost.to_string(),
            format!("{:.4}", r.generation_mix.coal),
            format!("{:.4}", r.generation_mix.gas),
            format!("{:.4}", r.generation_mix.peaker),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::params::MarketParameters;
    use crate::market::pricer::DispatchPricer;
    use crate::market::sweep::DemandSweep;

    fn points(from: f64, to: f64, step: f64) -> Vec<SweepPoint> {
        DemandSweep::new(from, to, step)
            .expect("valid range")
            .run(&DispatchPricer::default(), &MarketParameters::default())
    }

    fn render(points: &[SweepPoint]) -> String {
        let mut buf = Vec::new();
        write_csv(points, &mut buf).expect("write to Vec should succeed");
        String::from_utf8(buf).expect("CSV output is UTF-8")
    }

    #[test]
    fn header_lists_all_columns() {
        let output = render(&points(200.0, 200.0, 10.0));
        let first_line = output.lines().next().expect("header line");
        assert_eq!(
            first_line,
            "demand,adjusted_demand,system_lambda,congestion_cost,\
             lmp_region1,lmp_region2,price_spread,total_cost,\
             coal_mw,gas_mw,peaker_mw"
        );
    }

    #[test]
    fn one_row_per_point() {
        let output = render(&points(150.0, 300.0, 10.0));
        // 1 header + 16 data rows
        assert_eq!(output.lines().count(), 17);
    }

    #[test]
    fn rows_parse_back() {
        let pts = points(150.0, 190.0, 20.0);
        let output = render(&pts);

        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let mut lambdas = Vec::new();
        for record in rdr.records() {
            let rec = record.expect("every row should parse");
            assert_eq!(rec.len(), 11);
            for field in rec.iter() {
                assert!(field.parse::<f64>().is_ok(), "{field} should parse as f64");
            }
            lambdas.push(rec[2].parse::<f64>().unwrap());
        }
        let expected: Vec<f64> = pts.iter().map(|p| p.result.system_lambda).collect();
        assert_eq!(lambdas, expected);
    }

    #[test]
    fn unbounded_prices_are_written() {
        let pricer = DispatchPricer::default();
        let base = MarketParameters {
            availability_pct: 0.0,
            ..MarketParameters::default()
        };
        let pts = DemandSweep::new(200.0, 200.0, 1.0)
            .expect("valid range")
            .run(&pricer, &base);
        let output = render(&pts);
        assert!(output.lines().nth(1).is_some_and(|l| l.contains("inf")));
    }
}
