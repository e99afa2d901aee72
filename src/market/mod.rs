/// Generator tiers and the static fleet table.
pub mod fleet;
pub mod insights;
/// Market input parameters.
pub mod params;
pub mod pricer;
/// Demand-sensitivity sweeps.
pub mod sweep;
