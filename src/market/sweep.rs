//! Demand-sensitivity sweep over the pricer.

use serde::Serialize;
use thiserror::Error;

use super::params::MarketParameters;
use super::pricer::{DispatchPricer, DispatchResult};

/// Invalid sweep range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    #[error("sweep step must be > 0, got {0}")]
    NonPositiveStep(f64),
    #[error("sweep `from` ({from}) must be <= `to` ({to})")]
    InvertedRange { from: f64, to: f64 },
    #[error("sweep bounds must be finite")]
    NonFinite,
}

/// One priced point of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    /// Raw (pre-multiplier) demand used for this point (MW).
    pub demand: f64,
    pub result: DispatchResult,
}

/// Inclusive demand range walked in fixed steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandSweep {
    from: f64,
    to: f64,
    step: f64,
}

impl DemandSweep {
    /// Creates a sweep over `from..=to`.
    ///
    /// # Errors
    ///
    /// Returns a `SweepError` if a bound is not finite, `step <= 0`, or
    /// `from > to`.
    pub fn new(from: f64, to: f64, step: f64) -> Result<Self, SweepError> {
        if !(from.is_finite() && to.is_finite() && step.is_finite()) {
            return Err(SweepError::NonFinite);
        }
        if step <= 0.0 {
            return Err(SweepError::NonPositiveStep(step));
        }
        if from > to {
            return Err(SweepError::InvertedRange { from, to });
        }
        Ok(Self { from, to, step })
    }

    /// Number of demand values visited. Always at least one.
    ///
    /// Saturates at `usize::MAX` when the range holds more steps than fit,
    /// so callers can reject oversized sweeps by comparing against a limit.
    pub fn point_count(&self) -> usize {
        let steps = ((self.to - self.from) / self.step + 1e-9).floor();
        // `as` saturates: infinite ratios map to usize::MAX
        (steps as usize).saturating_add(1)
    }

    /// Demand values visited, computed as `from + i * step` to avoid drift.
    pub fn demands(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.point_count()).map(move |i| self.from + i as f64 * self.step)
    }

    /// Prices every demand value with the other parameters taken from `base`.
    pub fn run(&self, pricer: &DispatchPricer, base: &MarketParameters) -> Vec<SweepPoint> {
        self.demands()
            .map(|demand| {
                let params = MarketParameters { demand, ..*base };
                SweepPoint {
                    demand,
                    result: pricer.price(&params),
                }
            })
            .collect()
    }
}
