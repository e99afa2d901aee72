//! Static generator fleet: the three merit-order tiers and per-tier values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generator tier identity, ordered by dispatch priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierKind {
    /// Baseload coal units (cheapest, dispatched first).
    Coal,
    /// Gas units located behind the constrained transmission path.
    Gas,
    /// Peaking units (most expensive, dispatched last).
    Peaker,
}

impl TierKind {
    /// All tiers in merit order.
    pub const ALL: [Self; 3] = [Self::Coal, Self::Gas, Self::Peaker];

    /// Lowercase tier name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Coal => "coal",
            Self::Gas => "gas",
            Self::Peaker => "peaker",
        }
    }
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One generator tier: installed capacity and marginal cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorTier {
    /// Installed capacity (MW, > 0).
    pub capacity_mw: f64,
    /// Marginal cost ($/MWh, > 0).
    pub marginal_cost: f64,
}

impl GeneratorTier {
    pub const fn new(capacity_mw: f64, marginal_cost: f64) -> Self {
        Self {
            capacity_mw,
            marginal_cost,
        }
    }
}

/// A value per tier (MW dispatched, MW available, ...).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TierValues {
    pub coal: f64,
    pub gas: f64,
    pub peaker: f64,
}

impl TierValues {
    /// Returns the value for `kind`.
    pub fn get(&self, kind: TierKind) -> f64 {
        match kind {
            TierKind::Coal => self.coal,
            TierKind::Gas => self.gas,
            TierKind::Peaker => self.peaker,
        }
    }

    /// Sum across all tiers.
    pub fn total(&self) -> f64 {
        self.coal + self.gas + self.peaker
    }
}

/// The generator fleet in merit order.
///
/// # Examples
///
/// ```
/// use shadow_price::market::fleet::Fleet;
///
/// let fleet = Fleet::default();
/// let eff = fleet.effective_capacities(0.5);
/// assert_eq!(eff.coal, 50.0);
/// assert_eq!(eff.gas, 75.0);
/// assert_eq!(eff.peaker, 25.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Fleet {
    pub coal: GeneratorTier,
    pub gas: GeneratorTier,
    pub peaker: GeneratorTier,
}

impl Default for Fleet {
    fn default() -> Self {
        Self {
            coal: GeneratorTier::new(100.0, 25.0),
            gas: GeneratorTier::new(150.0, 45.0),
            peaker: GeneratorTier::new(50.0, 150.0),
        }
    }
}

impl Fleet {
    /// Returns the tier for `kind`.
    pub fn tier(&self, kind: TierKind) -> &GeneratorTier {
        match kind {
            TierKind::Coal => &self.coal,
            TierKind::Gas => &self.gas,
            TierKind::Peaker => &self.peaker,
        }
    }

    /// Installed capacity of each tier scaled by the availability fraction.
    pub fn effective_capacities(&self, availability_fraction: f64) -> TierValues {
        TierValues {
            coal: self.coal.capacity_mw * availability_fraction,
            gas: self.gas.capacity_mw * availability_fraction,
            peaker: self.peaker.capacity_mw * availability_fraction,
        }
    }

    /// Stepped supply curve as `(cumulative_mw, marginal_cost)` points.
    ///
    /// Starts at zero capacity with the coal cost and adds one point at the
    /// end of each tier, so the default fleet yields
    /// `[(0,25), (100,25), (250,45), (300,150)]`.
    pub fn merit_order_curve(&self) -> Vec<(f64, f64)> {
        let mut points = Vec::with_capacity(TierKind::ALL.len() + 1);
        points.push((0.0, self.coal.marginal_cost));
        let mut cumulative = 0.0;
        for kind in TierKind::ALL {
            let tier = self.tier(kind);
            cumulative += tier.capacity_mw;
            points.push((cumulative, tier.marginal_cost));
        }
        points
    }
}
