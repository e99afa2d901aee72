//! Chart specifications and the owned chart registry.

/// Colour constants and hex conversion.
pub mod palette;
pub mod registry;
pub mod spec;

pub use registry::ChartRegistry;
pub use spec::{ChartKind, ChartOverrides, ChartSpec};
