/// Data layer: core types, ingestion, physical model, and metrics.
///
/// Architecture:
/// ```text
///      .csv (Fuerza_kg, Tiempo_ms)
///            │
///            ▼
///      ┌──────────┐
///      │  loader   │  parse rows → SI units → noise-floor filter
///      └──────────┘
///            │
///            ▼
///      ┌────────────────┐
///      │ FilteredSeries  │  time_s[], force_n[]
///      └────────────────┘
///            │  + MassParameters
///            ▼
///      ┌──────────┐
///      │ physics   │  mass, acceleration, velocity, altitude
///      └──────────┘
///            │
///            ▼
///      ┌──────────┐
///      │ metrics   │  impulse, Isp, apogee, thrust/weight, ...
///      └──────────┘
/// ```
pub mod loader;
pub mod metrics;
pub mod model;
pub mod physics;

use metrics::Metrics;
use model::{DerivedArrays, FilteredSeries, MassParameters, ModelError};

// ---------------------------------------------------------------------------
// Analysis – one atomically published snapshot
// ---------------------------------------------------------------------------

/// Derived arrays and metrics computed together from one series and one set
/// of mass parameters.  Consumers only ever see the pair as a unit, so a
/// plot can never show arrays from one firing next to metrics from another.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub masses: MassParameters,
    pub derived: DerivedArrays,
    pub metrics: Metrics,
}

/// Run the full pipeline tail: physical model, then metric reduction.
pub fn analyze(series: &FilteredSeries, masses: MassParameters) -> Result<Analysis, ModelError> {
    let derived = physics::compute(series, masses)?;
    let metrics = metrics::aggregate(series, &derived, masses);
    Ok(Analysis {
        masses,
        derived,
        metrics,
    })
}
