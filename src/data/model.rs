use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

/// Standard gravity, m/s².  Also converts kilograms-force to newtons.
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Readings at or below this force (in newtons) are treated as load-cell
/// noise and dropped before any modelling.
pub const NOISE_FLOOR_N: f64 = 0.5;

// ---------------------------------------------------------------------------
// Sample – one raw input row
// ---------------------------------------------------------------------------

/// A single load-cell reading as it appears in the source CSV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Raw load-cell reading, kilograms-force.
    pub force_kg: f64,
    /// Raw timestamp, milliseconds.
    pub time_ms: f64,
}

// ---------------------------------------------------------------------------
// FilteredSeries – SI-converted, noise-filtered time series
// ---------------------------------------------------------------------------

/// The thrust curve after unit conversion and noise-floor filtering.
///
/// `time_s` and `force_n` are parallel arrays in original row order.
/// Timestamps are expected non-decreasing; the series may be empty when
/// every reading sat below the noise floor (the model rejects that case).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredSeries {
    /// Timestamps, seconds.
    pub time_s: Vec<f64>,
    /// Net thrust, newtons.
    pub force_n: Vec<f64>,
}

impl FilteredSeries {
    /// Convert raw samples to SI and drop readings below the noise floor.
    pub fn from_samples(samples: &[Sample]) -> Self {
        let mut time_s = Vec::with_capacity(samples.len());
        let mut force_n = Vec::with_capacity(samples.len());
        for s in samples {
            let f_n = s.force_kg * STANDARD_GRAVITY;
            if f_n > NOISE_FLOOR_N {
                force_n.push(f_n);
                time_s.push(s.time_ms / 1000.0);
            }
        }
        FilteredSeries { time_s, force_n }
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    /// Whether every reading was filtered out.
    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }
}

// ---------------------------------------------------------------------------
// MassParameters – operator-supplied scalars
// ---------------------------------------------------------------------------

/// Rocket masses entered by the operator at analysis time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassParameters {
    /// Rocket plus propellant at ignition, kg.
    pub total_initial_kg: f64,
    /// Propellant mass, kg.  Zero models a constant-mass (calibration) run.
    pub propellant_kg: f64,
}

impl MassParameters {
    /// Dry mass left after the propellant is spent, kg.
    pub fn structure_kg(&self) -> f64 {
        self.total_initial_kg - self.propellant_kg
    }

    /// Reject non-physical inputs before they reach the model.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.total_initial_kg <= 0.0
            || self.propellant_kg < 0.0
            || self.propellant_kg > self.total_initial_kg
        {
            return Err(ModelError::InvalidMasses);
        }
        Ok(())
    }
}

impl Default for MassParameters {
    fn default() -> Self {
        MassParameters {
            total_initial_kg: 5.000,
            propellant_kg: 0.400,
        }
    }
}

// ---------------------------------------------------------------------------
// DerivedArrays – per-sample model output
// ---------------------------------------------------------------------------

/// Per-sample kinematic arrays aligned with a [`FilteredSeries`].
///
/// Always rebuilt in full; never patched in place.  Consumers (plots,
/// metrics) treat these as read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedArrays {
    /// Instantaneous vehicle mass, kg.
    pub mass_kg: Vec<f64>,
    /// Acceleration, m/s².
    pub acceleration_m_s2: Vec<f64>,
    /// Velocity (time integral of acceleration), m/s.
    pub velocity_m_s: Vec<f64>,
    /// Altitude (time integral of velocity), m.
    pub altitude_m: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures while reading the source CSV.  The caller must not proceed to
/// modelling; the user picks another file.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("CSV row {row}: {source}")]
    BadRecord {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("CSV row {row}, column '{column}': '{value}' is not a number")]
    BadNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("CSV contains no data rows")]
    Empty,
}

/// Failures in the physical model.  The user must correct inputs or load
/// better data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("need at least two samples above the noise floor spanning a positive burn time")]
    InsufficientData,

    #[error("masses must be positive and propellant mass must not exceed the total initial mass")]
    InvalidMasses,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filtering_converts_units_and_drops_noise() {
        let samples = [
            Sample { force_kg: 0.01, time_ms: 0.0 },   // 0.0981 N, below floor
            Sample { force_kg: 1.0, time_ms: 100.0 },  // 9.81 N
            Sample { force_kg: 0.05, time_ms: 200.0 }, // 0.4905 N, below floor
            Sample { force_kg: 2.0, time_ms: 300.0 },  // 19.62 N
        ];
        let series = FilteredSeries::from_samples(&samples);

        assert_eq!(series.len(), 2);
        assert!((series.force_n[0] - 9.81).abs() < 1e-12);
        assert!((series.force_n[1] - 19.62).abs() < 1e-12);
        assert!((series.time_s[0] - 0.1).abs() < 1e-12);
        assert!((series.time_s[1] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn filtering_is_idempotent() {
        let samples = [
            Sample { force_kg: 0.02, time_ms: 0.0 },
            Sample { force_kg: 1.5, time_ms: 50.0 },
            Sample { force_kg: 2.5, time_ms: 100.0 },
        ];
        let once = FilteredSeries::from_samples(&samples);

        // Feed the filtered series back through the filter.
        let round_trip: Vec<Sample> = once
            .time_s
            .iter()
            .zip(once.force_n.iter())
            .map(|(&t, &f)| Sample {
                force_kg: f / STANDARD_GRAVITY,
                time_ms: t * 1000.0,
            })
            .collect();
        let twice = FilteredSeries::from_samples(&round_trip);

        assert_eq!(once.len(), twice.len());
        for i in 0..once.len() {
            assert!((once.time_s[i] - twice.time_s[i]).abs() < 1e-9);
            assert!((once.force_n[i] - twice.force_n[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn all_noise_yields_empty_series() {
        let samples = [
            Sample { force_kg: 0.0, time_ms: 0.0 },
            Sample { force_kg: 0.01, time_ms: 10.0 },
        ];
        assert!(FilteredSeries::from_samples(&samples).is_empty());
    }

    #[test]
    fn mass_validation() {
        let ok = MassParameters { total_initial_kg: 5.0, propellant_kg: 0.4 };
        assert!(ok.validate().is_ok());
        assert!((ok.structure_kg() - 4.6).abs() < 1e-12);

        // Zero propellant is a valid constant-mass configuration.
        let constant = MassParameters { total_initial_kg: 1.0, propellant_kg: 0.0 };
        assert!(constant.validate().is_ok());

        let negative_prop = MassParameters { total_initial_kg: 5.0, propellant_kg: -0.1 };
        assert_eq!(negative_prop.validate(), Err(ModelError::InvalidMasses));

        let prop_exceeds_total = MassParameters { total_initial_kg: 0.3, propellant_kg: 0.4 };
        assert_eq!(prop_exceeds_total.validate(), Err(ModelError::InvalidMasses));

        let zero_total = MassParameters { total_initial_kg: 0.0, propellant_kg: 0.0 };
        assert_eq!(zero_total.validate(), Err(ModelError::InvalidMasses));
    }
}
