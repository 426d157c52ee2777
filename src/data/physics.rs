use super::model::{DerivedArrays, FilteredSeries, MassParameters, ModelError};

// ---------------------------------------------------------------------------
// Physical model: thrust curve → kinematic arrays
// ---------------------------------------------------------------------------

/// Derive instantaneous mass, acceleration, velocity and altitude from a
/// filtered thrust curve.
///
/// Propellant is modelled as depleting linearly over the burn window
/// (first to last retained timestamp); any sample past that window keeps
/// the constant structure mass so depletion can never go negative.
/// Acceleration is `F / m(t)`; velocity and altitude are cumulative
/// trapezoidal integrals starting at zero.
pub fn compute(
    series: &FilteredSeries,
    masses: MassParameters,
) -> Result<DerivedArrays, ModelError> {
    masses.validate()?;

    let t = &series.time_s;
    if t.len() < 2 {
        return Err(ModelError::InsufficientData);
    }
    let t0 = t[0];
    let burn_time = t[t.len() - 1] - t0;
    if burn_time <= 0.0 {
        return Err(ModelError::InsufficientData);
    }

    let structure = masses.structure_kg();
    let mass_kg: Vec<f64> = t
        .iter()
        .map(|&ti| {
            let elapsed = ti - t0;
            if elapsed <= burn_time {
                masses.total_initial_kg - masses.propellant_kg * (elapsed / burn_time)
            } else {
                structure
            }
        })
        .collect();

    let acceleration_m_s2: Vec<f64> = series
        .force_n
        .iter()
        .zip(mass_kg.iter())
        .map(|(&f, &m)| f / m)
        .collect();

    let velocity_m_s = cumulative_trapezoid(&acceleration_m_s2, t);
    let altitude_m = cumulative_trapezoid(&velocity_m_s, t);

    Ok(DerivedArrays {
        mass_kg,
        acceleration_m_s2,
        velocity_m_s,
        altitude_m,
    })
}

// ---------------------------------------------------------------------------
// Trapezoidal quadrature
// ---------------------------------------------------------------------------

/// Cumulative trapezoidal integral of `values` over `time`, first element 0.
///
/// `integral[i] = integral[i-1] + (values[i] + values[i-1]) / 2 * (time[i] - time[i-1])`
pub fn cumulative_trapezoid(values: &[f64], time: &[f64]) -> Vec<f64> {
    debug_assert_eq!(values.len(), time.len());
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(0.0);
    let mut acc = 0.0;
    for i in 1..values.len() {
        acc += (values[i] + values[i - 1]) / 2.0 * (time[i] - time[i - 1]);
        out.push(acc);
    }
    out
}

/// Whole-series trapezoidal integral of `values` over `time`.
pub fn trapezoid(values: &[f64], time: &[f64]) -> f64 {
    debug_assert_eq!(values.len(), time.len());
    (1..values.len())
        .map(|i| (values[i] + values[i - 1]) / 2.0 * (time[i] - time[i - 1]))
        .sum()
}
