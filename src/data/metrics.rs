use super::model::{DerivedArrays, FilteredSeries, MassParameters, STANDARD_GRAVITY};
use super::physics::trapezoid;

// ---------------------------------------------------------------------------
// Metrics – the fixed set of scalar results shown on the results card
// ---------------------------------------------------------------------------

/// Summary scalars reduced from one analysed firing.
///
/// Purely a reduction over the series and its derived arrays; rebuilt from
/// scratch after every parameter change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub max_thrust_n: f64,
    pub total_impulse_ns: f64,
    pub burn_time_s: f64,
    pub propellant_mass_kg: f64,
    pub structure_mass_kg: f64,
    pub specific_impulse_s: f64,
    pub final_velocity_m_s: f64,
    pub apogee_m: f64,
    pub time_to_apogee_s: f64,
    pub max_acceleration_m_s2: f64,
    pub thrust_to_weight: f64,
}

/// Reduce a series and its derived arrays into the metrics record.
///
/// Callers must pass arrays produced from this exact series (the model
/// guarantees at least two samples, so `last` indexing is safe here).
pub fn aggregate(
    series: &FilteredSeries,
    derived: &DerivedArrays,
    masses: MassParameters,
) -> Metrics {
    let last = series.len() - 1;
    let burn_time_s = series.time_s[last] - series.time_s[0];

    let max_thrust_n = series
        .force_n
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    let max_acceleration_m_s2 = derived
        .acceleration_m_s2
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);

    let total_impulse_ns = trapezoid(&series.force_n, &series.time_s);

    let specific_impulse_s = if masses.propellant_kg > 0.0 {
        total_impulse_ns / (masses.propellant_kg * STANDARD_GRAVITY)
    } else {
        0.0
    };

    let thrust_to_weight = if masses.total_initial_kg > 0.0 {
        max_thrust_n / (masses.total_initial_kg * STANDARD_GRAVITY)
    } else {
        0.0
    };

    // Unpowered ballistic coast from the end of the measured series up to
    // zero vertical velocity.
    let final_velocity_m_s = derived.velocity_m_s[last];
    let apogee_m =
        derived.altitude_m[last] + final_velocity_m_s.powi(2) / (2.0 * STANDARD_GRAVITY);
    let time_to_apogee_s = series.time_s[last] + final_velocity_m_s / STANDARD_GRAVITY;

    Metrics {
        max_thrust_n,
        total_impulse_ns,
        burn_time_s,
        propellant_mass_kg: masses.propellant_kg,
        structure_mass_kg: masses.structure_kg(),
        specific_impulse_s,
        final_velocity_m_s,
        apogee_m,
        time_to_apogee_s,
        max_acceleration_m_s2,
        thrust_to_weight,
    }
}

/// First maximum of `values` with its timestamp, for plot annotations.
/// Returns `None` for an empty series.
pub fn peak(time: &[f64], values: &[f64]) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64)> = None;
    for (&t, &v) in time.iter().zip(values.iter()) {
        match best {
            Some((_, bv)) if v <= bv => {}
            _ => best = Some((t, v)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::physics::{compute, cumulative_trapezoid};

    const TOL: f64 = 1e-9;

    fn series(time_s: &[f64], force_n: &[f64]) -> FilteredSeries {
        FilteredSeries {
            time_s: time_s.to_vec(),
            force_n: force_n.to_vec(),
        }
    }

    fn analyse(s: &FilteredSeries, masses: MassParameters) -> (DerivedArrays, Metrics) {
        let derived = compute(s, masses).unwrap();
        let metrics = aggregate(s, &derived, masses);
        (derived, metrics)
    }

    #[test]
    fn constant_force_scenario_metrics() {
        let s = series(&[0.0, 0.1, 0.2], &[10.0, 10.0, 10.0]);
        let masses = MassParameters { total_initial_kg: 1.0, propellant_kg: 0.0 };
        let (_, m) = analyse(&s, masses);

        assert!((m.max_thrust_n - 10.0).abs() < TOL);
        assert!((m.total_impulse_ns - 2.0).abs() < TOL);
        assert!((m.burn_time_s - 0.2).abs() < TOL);
        assert!((m.final_velocity_m_s - 2.0).abs() < TOL);
        assert!((m.max_acceleration_m_s2 - 10.0).abs() < TOL);
        // Zero-propellant guards.
        assert_eq!(m.specific_impulse_s, 0.0);
        assert!((m.structure_mass_kg - 1.0).abs() < TOL);
        assert!((m.thrust_to_weight - 10.0 / 9.81).abs() < TOL);
    }

    #[test]
    fn total_impulse_matches_cumulative_integral() {
        let t: Vec<f64> = (0..20).map(|i| i as f64 * 0.05).collect();
        let f: Vec<f64> = t.iter().map(|&ti| 40.0 * (1.0 - ti / 1.0).max(0.0) + 1.0).collect();
        let s = series(&t, &f);
        let masses = MassParameters::default();
        let (_, m) = analyse(&s, masses);

        let cumulative = cumulative_trapezoid(&s.force_n, &s.time_s);
        assert!((m.total_impulse_ns - cumulative.last().unwrap()).abs() < TOL);
    }

    #[test]
    fn apogee_includes_a_nonnegative_ballistic_term() {
        let t: Vec<f64> = (0..30).map(|i| i as f64 * 0.1).collect();
        let f: Vec<f64> = (0..30).map(|i| 60.0 - i as f64).collect();
        let s = series(&t, &f);
        let (derived, m) = analyse(&s, MassParameters::default());

        assert!(m.final_velocity_m_s >= 0.0);
        assert!(m.apogee_m >= *derived.altitude_m.last().unwrap());
        assert!(m.time_to_apogee_s >= *s.time_s.last().unwrap());
    }

    #[test]
    fn structure_mass_is_total_minus_propellant() {
        let s = series(&[0.0, 0.5, 1.0], &[30.0, 40.0, 20.0]);
        let masses = MassParameters { total_initial_kg: 3.2, propellant_kg: 0.7 };
        let (_, m) = analyse(&s, masses);
        assert!((m.structure_mass_kg - 2.5).abs() < TOL);
        assert!((m.propellant_mass_kg - 0.7).abs() < TOL);
    }

    #[test]
    fn specific_impulse_formula() {
        let s = series(&[0.0, 1.0], &[10.0, 10.0]);
        let masses = MassParameters { total_initial_kg: 2.0, propellant_kg: 0.1 };
        let (_, m) = analyse(&s, masses);
        // Impulse = 10 N·s, Isp = 10 / (0.1 * 9.81).
        assert!((m.specific_impulse_s - 10.0 / 0.981).abs() < 1e-6);
    }

    #[test]
    fn peak_returns_the_first_maximum() {
        let t = [0.0, 1.0, 2.0, 3.0];
        let v = [1.0, 7.0, 7.0, 2.0];
        let (pt, pv) = peak(&t, &v).unwrap();
        assert!((pt - 1.0).abs() < TOL);
        assert!((pv - 7.0).abs() < TOL);

        assert!(peak(&[], &[]).is_none());
    }
}
