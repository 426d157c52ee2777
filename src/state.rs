use std::path::Path;

use crate::capture::{available_ports, CaptureConfig, CaptureEvent, CaptureWorker};
use crate::data::model::{FilteredSeries, MassParameters};
use crate::data::{analyze, loader, Analysis};

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Which plot the central panel shows.  The series names are part of the
/// data contract with the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Thrust,
    Velocity,
    Altitude,
}

impl Channel {
    /// Wire name of the series as exposed to the display surface.
    pub fn series_name(self) -> &'static str {
        match self {
            Channel::Thrust => "Fuerza_N",
            Channel::Velocity => "velocidad",
            Channel::Altitude => "altura",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Channel::Thrust => "Thrust (N)",
            Channel::Velocity => "Velocity (m/s)",
            Channel::Altitude => "Altitude (m)",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Channel::Thrust => "N",
            Channel::Velocity => "m/s",
            Channel::Altitude => "m",
        }
    }
}

/// What the central panel is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Plot(Channel),
    Results,
    Capture,
}

// ---------------------------------------------------------------------------
// Capture session state
// ---------------------------------------------------------------------------

/// UI-side state of the serial capture feature.  Shares nothing with the
/// compute pipeline; lines arrive over the worker's channel.
pub struct CaptureState {
    pub ports: Vec<String>,
    pub selected_port: String,
    pub baud: u32,
    pub output_name: String,
    pub log: Vec<String>,
    pub worker: Option<CaptureWorker>,
}

impl Default for CaptureState {
    fn default() -> Self {
        let ports = available_ports();
        let selected_port = ports.first().cloned().unwrap_or_default();
        CaptureState {
            ports,
            selected_port,
            baud: 9600,
            output_name: "capture.csv".to_string(),
            log: Vec::new(),
            worker: None,
        }
    }
}

impl CaptureState {
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn refresh_ports(&mut self) {
        self.ports = available_ports();
        if !self.ports.contains(&self.selected_port) {
            self.selected_port = self.ports.first().cloned().unwrap_or_default();
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.  Everything the
/// pipeline computes hangs off this object; there are no globals.
pub struct AppState {
    /// Loaded, filtered thrust curve (None until a file is loaded).
    pub series: Option<FilteredSeries>,

    /// Display name of the loaded file.
    pub source_name: Option<String>,

    /// Operator-editable mass fields, kept as text until (re)calculation.
    pub total_mass_input: String,
    pub propellant_mass_input: String,

    /// Last computed snapshot (derived arrays + metrics as one unit).
    analysis: Option<Analysis>,

    /// Set whenever the series or the mass inputs change; cleared by
    /// [`AppState::ensure_analysis`].
    analysis_stale: bool,

    /// Current central-panel view.
    pub view: View,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    /// Serial capture session.
    pub capture: CaptureState,
}

impl Default for AppState {
    fn default() -> Self {
        let defaults = MassParameters::default();
        AppState {
            series: None,
            source_name: None,
            total_mass_input: format!("{:.3}", defaults.total_initial_kg),
            propellant_mass_input: format!("{:.3}", defaults.propellant_kg),
            analysis: None,
            analysis_stale: false,
            view: View::Plot(Channel::Thrust),
            status_message: None,
            capture: CaptureState::default(),
        }
    }
}

impl AppState {
    /// Load a CSV file, replacing any previous series wholesale.
    pub fn load_file(&mut self, path: &Path) {
        match loader::load_csv(path) {
            Ok(series) => {
                log::info!("loaded {} samples from {}", series.len(), path.display());
                self.source_name = Some(
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string()),
                );
                self.series = Some(series);
                self.status_message = None;
                self.invalidate();
            }
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Parse the mass entry fields.  Text stays untouched so the operator
    /// can keep editing; only the parsed values flow into the model.
    pub fn mass_parameters(&self) -> Result<MassParameters, String> {
        let total_initial_kg = self
            .total_mass_input
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a valid total mass", self.total_mass_input))?;
        let propellant_kg = self
            .propellant_mass_input
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a valid propellant mass", self.propellant_mass_input))?;
        Ok(MassParameters {
            total_initial_kg,
            propellant_kg,
        })
    }

    /// Mark the snapshot stale; the next read recomputes it.
    pub fn invalidate(&mut self) {
        self.analysis_stale = true;
    }

    /// Whether any plot/results view can be shown.
    pub fn has_data(&self) -> bool {
        self.series.is_some()
    }

    /// Recompute the snapshot if anything changed, then return it.
    ///
    /// Arrays and metrics are always rebuilt together so readers never see
    /// a mixed pair.  Errors land in `status_message` and clear the
    /// snapshot rather than leaving a half-updated one behind.
    pub fn ensure_analysis(&mut self) -> Option<&Analysis> {
        if self.analysis_stale {
            self.analysis_stale = false;
            self.analysis = None;
            if let Some(series) = &self.series {
                match self.mass_parameters() {
                    Ok(masses) => match analyze(series, masses) {
                        Ok(analysis) => {
                            self.status_message = None;
                            self.analysis = Some(analysis);
                        }
                        Err(e) => self.status_message = Some(format!("Error: {e}")),
                    },
                    Err(msg) => self.status_message = Some(format!("Error: {msg}")),
                }
            }
        }
        self.analysis.as_ref()
    }

    /// Last computed snapshot without triggering a recompute.
    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    // ---- Serial capture ----

    /// Start a capture worker with the current capture settings.
    pub fn start_capture(&mut self) {
        if self.capture.is_running() {
            return;
        }
        if self.capture.selected_port.is_empty() {
            self.capture.log.push("Error: no serial port selected".to_string());
            return;
        }
        let config = CaptureConfig {
            port: self.capture.selected_port.clone(),
            baud: self.capture.baud,
            output: self.capture.output_name.clone().into(),
        };
        self.capture.log.push(format!(
            "Capturing from {} at {} baud into {}",
            config.port, config.baud, self.capture.output_name
        ));
        self.capture.worker = Some(CaptureWorker::spawn(config));
    }

    /// Request a cooperative stop of the capture worker.
    pub fn stop_capture(&mut self) {
        if let Some(worker) = &self.capture.worker {
            worker.request_stop();
        }
    }

    /// Move pending worker events into the capture log.  Called once per
    /// frame while the capture view is alive.
    pub fn poll_capture(&mut self) {
        let Some(worker) = &self.capture.worker else {
            return;
        };
        let mut finished = false;
        for event in worker.drain_events() {
            match event {
                CaptureEvent::Line(line) => self.capture.log.push(line),
                CaptureEvent::Error(msg) => self.capture.log.push(format!("Error: {msg}")),
                CaptureEvent::Stopped => finished = true,
            }
        }
        if finished {
            self.capture.log.push("Capture stopped.".to_string());
            self.capture.worker = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_series() -> AppState {
        let mut state = AppState::default();
        state.series = Some(FilteredSeries {
            time_s: vec![0.0, 0.1, 0.2],
            force_n: vec![10.0, 10.0, 10.0],
        });
        state.invalidate();
        state
    }

    #[test]
    fn analysis_is_recomputed_lazily_after_invalidation() {
        let mut state = state_with_series();
        state.total_mass_input = "1.0".to_string();
        state.propellant_mass_input = "0.0".to_string();

        let metrics = state.ensure_analysis().unwrap().metrics;
        assert!((metrics.final_velocity_m_s - 2.0).abs() < 1e-9);

        // Editing a mass field invalidates the snapshot.
        state.total_mass_input = "2.0".to_string();
        state.invalidate();
        let metrics = state.ensure_analysis().unwrap().metrics;
        assert!((metrics.final_velocity_m_s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn snapshot_holds_matching_arrays_and_metrics() {
        let mut state = state_with_series();
        state.total_mass_input = "1.0".to_string();
        state.propellant_mass_input = "0.0".to_string();

        let analysis = state.ensure_analysis().unwrap();
        assert!(
            (analysis.metrics.final_velocity_m_s
                - analysis.derived.velocity_m_s.last().unwrap())
            .abs()
                < 1e-12
        );
    }

    #[test]
    fn bad_mass_input_becomes_a_status_message() {
        let mut state = state_with_series();
        state.propellant_mass_input = "not a number".to_string();
        state.invalidate();

        assert!(state.ensure_analysis().is_none());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error:"));
    }

    #[test]
    fn model_errors_clear_the_previous_snapshot() {
        let mut state = state_with_series();
        state.ensure_analysis().unwrap();

        // Replace with a degenerate series; the stale snapshot must not
        // survive the failed recompute.
        state.series = Some(FilteredSeries {
            time_s: vec![0.0],
            force_n: vec![10.0],
        });
        state.invalidate();
        assert!(state.ensure_analysis().is_none());
        assert!(state.status_message.is_some());
        assert!(state.analysis().is_none());
    }
}
