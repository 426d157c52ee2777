use eframe::egui::{self, Color32, Grid, RichText, ScrollArea, Ui};

use crate::data::model::STANDARD_GRAVITY;
use crate::state::{AppState, Channel, View};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        match (&state.source_name, &state.series) {
            (Some(name), Some(series)) => {
                ui.label(format!("{name} — {} samples above noise floor", series.len()));
            }
            _ => {
                ui.label("No file loaded");
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – mass inputs and view selection
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Motor Analysis");
    ui.separator();

    ui.label("Total mass at ignition (kg):");
    if ui.text_edit_singleline(&mut state.total_mass_input).changed() {
        state.invalidate();
    }
    ui.label("Propellant mass (kg):");
    if ui.text_edit_singleline(&mut state.propellant_mass_input).changed() {
        state.invalidate();
    }

    ui.separator();

    let has_data = state.has_data();
    let view_buttons = [
        ("Thrust", View::Plot(Channel::Thrust)),
        ("Velocity", View::Plot(Channel::Velocity)),
        ("Altitude", View::Plot(Channel::Altitude)),
        ("Results", View::Results),
    ];
    for (label, view) in view_buttons {
        let selected = state.view == view;
        if ui
            .add_enabled(has_data, egui::SelectableLabel::new(selected, label))
            .clicked()
        {
            state.view = view;
        }
    }

    ui.separator();

    if ui
        .selectable_label(state.view == View::Capture, "Serial capture")
        .clicked()
    {
        state.view = View::Capture;
    }
}

// ---------------------------------------------------------------------------
// Results card
// ---------------------------------------------------------------------------

/// Render the metrics card for the last analysed firing.
pub fn results_view(ui: &mut Ui, state: &mut AppState) {
    if state.ensure_analysis().is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a thrust CSV to view results  (File → Open…)");
        });
        return;
    }
    let Some(analysis) = state.analysis() else { return };
    let m = analysis.metrics;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("Test Stand Results");
    });
    ui.add_space(8.0);

    let rows = [
        ("Max thrust", format!("{:.2} N", m.max_thrust_n)),
        ("Total impulse", format!("{:.2} N·s", m.total_impulse_ns)),
        ("Burn time", format!("{:.3} s", m.burn_time_s)),
        ("Propellant mass", format!("{:.1} g", m.propellant_mass_kg * 1000.0)),
        ("Structure mass", format!("{:.3} kg", m.structure_mass_kg)),
        ("Specific impulse", format!("{:.2} s", m.specific_impulse_s)),
        (
            "Final velocity",
            format!(
                "{:.2} m/s ({:.2} km/h)",
                m.final_velocity_m_s,
                m.final_velocity_m_s * 3.6
            ),
        ),
        ("Estimated apogee", format!("{:.2} m", m.apogee_m)),
        ("Time to apogee", format!("{:.2} s", m.time_to_apogee_s)),
        (
            "Max acceleration",
            format!(
                "{:.2} m/s² ({:.2} g)",
                m.max_acceleration_m_s2,
                m.max_acceleration_m_s2 / STANDARD_GRAVITY
            ),
        ),
        ("Thrust-to-weight", format!("{:.2}", m.thrust_to_weight)),
    ];

    Grid::new("results_grid")
        .num_columns(2)
        .spacing([40.0, 6.0])
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for (label, value) in rows {
                ui.label(label);
                ui.label(RichText::new(value).strong());
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Serial capture view
// ---------------------------------------------------------------------------

/// Render the serial capture controls and live log.
pub fn capture_view(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Record from microcontroller");
    ui.add_space(4.0);

    let running = state.capture.is_running();

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Port:");
        egui::ComboBox::from_id_salt("capture_port")
            .selected_text(&state.capture.selected_port)
            .show_ui(ui, |ui: &mut Ui| {
                let ports = state.capture.ports.clone();
                for port in ports {
                    if ui
                        .selectable_label(state.capture.selected_port == port, &port)
                        .clicked()
                    {
                        state.capture.selected_port = port;
                    }
                }
            });
        if ui.add_enabled(!running, egui::Button::new("Refresh")).clicked() {
            state.capture.refresh_ports();
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Output file:");
        ui.add_enabled(
            !running,
            egui::TextEdit::singleline(&mut state.capture.output_name),
        );
    });

    ui.horizontal(|ui: &mut Ui| {
        if ui.add_enabled(!running, egui::Button::new("Start")).clicked() {
            state.start_capture();
        }
        if ui.add_enabled(running, egui::Button::new("Stop")).clicked() {
            state.stop_capture();
        }
        if running {
            ui.spinner();
            ui.label("recording…");
        }
    });

    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui: &mut Ui| {
            for line in &state.capture.log {
                ui.monospace(line);
            }
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open thrust curve")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_file(&path);
    }
}
