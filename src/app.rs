use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ThrustBenchApp {
    pub state: AppState,
}

impl Default for ThrustBenchApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for ThrustBenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pull pending capture lines into the log before drawing anything.
        self.state.poll_capture();
        if self.state.capture.is_running() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: masses and views ----
        egui::SidePanel::left("control_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot / results / capture ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Plot(channel) => plot::channel_plot(ui, &mut self.state, channel),
            View::Results => panels::results_view(ui, &mut self.state),
            View::Capture => panels::capture_view(ui, &mut self.state),
        });
    }
}
