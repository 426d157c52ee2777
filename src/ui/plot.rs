use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use crate::data::metrics::peak;
use crate::state::{AppState, Channel};

// ---------------------------------------------------------------------------
// Time-series plot (central panel)
// ---------------------------------------------------------------------------

/// Fixed channel colours, matching the original bench tool.
fn channel_color(channel: Channel) -> Color32 {
    match channel {
        Channel::Thrust => Color32::from_rgb(0, 90, 255),    // blue
        Channel::Velocity => Color32::from_rgb(0, 160, 60),  // green
        Channel::Altitude => Color32::from_rgb(255, 150, 0), // orange
    }
}

/// Render one derived channel against time with a max-value annotation.
pub fn channel_plot(ui: &mut Ui, state: &mut AppState, channel: Channel) {
    if state.ensure_analysis().is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a thrust CSV to view plots  (File → Open…)");
        });
        return;
    }

    // ensure_analysis only succeeds with a loaded series.
    let (Some(series), Some(analysis)) = (&state.series, state.analysis()) else {
        return;
    };

    let values: &[f64] = match channel {
        Channel::Thrust => &series.force_n,
        Channel::Velocity => &analysis.derived.velocity_m_s,
        Channel::Altitude => &analysis.derived.altitude_m,
    };
    let color = channel_color(channel);

    let points: PlotPoints = series
        .time_s
        .iter()
        .zip(values.iter())
        .map(|(&t, &v)| [t, v])
        .collect();

    // The plot fills the rest of the panel, so the annotation goes first.
    if let Some((t, v)) = peak(&series.time_s, values) {
        ui.colored_label(color, format!("Max: {v:.2} {} at t = {t:.2} s", channel.unit()));
    }

    Plot::new(channel.series_name())
        .legend(egui_plot::Legend::default())
        .x_axis_label("Time (s)")
        .y_axis_label(channel.label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let line = Line::new(points)
                .name(channel.series_name())
                .color(color)
                .width(2.0);
            plot_ui.line(line);
        });
}
