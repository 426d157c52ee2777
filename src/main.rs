mod app;
mod capture;
mod data;
mod state;
mod ui;

use app::ThrustBenchApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([800.0, 700.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Thrust Bench – Motor Test Stand Analyzer",
        options,
        Box::new(|_cc| Ok(Box::new(ThrustBenchApp::default()))),
    )
}
