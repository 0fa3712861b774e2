mod app;
mod color;
mod config;
mod data;
mod format;
mod state;
mod ui;

use app::SalaryDashboardApp;
use clap::Parser;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let cli = config::Cli::parse();
    let source = cli.data_source();
    let mut state = AppState::new(cli.settings());

    // Loaded once per session; a failure is shown in place of the dashboard.
    match data::loader::load(&source) {
        Ok(dataset) => state.set_dataset(dataset),
        Err(e) => {
            let err = anyhow::Error::new(e).context(format!("loading {source}"));
            log::error!("{err:#}");
            state.set_load_error(format!("Error: {err:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Salary Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SalaryDashboardApp::new(state)))),
    )
}
