use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalaryDashboardApp {
    pub state: AppState,
}

impl SalaryDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    fn dashboard(&self, ui: &mut Ui) {
        let Some(dataset) = &self.state.dataset else {
            panels::load_failure(ui, &self.state);
            return;
        };
        let snapshot = &self.state.snapshot;
        let settings = &self.state.settings;

        panels::page_header(ui);
        panels::kpi_row(ui, &snapshot.metrics);
        ui.separator();

        ui.strong("📊 Charts");
        ui.columns(2, |cols: &mut [Ui]| {
            charts::top_titles_chart(&mut cols[0], &snapshot.top_titles, settings.top_n);
            charts::salary_histogram(&mut cols[1], &snapshot.salary_histogram);
        });
        ui.columns(2, |cols: &mut [Ui]| {
            charts::remote_mix_donut(&mut cols[0], &snapshot.remote_mix);
            charts::country_means_chart(
                &mut cols[1],
                &snapshot.focus_country_means,
                &settings.focus_title,
            );
        });
        ui.separator();

        table::detail_table(ui, dataset, &snapshot.visible_indices);
    }
}

impl eframe::App for SalaryDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| self.dashboard(ui));
        });
    }
}
