use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate::SummaryMetrics;
use crate::data::filter::Dimension;
use crate::data::model::CellValue;
use crate::format;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

enum FilterChange {
    Toggle(Dimension, CellValue),
    All(Dimension),
    Clear(Dimension),
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let mut changes = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::ALL {
                let Some(all_values) = state.choices.get(&dim) else {
                    continue;
                };
                let selected = state.filters.selection(dim);
                let label = dim.attribute().label();

                // Show count of selected / total in the header
                let header_text = format!("{label}  ({}/{})", selected.len(), all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(label)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                changes.push(FilterChange::All(dim));
                            }
                            if ui.small_button("None").clicked() {
                                changes.push(FilterChange::Clear(dim));
                            }
                        });

                        for val in all_values {
                            let mut checked = selected.contains(val);
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                changes.push(FilterChange::Toggle(dim, val.clone()));
                            }
                        }
                    });
            }
        });

    // Apply after rendering so the widgets above saw a consistent selection.
    for change in changes {
        match change {
            FilterChange::Toggle(dim, val) => state.toggle_filter_value(dim, &val),
            FilterChange::All(dim) => state.select_all(dim),
            FilterChange::Clear(dim) => state.select_none(dim),
        }
    }
}

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
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered rows…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                format::count(ds.len()),
                format::count(state.snapshot.visible_indices.len())
            ))
            .on_hover_text(&ds.source);
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Page header and KPI row
// ---------------------------------------------------------------------------

pub fn page_header(ui: &mut Ui) {
    ui.label("😀 Welcome to the dashboard!");
    ui.heading(RichText::new("🎲 Data Salary Dashboard").size(28.0));
    ui.label(
        "Explore salary data for data roles over recent years. \
         Use the filters in the sidebar to refine your analysis.",
    );
    ui.add_space(8.0);
}

fn kpi(ui: &mut Ui, label: &str, value: String, hover: Option<String>) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        let response = ui.label(RichText::new(value).size(24.0).strong());
        if let Some(text) = hover {
            response.on_hover_text(text);
        }
    });
}

pub fn kpi_row(ui: &mut Ui, metrics: &SummaryMetrics) {
    ui.strong("📈 General metrics (annual salary in USD)");
    ui.add_space(4.0);
    ui.columns(4, |cols: &mut [Ui]| {
        let spread = format!(
            "Median {}, minimum {}",
            format::usd(metrics.median_salary),
            format::usd(metrics.min_salary)
        );
        kpi(&mut cols[0], "Average salary", format::usd(metrics.mean_salary), Some(spread));
        kpi(&mut cols[1], "Maximum salary", format::usd(metrics.max_salary), None);
        kpi(&mut cols[2], "Total entries", format::count(metrics.count), None);
        kpi(
            &mut cols[3],
            "Most frequent job title",
            metrics.most_frequent_title.clone(),
            None,
        );
    });
}

/// Shown instead of the dashboard when no dataset could be loaded.
pub fn load_failure(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(60.0);
        ui.heading("The salary dataset could not be loaded.");
        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
        ui.add_space(12.0);
        ui.label("Use File → Open… to load a local copy (.csv, .json, .parquet).");
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open salary data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let result = crate::data::loader::load_file(&path)
            .with_context(|| format!("loading {}", path.display()));
        match result {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.set_load_error(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered rows")
        .add_filter("CSV", &["csv"])
        .set_file_name("filtered_salaries.csv")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_visible(&path) {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
