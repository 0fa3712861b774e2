use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Attribute, Dataset, Record};
use crate::format;

const ROW_HEIGHT: f32 = 18.0;

fn cell_text(record: &Record, attribute: Attribute) -> String {
    match attribute {
        Attribute::SalaryUsd => format::usd(record.salary_usd),
        other => record.value(other).to_string(),
    }
}

/// Raw rows of the filtered view, one line per record.
pub fn detail_table(ui: &mut Ui, dataset: &Dataset, indices: &[usize]) {
    ui.strong("📋 Detailed data table");
    if indices.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(400.0)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(40.0))
        .columns(Column::auto().at_least(70.0), Attribute::ALL.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for attribute in Attribute::ALL {
                header.col(|ui| {
                    ui.strong(attribute.label());
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, indices.len(), |mut row| {
                let idx = indices[row.index()];
                let record = &dataset.records[idx];
                row.col(|ui| {
                    ui.label(idx.to_string());
                });
                for attribute in Attribute::ALL {
                    row.col(|ui| {
                        ui.label(cell_text(record, attribute));
                    });
                }
            });
        });
}
