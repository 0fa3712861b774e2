use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, Polygon, Text};

use crate::color::{normalize, red_yellow_green, CategoryColors};
use crate::data::aggregate::{Bucket, CategoryCount, GroupMean};
use crate::format;

const CHART_HEIGHT: f32 = 320.0;
const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Warning shown in place of a chart with nothing to draw.
pub fn placeholder(ui: &mut Ui, message: &str) {
    ui.allocate_ui(eframe::egui::vec2(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(format!("⚠ {message}")).color(Color32::from_rgb(220, 160, 0)));
        });
    });
}

/// Category label for an integer axis position, blank between categories.
fn label_at(labels: &[String], position: f64) -> String {
    let rounded = position.round();
    if rounded < 0.0 || (position - rounded).abs() > 1e-6 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn static_plot(id: &'static str) -> Plot<'static> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

// ---------------------------------------------------------------------------
// Top job titles (horizontal bars, lowest mean at the bottom)
// ---------------------------------------------------------------------------

pub fn top_titles_chart(ui: &mut Ui, titles: &[GroupMean], top_n: usize) {
    ui.strong(format!("Top {top_n} job titles by average salary"));
    if titles.is_empty() {
        placeholder(ui, "No data available for the job title chart.");
        return;
    }

    let labels: Vec<String> = titles.iter().map(|g| g.key.to_string()).collect();
    let bars: Vec<Bar> = titles
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.mean)
                .name(format!("{} ({} entries)", g.key, format::count(g.count)))
                .width(0.7)
        })
        .collect();
    let chart = BarChart::new(bars)
        .horizontal()
        .color(BAR_COLOR)
        .element_formatter(Box::new(|bar, _chart| {
            format!("{}\n{}", bar.name, format::usd(bar.value))
        }));

    static_plot("top_titles")
        .x_axis_label("Average annual salary (USD)")
        .x_axis_formatter(|mark, _range| format::usd_short(mark.value))
        .y_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Salary distribution
// ---------------------------------------------------------------------------

pub fn salary_histogram(ui: &mut Ui, buckets: &[Bucket]) {
    ui.strong("Annual salary distribution");
    if buckets.is_empty() {
        placeholder(ui, "No data available for the salary distribution chart.");
        return;
    }

    let bars: Vec<Bar> = buckets
        .iter()
        .map(|b| {
            Bar::new(b.midpoint(), b.count as f64)
                .width(b.width())
                .name(format!("{} to {}", format::usd(b.start), format::usd(b.end)))
        })
        .collect();
    let chart = BarChart::new(bars)
        .color(BAR_COLOR)
        .element_formatter(Box::new(|bar, _chart| {
            format!("{}\n{} entries", bar.name, bar.value)
        }));

    static_plot("salary_histogram")
        .x_axis_label("Salary range (USD)")
        .y_axis_label("Entries")
        .x_axis_formatter(|mark, _range| format::usd_short(mark.value))
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Work type proportion (donut)
// ---------------------------------------------------------------------------

const OUTER_RADIUS: f64 = 1.0;
const INNER_RADIUS: f64 = 0.5;
/// Maximum angle of one donut segment; segments must stay convex to fill.
const SEGMENT_STEP: f64 = 0.05;

fn polar(radius: f64, angle: f64) -> [f64; 2] {
    [radius * angle.cos(), radius * angle.sin()]
}

pub fn remote_mix_donut(ui: &mut Ui, counts: &[CategoryCount]) {
    ui.strong("Work type proportion");
    let total: usize = counts.iter().map(|c| c.count).sum();
    if total == 0 {
        placeholder(ui, "No data available for the work type chart.");
        return;
    }

    let colors = CategoryColors::new(counts.iter().map(|c| &c.category));

    static_plot("remote_mix")
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            // Clockwise from twelve o'clock.
            let mut start = 0.0;
            for c in counts {
                let share = c.count as f64 / total as f64;
                let sweep = share * TAU;
                let color = colors.color_for(&c.category);
                let name = c.category.to_string();

                let steps = (sweep / SEGMENT_STEP).ceil().max(1.0) as usize;
                for j in 0..steps {
                    let a0 = FRAC_PI_2 - (start + sweep * j as f64 / steps as f64);
                    let a1 = FRAC_PI_2 - (start + sweep * (j + 1) as f64 / steps as f64);
                    let quad = vec![
                        polar(OUTER_RADIUS, a0),
                        polar(OUTER_RADIUS, a1),
                        polar(INNER_RADIUS, a1),
                        polar(INNER_RADIUS, a0),
                    ];
                    plot_ui.polygon(
                        Polygon::new(quad)
                            .name(&name)
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, color)),
                    );
                }

                let mid = FRAC_PI_2 - (start + sweep / 2.0);
                let [x, y] = polar((OUTER_RADIUS + INNER_RADIUS) / 2.0, mid);
                plot_ui.text(Text::new(
                    PlotPoint::new(x, y),
                    RichText::new(format!("{name}\n{:.1}%", share * 100.0))
                        .color(Color32::WHITE)
                        .strong(),
                ));
                start += sweep;
            }
        });
}

// ---------------------------------------------------------------------------
// Average salary per country for the focus job title
// ---------------------------------------------------------------------------

pub fn country_means_chart(ui: &mut Ui, means: &[GroupMean], focus_title: &str) {
    ui.strong(format!("Average {focus_title} salary by country"));
    if means.is_empty() {
        placeholder(ui, "No data available for the country chart.");
        return;
    }

    let min = means.iter().map(|g| g.mean).fold(f64::INFINITY, f64::min);
    let max = means.iter().map(|g| g.mean).fold(f64::NEG_INFINITY, f64::max);

    let labels: Vec<String> = means.iter().map(|g| g.key.to_string()).collect();
    let bars: Vec<Bar> = means
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.mean)
                .name(format!("{} ({} entries)", g.key, format::count(g.count)))
                .fill(red_yellow_green(normalize(g.mean, min, max)))
                .width(0.8)
        })
        .collect();
    let chart = BarChart::new(bars)
        .horizontal()
        .element_formatter(Box::new(|bar, _chart| {
            format!("{}\n{}", bar.name, format::usd(bar.value))
        }));

    static_plot("country_means")
        .x_axis_label("Average annual salary (USD)")
        .x_axis_formatter(|mark, _range| format::usd_short(mark.value))
        .y_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}
