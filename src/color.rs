use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.65, 0.55))
        .collect()
}

/// Diverging red → yellow → green scale; `t` is clamped to `[0, 1]`.
pub fn red_yellow_green(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    hsl_to_color32(t as f32 * 120.0, 0.70, 0.45)
}

/// Position of `value` within `[min, max]`, 0.5 for a degenerate range.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.5
    }
}

// ---------------------------------------------------------------------------
// Category colours: value → Color32
// ---------------------------------------------------------------------------

/// Assigns distinct colours to the categories of a chart, in the order given.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl CategoryColors {
    pub fn new<'v>(categories: impl IntoIterator<Item = &'v CellValue>) -> Self {
        let categories: Vec<&CellValue> = categories.into_iter().collect();
        let palette = generate_palette(categories.len());
        let mapping = categories
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        CategoryColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn scale_runs_from_red_to_green() {
        let low = red_yellow_green(0.0);
        let high = red_yellow_green(1.0);
        assert!(low.r() > low.g());
        assert!(high.g() > high.r());
        assert_eq!(red_yellow_green(-3.0), low);
        assert_eq!(red_yellow_green(f64::NAN), red_yellow_green(0.5));
    }

    #[test]
    fn normalize_handles_degenerate_range() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(10.0, 0.0, 10.0), 1.0);
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.5);
    }

    #[test]
    fn unknown_categories_fall_back_to_gray() {
        let remote = CellValue::from("Remote");
        let hybrid = CellValue::from("Hybrid");
        let colors = CategoryColors::new([&remote, &hybrid]);
        assert_ne!(colors.color_for(&remote), colors.color_for(&hybrid));
        assert_eq!(colors.color_for(&CellValue::from("Moon")), Color32::GRAY);
    }
}
