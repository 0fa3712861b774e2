use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Result;

use crate::data::dashboard::{DashboardSettings, DashboardSnapshot};
use crate::data::export::export_csv;
use crate::data::filter::{distinct_values, Dimension, FilterSpec, FilteredView};
use crate::data::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Dataset>,

    /// Choices offered per filter dimension, from the loaded dataset.
    pub choices: BTreeMap<Dimension, BTreeSet<CellValue>>,

    /// Current filter selections.
    pub filters: FilterSpec,

    /// Chart pipeline tunables.
    pub settings: DashboardSettings,

    /// Outputs for the current filters (cached until the next filter change).
    pub snapshot: DashboardSnapshot,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: DashboardSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded dataset with every filter value selected.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.choices = Dimension::ALL
            .iter()
            .map(|&dim| (dim, distinct_values(&dataset, dim.attribute())))
            .collect();
        self.filters = FilterSpec::select_all(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Record a failed load. Any previously loaded dataset stays in place.
    pub fn set_load_error(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Recompute the snapshot after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.snapshot = DashboardSnapshot::compute(ds, &self.filters, &self.settings);
        }
    }

    /// Toggle a single value in a dimension's filter.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: &CellValue) {
        self.filters.toggle(dim, value);
        self.refilter();
    }

    /// Select all values of a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(all_vals) = self.choices.get(&dim) {
            self.filters.select_all_in(dim, all_vals);
            self.refilter();
        }
    }

    /// Deselect all values of a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.filters.clear(dim);
        self.refilter();
    }

    /// Write the currently visible rows to `path` as CSV.
    pub fn export_visible(&self, path: &Path) -> Result<()> {
        let ds = self
            .dataset
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no dataset loaded"))?;
        let view = FilteredView::from_indices(ds, self.snapshot.visible_indices.clone());
        export_csv(&view, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::two_rows;

    fn loaded() -> AppState {
        let mut state = AppState::new(DashboardSettings::default());
        state.set_dataset(two_rows());
        state
    }

    #[test]
    fn loading_selects_everything() {
        let state = loaded();
        assert_eq!(state.snapshot.visible_indices, vec![0, 1]);
        assert_eq!(state.choices[&Dimension::Seniority].len(), 2);
        assert_eq!(state.choices[&Dimension::Year].len(), 1);
    }

    #[test]
    fn filter_controls_recompute_snapshot() {
        let mut state = loaded();
        state.toggle_filter_value(Dimension::Seniority, &CellValue::from("Junior"));
        assert_eq!(state.snapshot.visible_indices, vec![0]);
        assert_eq!(state.snapshot.metrics.mean_salary, 150000.0);

        state.select_none(Dimension::CompanySize);
        assert!(state.snapshot.is_empty());
        assert_eq!(state.snapshot.metrics.count, 0);

        state.select_all(Dimension::CompanySize);
        state.select_all(Dimension::Seniority);
        assert_eq!(state.snapshot.visible_indices, vec![0, 1]);
    }

    #[test]
    fn load_error_keeps_previous_dataset() {
        let mut state = loaded();
        state.set_load_error("Error: boom".into());
        assert!(state.dataset.is_some());
        assert_eq!(state.status_message.as_deref(), Some("Error: boom"));
    }

    #[test]
    fn export_requires_dataset_and_writes_visible_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        assert!(AppState::default().export_visible(&path).is_err());

        let mut state = loaded();
        state.select_none(Dimension::Year);
        state.export_visible(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("ano,"));
    }
}
