use super::aggregate::{
    category_counts, compute_metrics, country_means, histogram_buckets, job_title_is,
    top_n_by_mean, Bucket, CategoryCount, GroupMean, SortOrder, SummaryMetrics,
};
use super::filter::{apply_filter, FilterSpec, FilteredView};
use super::model::{Attribute, Dataset};

/// Tunables of the chart pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    /// How many job titles the ranking chart shows.
    pub top_n: usize,
    /// Number of salary histogram buckets.
    pub histogram_bins: usize,
    /// Job title whose per-country averages are charted.
    pub focus_title: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            histogram_bins: 30,
            focus_title: "Data Scientist".to_string(),
        }
    }
}

/// Every output of one pipeline run over one [`FilterSpec`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    /// Dataset row indices of the filtered view, in dataset order.
    pub visible_indices: Vec<usize>,
    pub metrics: SummaryMetrics,
    /// Highest-paying job titles, lowest mean first (bottom-up bar layout).
    pub top_titles: Vec<GroupMean>,
    pub salary_histogram: Vec<Bucket>,
    pub remote_mix: Vec<CategoryCount>,
    /// Mean salary of [`DashboardSettings::focus_title`] per residence country.
    pub focus_country_means: Vec<GroupMean>,
}

impl DashboardSnapshot {
    pub fn compute(dataset: &Dataset, spec: &FilterSpec, settings: &DashboardSettings) -> Self {
        let view = apply_filter(dataset, spec);
        log::debug!(
            "Filter kept {} of {} records",
            view.len(),
            dataset.len()
        );
        Self::from_view(view, settings)
    }

    pub fn from_view(view: FilteredView<'_>, settings: &DashboardSettings) -> Self {
        let metrics = compute_metrics(&view);
        let top_titles = top_n_by_mean(
            &view,
            Attribute::JobTitle,
            Attribute::SalaryUsd,
            settings.top_n,
            SortOrder::Ascending,
        );
        let salary_histogram =
            histogram_buckets(&view, Attribute::SalaryUsd, settings.histogram_bins);
        let remote_mix = category_counts(&view, Attribute::RemoteType);
        let focus_country_means = country_means(
            &view,
            job_title_is(&settings.focus_title),
            Attribute::ResidenceCountry,
            Attribute::SalaryUsd,
        );

        DashboardSnapshot {
            visible_indices: view.into_indices(),
            metrics,
            top_titles,
            salary_histogram,
            remote_mix,
            focus_country_means,
        }
    }

    /// No record passed the filter; charts should show placeholders.
    pub fn is_empty(&self) -> bool {
        self.visible_indices.is_empty()
    }
}
