use std::collections::HashMap;

use super::filter::FilteredView;
use super::model::{Attribute, CellValue, Record};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// KPI values of a filtered view. All zero / empty for an empty view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryMetrics {
    pub mean_salary: f64,
    pub median_salary: f64,
    pub max_salary: f64,
    pub min_salary: f64,
    pub count: usize,
    pub most_frequent_title: String,
}

/// Mean of a numeric attribute within one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub key: CellValue,
    pub mean: f64,
    /// Number of records in the group.
    pub count: usize,
}

/// One equal-width histogram bin covering `[start, end)`; the last bin is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bucket {
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Frequency of one categorical value.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub category: CellValue,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Mean / median / max / min salary, row count and the most frequent job title.
///
/// An empty view yields [`SummaryMetrics::default`] instead of dividing by zero.
pub fn compute_metrics(view: &FilteredView<'_>) -> SummaryMetrics {
    if view.is_empty() {
        return SummaryMetrics::default();
    }

    let mut salaries: Vec<f64> = view.records().map(|r| r.salary_usd).collect();
    let count = salaries.len();
    let max = salaries.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = salaries.iter().copied().fold(f64::INFINITY, f64::min);
    let sum: f64 = salaries.iter().sum();

    salaries.sort_by(f64::total_cmp);
    let mid = count / 2;
    let median = if count % 2 == 1 {
        salaries[mid]
    } else {
        (salaries[mid - 1] + salaries[mid]) / 2.0
    };

    let mut mean = sum / count as f64;
    // Summation rounding must not push the mean outside [min, max].
    if min <= max {
        mean = mean.clamp(min, max);
    }

    SummaryMetrics {
        mean_salary: mean,
        median_salary: median,
        max_salary: max,
        min_salary: min,
        count,
        most_frequent_title: mode(view.records().map(|r| r.job_title.as_str()))
            .unwrap_or_default()
            .to_string(),
    }
}

/// Most frequent value; ties go to the value encountered first.
fn mode<'r>(values: impl Iterator<Item = &'r str>) -> Option<&'r str> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for v in values {
        match index.get(v) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(v, counts.len());
                counts.push((v, 1));
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (v, n) in counts {
        if best.map_or(true, |(_, b)| n > b) {
            best = Some((v, n));
        }
    }
    best.map(|(v, _)| v)
}

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// Per-group mean of `value`, groups in first-encountered order.
/// Records without a numeric `value` are skipped.
fn group_means<'r>(
    records: impl Iterator<Item = &'r Record>,
    group: Attribute,
    value: Attribute,
) -> Vec<GroupMean> {
    let mut index: HashMap<CellValue, usize> = HashMap::new();
    let mut sums: Vec<(CellValue, f64, usize)> = Vec::new();

    for r in records {
        let Some(v) = r.numeric(value) else {
            continue;
        };
        let key = r.value(group);
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                index.insert(key.clone(), sums.len());
                sums.push((key, 0.0, 0));
                sums.len() - 1
            }
        };
        sums[slot].1 += v;
        sums[slot].2 += 1;
    }

    sums.into_iter()
        .map(|(key, sum, count)| GroupMean {
            key,
            mean: sum / count as f64,
            count,
        })
        .collect()
}

/// The `n` groups with the largest mean of `value_attribute`, returned in `order`.
///
/// Equal means keep first-encountered group order.
pub fn top_n_by_mean(
    view: &FilteredView<'_>,
    group_attribute: Attribute,
    value_attribute: Attribute,
    n: usize,
    order: SortOrder,
) -> Vec<GroupMean> {
    let mut groups = group_means(view.records(), group_attribute, value_attribute);
    groups.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    groups.truncate(n);
    if order == SortOrder::Ascending {
        groups.sort_by(|a, b| a.mean.total_cmp(&b.mean));
    }
    groups
}

/// Mean of `value_attribute` per `group_attribute` over the records passing
/// `predicate`, ordered by group key. Every non-empty group is returned.
pub fn country_means<P>(
    view: &FilteredView<'_>,
    predicate: P,
    group_attribute: Attribute,
    value_attribute: Attribute,
) -> Vec<GroupMean>
where
    P: Fn(&Record) -> bool,
{
    let mut groups = group_means(
        view.records().filter(|r| predicate(r)),
        group_attribute,
        value_attribute,
    );
    groups.sort_by(|a, b| a.key.cmp(&b.key));
    groups
}

/// Predicate selecting records with the given job title.
pub fn job_title_is(title: &str) -> impl Fn(&Record) -> bool + '_ {
    move |r: &Record| r.job_title == title
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

/// Equal-width histogram of `value_attribute` over `[min, max]` of the view.
///
/// The maximum lands in the last bucket. A zero-width range is widened to
/// `[min - 0.5, max + 0.5]`.
pub fn histogram_buckets(
    view: &FilteredView<'_>,
    value_attribute: Attribute,
    bucket_count: usize,
) -> Vec<Bucket> {
    let values: Vec<f64> = view
        .records()
        .filter_map(|r| r.numeric(value_attribute))
        .collect();
    if values.is_empty() || bucket_count == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (hi - lo) / bucket_count as f64;

    let mut buckets: Vec<Bucket> = (0..bucket_count)
        .map(|i| Bucket {
            start: lo + i as f64 * width,
            end: if i + 1 == bucket_count {
                hi
            } else {
                lo + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    let last = bucket_count - 1;
    for v in values {
        let i = (((v - lo) / width) as usize).min(last);
        buckets[i].count += 1;
    }
    buckets
}

/// Count of records per value of `attribute`, most frequent first.
///
/// Equal counts keep first-encountered order.
pub fn category_counts(view: &FilteredView<'_>, attribute: Attribute) -> Vec<CategoryCount> {
    let mut index: HashMap<CellValue, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for r in view.records() {
        let category = r.value(attribute);
        match index.get(&category) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(category.clone(), counts.len());
                counts.push(CategoryCount { category, count: 1 });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply_filter, FilterSpec};
    use crate::data::model::tests::{arb_dataset, record, two_rows};
    use crate::data::model::Dataset;
    use proptest::prelude::*;

    fn dataset(rows: &[(&str, &str, &str, f64)]) -> Dataset {
        Dataset::from_records(
            rows.iter()
                .map(|&(title, remote, country, salary)| {
                    record(2024, "Senior", "FT", "M", title, remote, country, salary)
                })
                .collect(),
            "memory",
        )
    }

    #[test]
    fn metrics_for_two_row_scenario() {
        let ds = two_rows();
        let view = apply_filter(&ds, &FilterSpec::select_all(&ds));
        let m = compute_metrics(&view);
        assert_eq!(m.mean_salary, 95000.0);
        assert_eq!(m.median_salary, 95000.0);
        assert_eq!(m.max_salary, 150000.0);
        assert_eq!(m.min_salary, 40000.0);
        assert_eq!(m.count, 2);
        // Tie: the first title encountered wins, on every run.
        assert_eq!(m.most_frequent_title, "Data Scientist");
        assert_eq!(compute_metrics(&view), m);
    }

    #[test]
    fn metrics_for_empty_view_are_zero() {
        let ds = two_rows();
        let view = apply_filter(&ds, &FilterSpec::default());
        let m = compute_metrics(&view);
        assert_eq!(m, SummaryMetrics::default());
        assert_eq!(m.count, 0);
        assert_eq!(m.mean_salary, 0.0);
        assert_eq!(m.most_frequent_title, "");
    }

    #[test]
    fn metrics_over_nan_salaries_do_not_panic() {
        let ds = Dataset::from_records(
            vec![
                record(2023, "Senior", "FT", "M", "A", "Remote", "USA", f64::NAN),
                record(2023, "Senior", "FT", "M", "A", "Remote", "USA", f64::NAN),
            ],
            "memory",
        );
        let m = compute_metrics(&FilteredView::all(&ds));
        assert_eq!(m.count, 2);
        assert!(m.mean_salary.is_nan());
        assert_eq!(m.most_frequent_title, "A");
    }

    #[test]
    fn mode_prefers_higher_count_then_first_seen() {
        assert_eq!(mode(["a", "b", "b", "a"].into_iter()), Some("a"));
        assert_eq!(mode(["a", "b", "b"].into_iter()), Some("b"));
        assert_eq!(mode(std::iter::empty()), None);
    }

    #[test]
    fn country_means_for_seniors_only() {
        let ds = two_rows();
        let mut spec = FilterSpec::select_all(&ds);
        spec.seniorities = [CellValue::from("Senior")].into_iter().collect();
        let view = apply_filter(&ds, &spec);
        assert_eq!(view.len(), 1);

        let means = country_means(
            &view,
            job_title_is("Data Scientist"),
            Attribute::ResidenceCountry,
            Attribute::SalaryUsd,
        );
        assert_eq!(
            means,
            vec![GroupMean {
                key: CellValue::from("USA"),
                mean: 150000.0,
                count: 1
            }]
        );
    }

    #[test]
    fn country_means_are_sorted_by_key_and_untruncated() {
        let ds = dataset(&[
            ("Data Scientist", "Remote", "USA", 100.0),
            ("Data Scientist", "Remote", "BRA", 10.0),
            ("Analyst", "Remote", "DEU", 999.0),
            ("Data Scientist", "Remote", "USA", 300.0),
            ("Data Scientist", "Remote", "ARG", 20.0),
        ]);
        let means = country_means(
            &FilteredView::all(&ds),
            job_title_is("Data Scientist"),
            Attribute::ResidenceCountry,
            Attribute::SalaryUsd,
        );
        let keys: Vec<String> = means.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(keys, ["ARG", "BRA", "USA"]);
        assert_eq!(means[2].mean, 200.0);
        assert_eq!(means[2].count, 2);
    }

    #[test]
    fn country_means_without_matches_is_empty() {
        let ds = dataset(&[("Analyst", "Remote", "USA", 1.0)]);
        let means = country_means(
            &FilteredView::all(&ds),
            job_title_is("Data Scientist"),
            Attribute::ResidenceCountry,
            Attribute::SalaryUsd,
        );
        assert!(means.is_empty());
    }

    #[test]
    fn top_n_keeps_largest_means_in_requested_order() {
        let ds = dataset(&[
            ("A", "Remote", "USA", 10.0),
            ("B", "Remote", "USA", 40.0),
            ("C", "Remote", "USA", 30.0),
            ("A", "Remote", "USA", 30.0),
            ("D", "Remote", "USA", 5.0),
        ]);
        let view = FilteredView::all(&ds);

        let asc = top_n_by_mean(&view, Attribute::JobTitle, Attribute::SalaryUsd, 3, SortOrder::Ascending);
        let keys: Vec<String> = asc.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(keys, ["A", "C", "B"]);
        assert_eq!(asc[0].mean, 20.0);

        let desc = top_n_by_mean(&view, Attribute::JobTitle, Attribute::SalaryUsd, 2, SortOrder::Descending);
        let keys: Vec<String> = desc.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(keys, ["B", "C"]);
    }

    #[test]
    fn top_n_ties_prefer_first_encountered_group() {
        let ds = dataset(&[
            ("X", "Remote", "USA", 50.0),
            ("Y", "Remote", "USA", 50.0),
            ("Z", "Remote", "USA", 50.0),
        ]);
        let top = top_n_by_mean(
            &FilteredView::all(&ds),
            Attribute::JobTitle,
            Attribute::SalaryUsd,
            2,
            SortOrder::Descending,
        );
        let keys: Vec<String> = top.iter().map(|g| g.key.to_string()).collect();
        assert_eq!(keys, ["X", "Y"]);
    }

    #[test]
    fn top_n_of_zero_or_empty_view_is_empty() {
        let ds = two_rows();
        let all = FilteredView::all(&ds);
        assert!(top_n_by_mean(&all, Attribute::JobTitle, Attribute::SalaryUsd, 0, SortOrder::Ascending).is_empty());
        let none = apply_filter(&ds, &FilterSpec::default());
        assert!(top_n_by_mean(&none, Attribute::JobTitle, Attribute::SalaryUsd, 10, SortOrder::Ascending).is_empty());
    }

    #[test]
    fn categorical_value_attribute_yields_no_groups() {
        let ds = two_rows();
        let view = FilteredView::all(&ds);
        assert!(top_n_by_mean(&view, Attribute::JobTitle, Attribute::RemoteType, 5, SortOrder::Ascending).is_empty());
        assert!(histogram_buckets(&view, Attribute::JobTitle, 5).is_empty());
    }

    #[test]
    fn histogram_puts_max_in_last_bucket() {
        let ds = dataset(&[
            ("A", "Remote", "USA", 0.0),
            ("A", "Remote", "USA", 25.0),
            ("A", "Remote", "USA", 50.0),
            ("A", "Remote", "USA", 100.0),
        ]);
        let buckets = histogram_buckets(&FilteredView::all(&ds), Attribute::SalaryUsd, 4);
        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, [1, 1, 1, 1]);
        assert_eq!(buckets[0].start, 0.0);
        assert_eq!(buckets[3].end, 100.0);
        assert_eq!(buckets[1].width(), 25.0);
        assert_eq!(buckets[1].midpoint(), 37.5);
    }

    #[test]
    fn histogram_of_constant_values_widens_range() {
        let ds = dataset(&[("A", "Remote", "USA", 7.0), ("B", "Remote", "USA", 7.0)]);
        let buckets = histogram_buckets(&FilteredView::all(&ds), Attribute::SalaryUsd, 2);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].start, 6.5);
        assert_eq!(buckets[1].end, 7.5);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn histogram_of_empty_view_or_zero_buckets_is_empty() {
        let ds = two_rows();
        let none = apply_filter(&ds, &FilterSpec::default());
        assert!(histogram_buckets(&none, Attribute::SalaryUsd, 30).is_empty());
        assert!(histogram_buckets(&FilteredView::all(&ds), Attribute::SalaryUsd, 0).is_empty());
    }

    #[test]
    fn category_counts_most_frequent_first() {
        let ds = dataset(&[
            ("A", "On-site", "USA", 1.0),
            ("A", "Remote", "USA", 1.0),
            ("A", "Hybrid", "USA", 1.0),
            ("A", "Remote", "USA", 1.0),
        ]);
        let counts = category_counts(&FilteredView::all(&ds), Attribute::RemoteType);
        let pairs: Vec<(String, usize)> = counts
            .iter()
            .map(|c| (c.category.to_string(), c.count))
            .collect();
        assert_eq!(
            pairs,
            [
                ("Remote".to_string(), 2),
                ("On-site".to_string(), 1),
                ("Hybrid".to_string(), 1)
            ]
        );
    }

    proptest! {
        #[test]
        fn metrics_mean_between_min_and_max(ds in arb_dataset()) {
            let view = FilteredView::all(&ds);
            let m = compute_metrics(&view);
            prop_assert_eq!(m.count, ds.len());
            if !ds.is_empty() {
                prop_assert!(m.min_salary <= m.mean_salary);
                prop_assert!(m.mean_salary <= m.max_salary);
                prop_assert!(m.min_salary <= m.median_salary && m.median_salary <= m.max_salary);
            }
        }

        #[test]
        fn top_n_is_bounded_and_ascending(ds in arb_dataset(), n in 0usize..6) {
            let view = FilteredView::all(&ds);
            let top = top_n_by_mean(&view, Attribute::JobTitle, Attribute::SalaryUsd, n, SortOrder::Ascending);
            prop_assert!(top.len() <= n);
            prop_assert!(top.windows(2).all(|w| w[0].mean <= w[1].mean));
        }

        #[test]
        fn category_counts_sum_to_view_len(ds in arb_dataset()) {
            let view = FilteredView::all(&ds);
            let total: usize = category_counts(&view, Attribute::RemoteType).iter().map(|c| c.count).sum();
            prop_assert_eq!(total, view.len());
        }

        #[test]
        fn histogram_counts_sum_to_view_len(ds in arb_dataset(), bins in 1usize..40) {
            let view = FilteredView::all(&ds);
            let buckets = histogram_buckets(&view, Attribute::SalaryUsd, bins);
            let total: usize = buckets.iter().map(|b| b.count).sum();
            prop_assert_eq!(total, view.len());
            if !view.is_empty() {
                prop_assert_eq!(buckets.len(), bins);
            }
        }

        #[test]
        fn pipeline_is_deterministic(ds in arb_dataset()) {
            let spec = FilterSpec::select_all(&ds);
            let a = apply_filter(&ds, &spec);
            let b = apply_filter(&ds, &spec);
            prop_assert_eq!(a.indices(), b.indices());
            prop_assert_eq!(compute_metrics(&a), compute_metrics(&b));
            prop_assert_eq!(category_counts(&a, Attribute::JobTitle), category_counts(&b, Attribute::JobTitle));
        }
    }
}
