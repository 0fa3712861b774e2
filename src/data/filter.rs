use std::collections::BTreeSet;

use super::model::{Attribute, CellValue, Dataset, Record};

// ---------------------------------------------------------------------------
// Filter dimensions
// ---------------------------------------------------------------------------

/// The attributes the sidebar lets the user filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Year,
    Seniority,
    ContractType,
    CompanySize,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Year,
        Dimension::Seniority,
        Dimension::ContractType,
        Dimension::CompanySize,
    ];

    pub fn attribute(self) -> Attribute {
        match self {
            Dimension::Year => Attribute::Year,
            Dimension::Seniority => Attribute::Seniority,
            Dimension::ContractType => Attribute::ContractType,
            Dimension::CompanySize => Attribute::CompanySize,
        }
    }
}

/// Sorted distinct values of `attribute` across the whole dataset.
pub fn distinct_values(dataset: &Dataset, attribute: Attribute) -> BTreeSet<CellValue> {
    dataset
        .records
        .iter()
        .map(|r| r.value(attribute))
        .collect()
}

// ---------------------------------------------------------------------------
// FilterSpec: which values are allowed per dimension
// ---------------------------------------------------------------------------

/// Allowed values per filter dimension.
///
/// A record matches when each of its four dimension values is in the
/// corresponding set. An empty set matches nothing, so `FilterSpec::default()`
/// hides every record; use [`FilterSpec::select_all`] for the "show
/// everything" starting point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub years: BTreeSet<CellValue>,
    pub seniorities: BTreeSet<CellValue>,
    pub contract_types: BTreeSet<CellValue>,
    pub company_sizes: BTreeSet<CellValue>,
}

impl FilterSpec {
    /// Every dimension set to all values observed in `dataset`.
    pub fn select_all(dataset: &Dataset) -> Self {
        let mut spec = FilterSpec::default();
        for dim in Dimension::ALL {
            *spec.selection_mut(dim) = distinct_values(dataset, dim.attribute());
        }
        spec
    }

    pub fn selection(&self, dim: Dimension) -> &BTreeSet<CellValue> {
        match dim {
            Dimension::Year => &self.years,
            Dimension::Seniority => &self.seniorities,
            Dimension::ContractType => &self.contract_types,
            Dimension::CompanySize => &self.company_sizes,
        }
    }

    pub fn selection_mut(&mut self, dim: Dimension) -> &mut BTreeSet<CellValue> {
        match dim {
            Dimension::Year => &mut self.years,
            Dimension::Seniority => &mut self.seniorities,
            Dimension::ContractType => &mut self.contract_types,
            Dimension::CompanySize => &mut self.company_sizes,
        }
    }

    /// Add `value` to the dimension if absent, remove it otherwise.
    pub fn toggle(&mut self, dim: Dimension, value: &CellValue) {
        let selected = self.selection_mut(dim);
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
    }

    /// Replace the dimension's selection with `choices`.
    pub fn select_all_in(&mut self, dim: Dimension, choices: &BTreeSet<CellValue>) {
        *self.selection_mut(dim) = choices.clone();
    }

    /// Deselect every value of the dimension.
    pub fn clear(&mut self, dim: Dimension) {
        self.selection_mut(dim).clear();
    }

    /// Whether `record` passes all four dimensions.
    pub fn matches(&self, record: &Record) -> bool {
        self.years.contains(&CellValue::Integer(record.year))
            && contains_text(&self.seniorities, &record.seniority)
            && contains_text(&self.contract_types, &record.contract_type)
            && contains_text(&self.company_sizes, &record.company_size)
    }
}

fn contains_text(set: &BTreeSet<CellValue>, value: &str) -> bool {
    !set.is_empty() && set.contains(&CellValue::Text(value.to_owned()))
}

// ---------------------------------------------------------------------------
// FilteredView
// ---------------------------------------------------------------------------

/// The records of a dataset that matched a [`FilterSpec`], in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every record of `dataset`.
    pub fn all(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Rebuild a view from previously computed row indices.
    pub fn from_indices(dataset: &'a Dataset, indices: Vec<usize>) -> Self {
        debug_assert!(indices.iter().all(|&i| i < dataset.len()));
        FilteredView { dataset, indices }
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records[i])
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Single pass over `dataset` keeping the records that match `spec`.
pub fn apply_filter<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredView<'a> {
    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| spec.matches(r))
        .map(|(i, _)| i)
        .collect();
    FilteredView { dataset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{arb_dataset, record, two_rows};
    use proptest::prelude::*;

    fn text_set(values: &[&str]) -> BTreeSet<CellValue> {
        values.iter().map(|v| CellValue::from(*v)).collect()
    }

    #[test]
    fn distinct_values_are_sorted_and_deduplicated() {
        let ds = Dataset::from_records(
            vec![
                record(2024, "Senior", "FT", "M", "A", "Remote", "USA", 1.0),
                record(2020, "Junior", "FT", "S", "B", "Remote", "USA", 2.0),
                record(2024, "Senior", "PT", "L", "A", "Hybrid", "BRA", 3.0),
            ],
            "memory",
        );
        let years: Vec<_> = distinct_values(&ds, Attribute::Year).into_iter().collect();
        assert_eq!(years, vec![CellValue::Integer(2020), CellValue::Integer(2024)]);
        assert_eq!(
            distinct_values(&ds, Attribute::CompanySize),
            text_set(&["L", "M", "S"])
        );
    }

    #[test]
    fn select_all_keeps_every_record() {
        let ds = two_rows();
        let view = apply_filter(&ds, &FilterSpec::select_all(&ds));
        assert_eq!(view.indices(), &[0, 1]);
    }

    #[test]
    fn default_spec_matches_nothing() {
        let ds = two_rows();
        assert!(apply_filter(&ds, &FilterSpec::default()).is_empty());
    }

    #[test]
    fn any_empty_dimension_empties_the_view() {
        let ds = two_rows();
        for dim in Dimension::ALL {
            let mut spec = FilterSpec::select_all(&ds);
            spec.clear(dim);
            assert!(apply_filter(&ds, &spec).is_empty(), "{dim:?}");
        }
    }

    #[test]
    fn seniority_filter_keeps_matching_rows() {
        let ds = two_rows();
        let mut spec = FilterSpec::select_all(&ds);
        spec.seniorities = text_set(&["Senior"]);
        let view = apply_filter(&ds, &spec);
        assert_eq!(view.len(), 1);
        assert_eq!(view.records().next().unwrap().job_title, "Data Scientist");
    }

    #[test]
    fn toggle_and_select_all_in_round_trip() {
        let ds = two_rows();
        let all = FilterSpec::select_all(&ds);
        let mut spec = all.clone();
        let senior = CellValue::from("Senior");

        spec.toggle(Dimension::Seniority, &senior);
        assert!(!spec.seniorities.contains(&senior));
        assert_eq!(apply_filter(&ds, &spec).len(), 1);

        spec.toggle(Dimension::Seniority, &senior);
        assert_eq!(spec, all);

        spec.clear(Dimension::Year);
        assert!(spec.selection(Dimension::Year).is_empty());
        spec.select_all_in(Dimension::Year, all.selection(Dimension::Year));
        assert_eq!(spec, all);
    }

    #[test]
    fn duplicates_are_preserved() {
        let row = record(2023, "Senior", "FT", "M", "A", "Remote", "USA", 1.0);
        let ds = Dataset::from_records(vec![row.clone(), row], "memory");
        assert_eq!(apply_filter(&ds, &FilterSpec::select_all(&ds)).len(), 2);
    }

    proptest! {
        #[test]
        fn full_selection_returns_whole_dataset(ds in arb_dataset()) {
            let view = apply_filter(&ds, &FilterSpec::select_all(&ds));
            prop_assert_eq!(view.into_indices(), (0..ds.len()).collect::<Vec<_>>());
        }

        #[test]
        fn empty_dimension_returns_empty_view(ds in arb_dataset(), which in 0usize..4) {
            let mut spec = FilterSpec::select_all(&ds);
            spec.clear(Dimension::ALL[which]);
            prop_assert!(apply_filter(&ds, &spec).is_empty());
        }

        #[test]
        fn filtered_records_all_match(ds in arb_dataset(), keep_year in 2020i64..2025) {
            let mut spec = FilterSpec::select_all(&ds);
            spec.years = [CellValue::Integer(keep_year)].into_iter().collect();
            let view = apply_filter(&ds, &spec);
            prop_assert!(view.records().all(|r| r.year == keep_year));
            let expected = ds.records.iter().filter(|r| r.year == keep_year).count();
            prop_assert_eq!(view.len(), expected);
        }
    }
}
