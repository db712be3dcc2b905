//! Filter stage: narrows the stakeholder selection list.
//!
//! Filters restrict *selection choices* only. Row resolution and hierarchy
//! building always run against the full dataset so managers and reports
//! outside the filtered view stay discoverable.

use crate::dataset::{Dataset, StakeholderRow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Zero or more equality filters over the categorical columns, combined with
/// AND semantics. `None` means "no filter" on that attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSelection {
    pub business_group: Option<String>,
    pub business_segment: Option<String>,
    pub working_group: Option<String>,
    pub business_functions: Option<String>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.business_group.is_none()
            && self.business_segment.is_none()
            && self.working_group.is_none()
            && self.business_functions.is_none()
    }

    /// Exact-match AND across all selected attributes. A row with an absent
    /// value never matches a selected filter.
    pub fn matches(&self, row: &StakeholderRow) -> bool {
        fn ok(selected: &Option<String>, value: &Option<String>) -> bool {
            match selected {
                None => true,
                Some(want) => value.as_deref() == Some(want.as_str()),
            }
        }

        ok(&self.business_group, &row.business_group)
            && ok(&self.business_segment, &row.business_segment)
            && ok(&self.working_group, &row.working_group)
            && ok(&self.business_functions, &row.business_functions)
    }
}

/// Distinct values available for each filterable column, sorted.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions {
    pub business_group: Vec<String>,
    pub business_segment: Vec<String>,
    pub working_group: Vec<String>,
    pub business_functions: Vec<String>,
}

/// Rows matching every selected filter, in dataset order.
pub fn apply<'a>(dataset: &'a Dataset, filters: &FilterSelection) -> Vec<&'a StakeholderRow> {
    dataset.rows.iter().filter(|r| filters.matches(r)).collect()
}

/// De-duplicated, sorted identity list of the filtered subset — the
/// stakeholder dropdown contents.
pub fn stakeholder_options(dataset: &Dataset, filters: &FilterSelection) -> Vec<String> {
    apply(dataset, filters)
        .into_iter()
        .map(|r| r.client_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct values per filterable column across the whole dataset.
pub fn filter_options(dataset: &Dataset) -> FilterOptions {
    fn distinct(dataset: &Dataset, get: fn(&StakeholderRow) -> &Option<String>) -> Vec<String> {
        dataset
            .rows
            .iter()
            .filter_map(|r| get(r).clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    FilterOptions {
        business_group: distinct(dataset, |r| &r.business_group),
        business_segment: distinct(dataset, |r| &r.business_segment),
        working_group: distinct(dataset, |r| &r.working_group),
        business_functions: distinct(dataset, |r| &r.business_functions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_support::{dataset, row};
    use crate::dataset::StakeholderRow;

    fn grouped(name: &str, group: &str, segment: &str) -> StakeholderRow {
        StakeholderRow {
            business_group: Some(group.to_string()),
            business_segment: Some(segment.to_string()),
            ..row(name, None, None)
        }
    }

    #[test]
    fn test_no_filters_matches_all() {
        let ds = dataset(vec![grouped("Alice", "Tech", "B2B"), grouped("Bob", "Ops", "B2C")]);
        let filters = FilterSelection::default();
        assert!(filters.is_empty());
        assert_eq!(apply(&ds, &filters).len(), 2);
    }

    #[test]
    fn test_and_semantics_exact_match() {
        let ds = dataset(vec![
            grouped("Alice", "Tech", "B2B"),
            grouped("Bob", "Tech", "B2C"),
            grouped("Carol", "Ops", "B2B"),
        ]);
        let filters = FilterSelection {
            business_group: Some("Tech".to_string()),
            business_segment: Some("B2B".to_string()),
            ..Default::default()
        };

        let subset = apply(&ds, &filters);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].client_name, "Alice");
    }

    #[test]
    fn test_absent_value_never_matches() {
        let ds = dataset(vec![row("Alice", None, None)]);
        let filters = FilterSelection {
            business_group: Some("Tech".to_string()),
            ..Default::default()
        };
        assert!(apply(&ds, &filters).is_empty());
    }

    #[test]
    fn test_options_deduplicated_and_sorted() {
        let ds = dataset(vec![
            grouped("Zed", "Tech", "B2B"),
            grouped("Alice", "Tech", "B2B"),
            grouped("Zed", "Ops", "B2B"),
        ]);

        assert_eq!(
            stakeholder_options(&ds, &FilterSelection::default()),
            vec!["Alice", "Zed"]
        );

        let options = filter_options(&ds);
        assert_eq!(options.business_group, vec!["Ops", "Tech"]);
        assert_eq!(options.business_segment, vec!["B2B"]);
        assert!(options.working_group.is_empty());
    }

    #[test]
    fn test_zero_match_filter_yields_empty_options() {
        let ds = dataset(vec![grouped("Alice", "Tech", "B2B")]);
        let filters = FilterSelection {
            working_group: Some("Nonexistent".to_string()),
            ..Default::default()
        };
        assert!(stakeholder_options(&ds, &filters).is_empty());
    }
}
