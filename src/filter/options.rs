//! Option sets for the filter dropdowns

use crate::filter::predicates::ALL;
use crate::lifecycle::Chain;
use crate::models::ReferenceEntry;
use serde::Serialize;
use std::collections::BTreeSet;

/// One selectable filter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    fn all() -> Self {
        Self {
            value: ALL.to_string(),
            label: "All".to_string(),
        }
    }
}

/// Options for a facility or supplier filter: the `all` sentinel followed by
/// each distinct, non-blank reference name in alphabetical order
pub fn option_set(entries: &[ReferenceEntry]) -> Vec<FilterOption> {
    let names: BTreeSet<&str> = entries
        .iter()
        .map(|e| e.name.trim())
        .filter(|name| !name.is_empty())
        .collect();

    std::iter::once(FilterOption::all())
        .chain(names.into_iter().map(|name| FilterOption {
            value: name.to_string(),
            label: name.to_string(),
        }))
        .collect()
}

/// Options for the status filter, in lifecycle order
pub fn status_options(chain: &Chain) -> Vec<FilterOption> {
    std::iter::once(FilterOption::all())
        .chain(chain.all_statuses().map(|status| FilterOption {
            value: status.to_string(),
            label: status.to_string(),
        }))
        .collect()
}
