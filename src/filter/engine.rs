//! Predicate evaluation over record collections

use crate::dates;
use crate::filter::predicates::{Constraint, FilterPredicates};
use crate::models::{ServiceRecord, Status, TextField};
use chrono::NaiveDate;

/// Applies filter predicates to record collections
pub struct FilterEngine;

impl FilterEngine {
    /// Records matching every active predicate, in their original order.
    ///
    /// The input is never mutated; matching records are cloned into the
    /// result.
    pub fn filter(records: &[ServiceRecord], predicates: &FilterPredicates) -> Vec<ServiceRecord> {
        let compiled = CompiledFilter::new(predicates);
        let filtered: Vec<_> = records
            .iter()
            .filter(|r| compiled.matches(r))
            .cloned()
            .collect();

        tracing::debug!(
            total = records.len(),
            matched = filtered.len(),
            "Filtered service records"
        );

        filtered
    }

    /// Whether a single record passes the predicates
    pub fn matches(record: &ServiceRecord, predicates: &FilterPredicates) -> bool {
        CompiledFilter::new(predicates).matches(record)
    }
}

enum StatusMatch {
    Any,
    Is(Status),
    Nothing,
}

/// Predicates with bounds parsed once per filter call
struct CompiledFilter<'a> {
    facility: &'a Constraint,
    supplier: &'a Constraint,
    category: &'a Constraint,
    status: StatusMatch,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    search: Option<&'a str>,
    search_fields: &'a [TextField],
}

impl<'a> CompiledFilter<'a> {
    fn new(predicates: &'a FilterPredicates) -> Self {
        let status = match predicates.status.value() {
            None => StatusMatch::Any,
            Some(raw) => match raw.parse::<Status>() {
                Ok(status) => StatusMatch::Is(status),
                Err(_) => StatusMatch::Nothing,
            },
        };

        Self {
            facility: &predicates.facility,
            supplier: &predicates.supplier,
            category: &predicates.category,
            status,
            from: bound(&predicates.date_from, "from"),
            to: bound(&predicates.date_to, "to"),
            search: predicates.search.value(),
            search_fields: &predicates.search_fields,
        }
    }

    fn matches(&self, record: &ServiceRecord) -> bool {
        self.facility.matches(record.facility.as_deref())
            && self.supplier.matches(record.supplier.as_deref())
            && self.category.matches(record.category.as_deref())
            && self.matches_status(record)
            && self.matches_date(record)
            && self.matches_search(record)
    }

    fn matches_status(&self, record: &ServiceRecord) -> bool {
        match self.status {
            StatusMatch::Any => true,
            StatusMatch::Is(status) => record.status == status,
            StatusMatch::Nothing => false,
        }
    }

    fn matches_date(&self, record: &ServiceRecord) -> bool {
        if self.from.is_none() && self.to.is_none() {
            return true;
        }

        let date = match record.parsed_primary_date() {
            Ok(date) => date,
            Err(e) => {
                tracing::debug!(record_id = %record.id, error = %e, "Excluding record from date range");
                return false;
            }
        };

        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    fn matches_search(&self, record: &ServiceRecord) -> bool {
        let Some(term) = self.search else {
            return true;
        };

        self.search_fields
            .iter()
            .filter_map(|field| record.text(*field))
            .any(|text| text.contains(term))
    }
}

fn bound(constraint: &Constraint, side: &str) -> Option<NaiveDate> {
    let raw = constraint.value()?;
    match dates::parse_date(raw) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!(side, error = %e, "Ignoring malformed date bound");
            None
        }
    }
}
