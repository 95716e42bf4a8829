//! Filter values as chosen by the operator

use crate::config::FilterConfig;
use crate::models::TextField;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Sentinel value meaning "no constraint"
pub const ALL: &str = "all";

/// A single optional constraint. `"all"` and the empty string both mean
/// "no constraint".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Constraint {
    #[default]
    Any,
    Exactly(String),
}

impl Constraint {
    /// Constrained value, if any
    pub fn value(&self) -> Option<&str> {
        match self {
            Constraint::Any => None,
            Constraint::Exactly(v) => Some(v.as_str()),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Constraint::Exactly(_))
    }

    /// Case-sensitive exact match, ignoring surrounding whitespace on the
    /// candidate the same way distributions group it. A missing candidate
    /// only passes an inactive constraint.
    pub fn matches(&self, candidate: Option<&str>) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::Exactly(v) => candidate.map(str::trim) == Some(v.as_str()),
        }
    }
}

impl From<String> for Constraint {
    fn from(value: String) -> Self {
        if value.is_empty() || value == ALL {
            Constraint::Any
        } else {
            Constraint::Exactly(value)
        }
    }
}

impl From<&str> for Constraint {
    fn from(value: &str) -> Self {
        Constraint::from(value.to_string())
    }
}

impl From<Constraint> for String {
    fn from(value: Constraint) -> Self {
        match value {
            Constraint::Any => ALL.to_string(),
            Constraint::Exactly(v) => v,
        }
    }
}

/// The full set of filter values; all active predicates combine with AND
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPredicates {
    #[serde(default)]
    pub facility: Constraint,

    #[serde(default)]
    pub supplier: Constraint,

    #[serde(default)]
    pub category: Constraint,

    #[serde(default)]
    pub status: Constraint,

    /// Inclusive lower bound on the primary date
    #[serde(default)]
    pub date_from: Constraint,

    /// Inclusive upper bound on the primary date
    #[serde(default)]
    pub date_to: Constraint,

    /// Substring searched for in `search_fields`
    #[serde(default)]
    pub search: Constraint,

    /// Fields the search term is looked up in
    #[serde(default = "all_text_fields")]
    pub search_fields: Vec<TextField>,
}

impl Default for FilterPredicates {
    fn default() -> Self {
        Self {
            facility: Constraint::Any,
            supplier: Constraint::Any,
            category: Constraint::Any,
            status: Constraint::Any,
            date_from: Constraint::Any,
            date_to: Constraint::Any,
            search: Constraint::Any,
            search_fields: all_text_fields(),
        }
    }
}

impl FilterPredicates {
    /// No constraints, searching the configured fields
    pub fn from_config(config: &FilterConfig) -> Self {
        Self {
            search_fields: config.search_fields.clone(),
            ..Self::default()
        }
    }

    pub fn with_facility(mut self, facility: impl Into<String>) -> Self {
        self.facility = Constraint::from(facility.into());
        self
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Constraint::from(supplier.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Constraint::from(category.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Constraint::from(status.into());
        self
    }

    /// Set either bound; the sentinel leaves that side open
    pub fn with_date_range(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.date_from = Constraint::from(from.into());
        self.date_to = Constraint::from(to.into());
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Constraint::from(term.into());
        self
    }

    pub fn with_search_fields(mut self, fields: Vec<TextField>) -> Self {
        self.search_fields = fields;
        self
    }

    /// True when no predicate constrains anything
    pub fn is_empty(&self) -> bool {
        !self.facility.is_active()
            && !self.supplier.is_active()
            && !self.category.is_active()
            && !self.status.is_active()
            && !self.date_from.is_active()
            && !self.date_to.is_active()
            && !self.search.is_active()
    }

    /// Clear every predicate, keeping the search fields
    pub fn reset(&mut self) {
        *self = Self {
            search_fields: std::mem::take(&mut self.search_fields),
            ..Self::default()
        };
    }
}

fn all_text_fields() -> Vec<TextField> {
    TextField::iter().collect()
}
