//! Record filtering
//!
//! Every predicate is optional; the `"all"` sentinel or an empty string
//! disables it. Active predicates combine with AND and the result is
//! recomputed in full on every change.

mod engine;
mod options;
mod predicates;

pub use engine::FilterEngine;
pub use options::{option_set, status_options, FilterOption};
pub use predicates::{Constraint, FilterPredicates, ALL};
