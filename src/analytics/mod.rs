//! Aggregate statistics over (filtered) record sets
//!
//! This module derives everything the dashboards and exports display from a
//! record collection, in a single pass:
//!
//! - **Status counts**: zero-filled over every status of the kind
//! - **Monetary sums**: total, received and remaining value, with records in
//!   the failure status contributing nothing
//! - **Distributions**: counts and summed quantities per facility, supplier or
//!   category, ranked, with truncated labels and rank-indexed colors
//! - **Monthly trend**: twelve calendar-month buckets, year ignored
//! - **Ratios**: completion, failure and collection percentages
//! - **Resolution**: mean time to resolve
//!
//! A record with an unparseable primary date is left out of the monthly trend
//! only; every other figure still counts it.
//!
//! # Example
//!
//! ```
//! use service_records::analytics::AggregationEngine;
//! use service_records::lifecycle::LifecycleTable;
//! use service_records::models::{RecordKind, Status};
//!
//! let engine = AggregationEngine::new(RecordKind::Contract, &LifecycleTable::default());
//! let summary = engine.aggregate(&[]);
//!
//! assert_eq!(summary.counts[&Status::New], 0);
//! assert_eq!(summary.monthly_trend.len(), 12);
//! assert_eq!(summary.ratios.completion_rate, 0.0);
//! ```

mod aggregation;
mod error;
mod metrics;
mod palette;
mod statistics;

pub use aggregation::AggregationEngine;
pub use error::{AnalyticsError, AnalyticsResult};
pub use metrics::{
    DistributionEntry, MonetarySums, MonthBucket, RatioMetrics, ResolutionMetrics, Summary,
};
pub use palette::{truncate_label, Palette};
pub use statistics::{mean, percentage, ratio, try_ratio};
