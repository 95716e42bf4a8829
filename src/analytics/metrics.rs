//! Summary structures produced by aggregation

use crate::models::{Dimension, RecordKind, Status};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the dashboards and exports read for one record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Kind the summary was computed for
    pub kind: RecordKind,

    /// Records of that kind in the input
    pub total_records: u64,

    /// Records per status, with every status of the kind present
    pub counts: BTreeMap<Status, u64>,

    /// Financial totals, failed records excluded
    pub sums: MonetarySums,

    /// Grouped counts per configured dimension
    pub distributions: BTreeMap<Dimension, Vec<DistributionEntry>>,

    /// Twelve calendar-month buckets, January first
    pub monthly_trend: Vec<MonthBucket>,

    /// Records left out of the monthly trend for an unparseable date
    pub undated_records: u64,

    pub ratios: RatioMetrics,

    pub resolution: ResolutionMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonetarySums {
    pub total_value: f64,
    pub received_value: f64,
    pub remaining_value: f64,
}

/// One group of a distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    /// Truncated value for chart axes
    pub label: String,

    /// Untruncated value for tooltips
    pub value: String,

    pub count: u64,

    /// Summed quantity of the group's records
    pub quantity: f64,

    /// Series color, fixed by rank
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    /// English month name
    pub month: String,
    pub count: u64,
}

/// Percentages over the record set; 0 when the denominator is empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioMetrics {
    /// Share of records in the last chain status
    pub completion_rate: f64,

    /// Share of records in the failure status
    pub failure_rate: f64,

    /// Received value as a share of total value
    pub collection_rate: f64,
}

/// Time-to-resolve over records that carry a resolution instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionMetrics {
    pub resolved_records: u64,
    pub mean_time_to_resolve_millis: u64,
    pub mean_time_to_resolve: String,
}
