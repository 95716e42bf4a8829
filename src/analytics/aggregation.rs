//! Single-pass aggregation of record collections

use crate::analytics::error::AnalyticsResult;
use crate::analytics::metrics::{
    DistributionEntry, MonetarySums, MonthBucket, RatioMetrics, ResolutionMetrics, Summary,
};
use crate::analytics::palette::{truncate_label, Palette};
use crate::analytics::statistics::{mean, percentage};
use crate::config::AnalyticsConfig;
use crate::downtime::{format_duration, DowntimeCalculator};
use crate::lifecycle::{Chain, LifecycleTable};
use crate::models::{Dimension, RecordKind, ServiceRecord};
use chrono::{Datelike, Month};
use std::collections::{BTreeMap, HashMap};

/// Derives summary statistics for one record kind.
///
/// Aggregation is a pure function of its input: it never mutates records and
/// keeps no state between calls, so callers recompute whenever the filtered
/// set changes.
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    kind: RecordKind,
    chain: Chain,
    config: AnalyticsConfig,
    palette: Palette,
}

#[derive(Default)]
struct Group {
    count: u64,
    quantity: f64,
}

impl AggregationEngine {
    /// Engine for `kind` with default analytics options
    pub fn new(kind: RecordKind, table: &LifecycleTable) -> Self {
        Self::with_config(kind, table, AnalyticsConfig::default())
    }

    pub fn with_config(kind: RecordKind, table: &LifecycleTable, config: AnalyticsConfig) -> Self {
        Self {
            kind,
            chain: table.chain(kind).clone(),
            palette: Palette::new(config.palette.clone()),
            config,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Aggregate a record set. Records of other kinds, or in a status their
    /// kind does not define, are ignored.
    pub fn aggregate(&self, records: &[ServiceRecord]) -> Summary {
        let mut counts: BTreeMap<_, u64> = self.chain.all_statuses().map(|s| (s, 0)).collect();
        let mut sums = MonetarySums::default();
        let mut groups: HashMap<Dimension, HashMap<&str, Group>> = self
            .config
            .dimensions
            .iter()
            .map(|d| (*d, HashMap::new()))
            .collect();
        let mut months = [0u64; 12];
        let mut undated_records = 0u64;
        let mut resolve_times = Vec::new();
        let mut total_records = 0u64;
        let downtime = DowntimeCalculator::new();

        for record in records {
            if record.kind != self.kind {
                tracing::debug!(
                    record_id = %record.id,
                    kind = %record.kind,
                    expected = %self.kind,
                    "Skipping record of another kind"
                );
                continue;
            }
            let Some(count) = counts.get_mut(&record.status) else {
                tracing::warn!(
                    record_id = %record.id,
                    kind = %record.kind,
                    status = %record.status,
                    "Skipping record with a status outside its chain"
                );
                continue;
            };
            *count += 1;
            total_records += 1;

            if !self.chain.is_failure(record.status) {
                sums.total_value += amount(record.total_value);
                sums.received_value += amount(record.received_value);
                sums.remaining_value += amount(record.remaining_value);
            }

            for (dimension, by_value) in groups.iter_mut() {
                let group = by_value.entry(self.group_key(record, *dimension)).or_default();
                group.count += 1;
                group.quantity += amount(record.quantity);
            }

            match month_index(record) {
                Ok(month) => months[month] += 1,
                Err(e) => {
                    undated_records += 1;
                    tracing::debug!(
                        record_id = %record.id,
                        error = %e,
                        "Excluding record from monthly trend"
                    );
                }
            }

            if record.resolved_at.is_some() {
                let elapsed = downtime.for_record(record);
                if elapsed.valid {
                    resolve_times.push(elapsed.millis as f64);
                }
            }
        }

        let distributions = groups
            .into_iter()
            .map(|(dimension, by_value)| (dimension, self.rank(by_value)))
            .collect();

        let total = total_records as f64;
        let ratios = RatioMetrics {
            completion_rate: percentage(counts[&self.chain.last()] as f64, total),
            failure_rate: percentage(counts[&self.chain.failure()] as f64, total),
            collection_rate: percentage(sums.received_value, sums.total_value),
        };

        let mean_millis = mean(&resolve_times).round() as u64;
        let resolution = ResolutionMetrics {
            resolved_records: resolve_times.len() as u64,
            mean_time_to_resolve_millis: mean_millis,
            mean_time_to_resolve: format_duration(mean_millis),
        };

        tracing::debug!(
            kind = %self.kind,
            total_records,
            undated_records,
            "Aggregated service records"
        );

        Summary {
            kind: self.kind,
            total_records,
            counts,
            sums,
            distributions,
            monthly_trend: monthly_buckets(&months),
            undated_records,
            ratios,
            resolution,
        }
    }

    /// Distribution of a single dimension, regardless of the configured set
    pub fn distribution(&self, records: &[ServiceRecord], dimension: Dimension) -> Vec<DistributionEntry> {
        let mut by_value: HashMap<&str, Group> = HashMap::new();
        for record in records
            .iter()
            .filter(|r| r.kind == self.kind && self.chain.contains(r.status))
        {
            let group = by_value.entry(self.group_key(record, dimension)).or_default();
            group.count += 1;
            group.quantity += amount(record.quantity);
        }
        self.rank(by_value)
    }

    /// Group a record falls into; blank values share the unassigned bucket
    fn group_key<'a>(&'a self, record: &'a ServiceRecord, dimension: Dimension) -> &'a str {
        record
            .dimension(dimension)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(self.config.unassigned_label.as_str())
    }

    /// Sort groups by count descending, ties by value, and assign labels and
    /// colors by rank
    fn rank(&self, by_value: HashMap<&str, Group>) -> Vec<DistributionEntry> {
        let mut ranked: Vec<_> = by_value.into_iter().collect();
        ranked.sort_by(|(va, a), (vb, b)| b.count.cmp(&a.count).then_with(|| va.cmp(vb)));

        ranked
            .into_iter()
            .enumerate()
            .map(|(rank, (value, group))| DistributionEntry {
                label: truncate_label(value, self.config.label_max_chars),
                value: value.to_string(),
                count: group.count,
                quantity: group.quantity,
                color: self.palette.color(rank).to_string(),
            })
            .collect()
    }
}

/// Zero-based calendar month of the record's primary date
fn month_index(record: &ServiceRecord) -> AnalyticsResult<usize> {
    Ok(record.parsed_primary_date()?.month0() as usize)
}

/// Absent and negative amounts count as zero
fn amount(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
}

fn monthly_buckets(months: &[u64; 12]) -> Vec<MonthBucket> {
    months
        .iter()
        .enumerate()
        .map(|(i, count)| MonthBucket {
            month: Month::try_from(i as u8 + 1)
                .map(|m| m.name().to_string())
                .unwrap_or_default(),
            count: *count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsError;
    use crate::models::Status;
    use chrono::NaiveDate;

    fn order(status: Status, facility: Option<&str>, quantity: f64) -> ServiceRecord {
        let opened = NaiveDate::from_ymd_opt(2024, 2, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut r = ServiceRecord::new(RecordKind::Order, &LifecycleTable::default(), opened);
        r.status = status;
        r.facility = facility.map(str::to_string);
        r.quantity = Some(quantity);
        r
    }

    #[test]
    fn test_distribution_ranking_and_labels() {
        let engine = AggregationEngine::new(RecordKind::Order, &LifecycleTable::default());
        let records = vec![
            order(Status::New, Some("Central Warehouse Annex"), 2.0),
            order(Status::New, Some("Central Warehouse Annex"), 3.0),
            order(Status::New, Some("East"), 1.0),
            order(Status::New, Some("Bay"), 4.0),
            order(Status::New, None, 1.0),
        ];

        let entries = engine.distribution(&records, Dimension::Facility);
        let values: Vec<_> = entries.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["Central Warehouse Annex", "Bay", "East", "Unspecified"]);

        assert_eq!(entries[0].count, 2);
        assert_eq!(entries[0].quantity, 5.0);
        assert_eq!(entries[0].label, "Central Warehou...");
        assert_eq!(entries[0].color, "#4E79A7");
        assert_eq!(entries[1].color, "#F28E2B");
    }

    #[test]
    fn test_foreign_kind_is_skipped() {
        let engine = AggregationEngine::new(RecordKind::Contract, &LifecycleTable::default());
        let summary = engine.aggregate(&[order(Status::New, None, 1.0)]);
        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.counts[&Status::New], 0);
    }

    #[test]
    fn test_status_outside_chain_is_skipped() {
        let engine = AggregationEngine::new(RecordKind::Order, &LifecycleTable::default());
        let summary = engine.aggregate(&[
            order(Status::New, Some("East"), 1.0),
            order(Status::Closed, Some("East"), 1.0),
        ]);

        assert_eq!(summary.total_records, 1);
        assert!(!summary.counts.contains_key(&Status::Closed));
        assert_eq!(summary.counts.len(), 5);
        assert_eq!(summary.distributions[&Dimension::Facility][0].count, 1);
    }

    #[test]
    fn test_month_index_reports_malformed_dates() {
        let mut record = order(Status::New, None, 1.0);
        assert_eq!(month_index(&record).unwrap(), 1);

        record.primary_date = "10/02/2024".to_string();
        let err = month_index(&record).unwrap_err();
        assert!(matches!(err, AnalyticsError::MalformedDate(ref e) if e.input == "10/02/2024"));
    }

    #[test]
    fn test_negative_amounts_count_as_zero() {
        assert_eq!(amount(Some(-4.0)), 0.0);
        assert_eq!(amount(None), 0.0);
        assert_eq!(amount(Some(f64::NAN)), 0.0);
        assert_eq!(amount(Some(2.5)), 2.5);
    }

    #[test]
    fn test_month_names() {
        let buckets = monthly_buckets(&[0; 12]);
        assert_eq!(buckets[0].month, "January");
        assert_eq!(buckets[11].month, "December");
    }
}
