//! Caller-owned dashboard state
//!
//! The core engines are stateless; a `Session` bundles what a dashboard holds
//! between interactions (the record collection, the active filters and the
//! selected record) and threads it through them.

use crate::analytics::{AggregationEngine, Summary};
use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::filter::{FilterEngine, FilterPredicates};
use crate::lifecycle::StatusLifecycle;
use crate::models::{ServiceRecord, Status};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub records: Vec<ServiceRecord>,
    pub filters: FilterPredicates,
    pub selection: Option<String>,
}

impl Session {
    pub fn new(records: Vec<ServiceRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn with_filters(mut self, filters: FilterPredicates) -> Self {
        self.filters = filters;
        self
    }

    /// Records passing the active filters
    pub fn visible(&self) -> Vec<ServiceRecord> {
        FilterEngine::filter(&self.records, &self.filters)
    }

    /// Statistics over the visible records
    pub fn summary(&self, engine: &AggregationEngine) -> Summary {
        engine.aggregate(&self.visible())
    }

    pub fn find(&self, id: &str) -> Option<&ServiceRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Select a record by id
    pub fn select(&mut self, id: &str) -> Result<&ServiceRecord> {
        let index = self.index_of(id)?;
        self.selection = Some(id.to_string());
        Ok(&self.records[index])
    }

    pub fn selected(&self) -> Option<&ServiceRecord> {
        self.selection.as_deref().and_then(|id| self.find(id))
    }

    /// Apply a transition to the record with `id` and put the updated record
    /// back in its place
    pub fn transition<C: Clock>(
        &mut self,
        lifecycle: &StatusLifecycle<C>,
        id: &str,
        to: Status,
        note: Option<String>,
        date: Option<NaiveDateTime>,
    ) -> Result<&ServiceRecord> {
        let index = self.index_of(id)?;
        let updated = lifecycle.transition(&self.records[index], to, note, date)?;
        self.records[index] = updated;
        Ok(&self.records[index])
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("record {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::lifecycle::LifecycleTable;
    use crate::models::RecordKind;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn session() -> Session {
        let table = LifecycleTable::default();
        let mut a = ServiceRecord::new(RecordKind::Contract, &table, now());
        a.id = "a".into();
        a.facility = Some("North".into());
        let mut b = ServiceRecord::new(RecordKind::Contract, &table, now());
        b.id = "b".into();
        b.facility = Some("South".into());
        Session::new(vec![a, b])
    }

    #[test]
    fn test_transition_replaces_record_in_place() {
        let mut session = session();
        let lifecycle = StatusLifecycle::new(LifecycleTable::default()).with_clock(FixedClock(now()));

        let updated = session
            .transition(&lifecycle, "b", Status::Approved, None, None)
            .unwrap();
        assert_eq!(updated.status, Status::Approved);
        assert_eq!(session.records.len(), 2);
        assert_eq!(session.records[1].status, Status::Approved);
        assert_eq!(session.records[0].status, Status::New);
    }

    #[test]
    fn test_failed_transition_leaves_collection_untouched() {
        let mut session = session();
        let lifecycle = StatusLifecycle::new(LifecycleTable::default());
        let before = session.records.clone();

        let err = session
            .transition(&lifecycle, "a", Status::Open, None, None)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert_eq!(session.records, before);

        let err = session
            .transition(&lifecycle, "zzz", Status::Approved, None, None)
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_visible_and_summary_follow_filters() {
        let session = session().with_filters(FilterPredicates::default().with_facility("South"));
        let engine = AggregationEngine::new(RecordKind::Contract, &LifecycleTable::default());

        assert_eq!(session.visible().len(), 1);
        assert_eq!(session.summary(&engine).total_records, 1);
    }

    #[test]
    fn test_selection() {
        let mut session = session();
        assert!(session.selected().is_none());
        session.select("a").unwrap();
        assert_eq!(session.selected().map(|r| r.id.as_str()), Some("a"));
        assert!(session.select("missing").is_err());
    }
}
