//! Single-record status transitions

use crate::clock::{Clock, SystemClock};
use crate::config::LifecycleConfig;
use crate::lifecycle::chain::LifecycleTable;
use crate::lifecycle::error::{LifecycleError, LifecycleResult};
use crate::models::{ServiceRecord, Status, StatusEntry};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What happens to a stored history stamp when its status is entered again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisitPolicy {
    /// Keep the first timestamp and note
    #[default]
    Preserve,
    /// Replace timestamp and note with the latest ones
    Overwrite,
}

/// Validates and applies status transitions for every record kind
#[derive(Debug, Clone)]
pub struct StatusLifecycle<C = SystemClock> {
    table: LifecycleTable,
    revisit_policy: RevisitPolicy,
    terminal_is_final: bool,
    clock: C,
}

impl StatusLifecycle<SystemClock> {
    /// Create a lifecycle with default policies
    pub fn new(table: LifecycleTable) -> Self {
        Self {
            table,
            revisit_policy: RevisitPolicy::default(),
            terminal_is_final: true,
            clock: SystemClock,
        }
    }

    /// Create a lifecycle from configuration
    pub fn from_config(config: &LifecycleConfig) -> LifecycleResult<Self> {
        Ok(Self::new(LifecycleTable::from_config(&config.chains)?)
            .with_revisit_policy(config.revisit_policy)
            .with_terminal_is_final(config.terminal_is_final))
    }
}

impl Default for StatusLifecycle<SystemClock> {
    fn default() -> Self {
        Self::new(LifecycleTable::default())
    }
}

impl<C: Clock> StatusLifecycle<C> {
    /// Replace the clock used when no explicit date is given
    pub fn with_clock<D: Clock>(self, clock: D) -> StatusLifecycle<D> {
        StatusLifecycle {
            table: self.table,
            revisit_policy: self.revisit_policy,
            terminal_is_final: self.terminal_is_final,
            clock,
        }
    }

    pub fn with_revisit_policy(mut self, policy: RevisitPolicy) -> Self {
        self.revisit_policy = policy;
        self
    }

    pub fn with_terminal_is_final(mut self, terminal_is_final: bool) -> Self {
        self.terminal_is_final = terminal_is_final;
        self
    }

    pub fn table(&self) -> &LifecycleTable {
        &self.table
    }

    /// Statuses the record may move to next
    pub fn allowed(&self, record: &ServiceRecord) -> Vec<Status> {
        self.table
            .chain(record.kind)
            .allowed_from(record.status, self.terminal_is_final)
    }

    /// Check a transition without applying it
    pub fn validate(&self, record: &ServiceRecord, to: Status) -> LifecycleResult<()> {
        let chain = self.table.chain(record.kind);

        if !chain.contains(record.status) {
            return Err(LifecycleError::UnknownStatus {
                kind: record.kind,
                status: record.status,
            });
        }

        if !chain
            .allowed_from(record.status, self.terminal_is_final)
            .contains(&to)
        {
            return Err(LifecycleError::InvalidTransition {
                kind: record.kind,
                from: record.status,
                to,
            });
        }

        Ok(())
    }

    /// Apply a transition and return the updated record.
    ///
    /// The input record is left untouched. `date` defaults to the clock's
    /// current instant and is used both for the history stamp and for
    /// `resolved_at` when a terminal status is first reached.
    pub fn transition(
        &self,
        record: &ServiceRecord,
        to: Status,
        note: Option<String>,
        date: Option<NaiveDateTime>,
    ) -> LifecycleResult<ServiceRecord> {
        if let Err(e) = self.validate(record, to) {
            tracing::warn!(
                record_id = %record.id,
                kind = %record.kind,
                from = %record.status,
                to = %to,
                error = %e,
                "Rejected status transition"
            );
            return Err(e);
        }

        let chain = self.table.chain(record.kind);
        let at = date.unwrap_or_else(|| self.clock.now());
        let was_terminal = chain.is_terminal(record.status);

        let mut next = record.clone();
        next.status = to;

        if !next.status_history.contains_key(&to) || self.revisit_policy == RevisitPolicy::Overwrite {
            next.status_history.insert(to, StatusEntry::new(at, note), chain);
        }

        if chain.is_terminal(to) {
            if !was_terminal && next.resolved_at.is_none() {
                next.resolved_at = Some(at);
            }
        } else {
            // Only reachable when terminal statuses may be left
            next.resolved_at = None;
        }

        tracing::debug!(
            record_id = %next.id,
            kind = %next.kind,
            from = %record.status,
            to = %to,
            "Applied status transition"
        );

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::RecordKind;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn lifecycle() -> StatusLifecycle<FixedClock> {
        StatusLifecycle::new(LifecycleTable::default()).with_clock(FixedClock(at(20, 12)))
    }

    fn contract() -> ServiceRecord {
        ServiceRecord::new(RecordKind::Contract, &LifecycleTable::default(), at(1, 8))
    }

    #[test]
    fn test_advance_stamps_history() {
        let lc = lifecycle();
        let record = contract();

        let next = lc
            .transition(&record, Status::Approved, Some("budget ok".into()), Some(at(2, 9)))
            .unwrap();

        assert_eq!(next.status, Status::Approved);
        assert_eq!(next.status_history[&Status::Approved].timestamp, at(2, 9));
        assert_eq!(
            next.status_history[&Status::Approved].note.as_deref(),
            Some("budget ok")
        );
        assert!(next.resolved_at.is_none());
        // input untouched
        assert_eq!(record.status, Status::New);
        assert_eq!(record.status_history.len(), 1);
    }

    #[test]
    fn test_default_date_comes_from_clock() {
        let next = lifecycle()
            .transition(&contract(), Status::Contracted, None, None)
            .unwrap();
        assert_eq!(next.status_history[&Status::Contracted].timestamp, at(20, 12));
    }

    #[test]
    fn test_regression_is_rejected() {
        let lc = lifecycle();
        let record = lc
            .transition(&contract(), Status::Contracted, None, None)
            .unwrap();

        let err = lc.transition(&record, Status::Approved, None, None).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                kind: RecordKind::Contract,
                from: Status::Contracted,
                to: Status::Approved,
            }
        );
    }

    #[test]
    fn test_foreign_status_is_rejected() {
        let err = lifecycle()
            .transition(&contract(), Status::Closed, None, None)
            .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }

    #[test]
    fn test_unknown_current_status() {
        let mut record = contract();
        record.status = Status::Open;
        let err = lifecycle()
            .transition(&record, Status::Delivered, None, None)
            .unwrap_err();
        assert!(matches!(err, LifecycleError::UnknownStatus { .. }));
    }

    #[test]
    fn test_terminal_stamps_resolved_at_once() {
        let lc = lifecycle();
        let delivered = lc
            .transition(&contract(), Status::Delivered, None, Some(at(5, 10)))
            .unwrap();
        assert_eq!(delivered.resolved_at, Some(at(5, 10)));

        let again = lc
            .transition(&delivered, Status::Delivered, None, Some(at(9, 10)))
            .unwrap();
        assert_eq!(again.resolved_at, Some(at(5, 10)));
    }

    #[test]
    fn test_revisit_policies() {
        let record = contract();
        let preserve = lifecycle();
        let first = preserve
            .transition(&record, Status::Approved, Some("first".into()), Some(at(2, 8)))
            .unwrap();
        let second = preserve
            .transition(&first, Status::Approved, Some("second".into()), Some(at(3, 8)))
            .unwrap();
        assert_eq!(second.status_history[&Status::Approved].note.as_deref(), Some("first"));
        assert_eq!(second.status_history[&Status::Approved].timestamp, at(2, 8));

        let overwrite = lifecycle().with_revisit_policy(RevisitPolicy::Overwrite);
        let second = overwrite
            .transition(&first, Status::Approved, Some("second".into()), Some(at(3, 8)))
            .unwrap();
        assert_eq!(second.status_history[&Status::Approved].note.as_deref(), Some("second"));
        assert_eq!(second.status_history[&Status::Approved].timestamp, at(3, 8));
        assert_eq!(second.status_history.len(), first.status_history.len());
    }

    #[test]
    fn test_terminal_is_final_policy() {
        let strict = lifecycle();
        let rejected = strict
            .transition(&contract(), Status::Rejected, None, Some(at(4, 8)))
            .unwrap();
        assert_eq!(rejected.resolved_at, Some(at(4, 8)));
        assert!(strict.transition(&rejected, Status::Approved, None, None).is_err());
        assert!(strict.transition(&rejected, Status::Rejected, None, None).is_ok());

        let lenient = lifecycle().with_terminal_is_final(false);
        let reopened = lenient
            .transition(&rejected, Status::Approved, None, Some(at(6, 8)))
            .unwrap();
        assert_eq!(reopened.status, Status::Approved);
        assert!(reopened.resolved_at.is_none());
        assert!(reopened.status_history.contains_key(&Status::Rejected));
    }
}
