//! Elapsed time between an opening event and its resolution
//!
//! Unresolved records are measured against the clock, so their downtime grows
//! on every read. Unparseable opening dates never fail the caller; they yield
//! a zero duration flagged as invalid.

use crate::clock::{Clock, SystemClock};
use crate::dates;
use crate::models::ServiceRecord;
use chrono::NaiveDateTime;
use serde::Serialize;

const MILLIS_PER_MINUTE: u64 = 60 * 1000;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Computed downtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Downtime {
    /// Human-readable duration in its largest applicable units
    pub formatted: String,

    /// Raw duration in milliseconds
    pub millis: u64,

    /// False when the opening instant could not be parsed
    pub valid: bool,

    /// Whether a resolution instant was used as the end
    pub resolved: bool,
}

impl Downtime {
    fn invalid() -> Self {
        Self {
            formatted: format_duration(0),
            millis: 0,
            valid: false,
            resolved: false,
        }
    }

    /// Whole days in the duration
    pub fn days(&self) -> u64 {
        self.millis / MILLIS_PER_DAY
    }

    /// Hours left after whole days
    pub fn hours(&self) -> u64 {
        (self.millis % MILLIS_PER_DAY) / MILLIS_PER_HOUR
    }

    /// Minutes left after whole hours
    pub fn minutes(&self) -> u64 {
        (self.millis % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE
    }
}

/// Computes downtime against an injectable clock
#[derive(Debug, Clone, Default)]
pub struct DowntimeCalculator<C = SystemClock> {
    clock: C,
}

impl DowntimeCalculator<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> DowntimeCalculator<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Downtime from `open_date` + `open_time` to `resolved_at`, or to now
    /// when `resolved_at` is absent or unparseable
    pub fn downtime(&self, open_date: &str, open_time: &str, resolved_at: Option<&str>) -> Downtime {
        let start = match dates::combine(open_date, open_time) {
            Ok(start) => start,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping downtime with malformed opening instant");
                return Downtime::invalid();
            }
        };

        let end = resolved_at.and_then(|raw| match dates::parse_instant(raw) {
            Ok(end) => Some(end),
            Err(e) => {
                tracing::debug!(error = %e, "Malformed resolution instant, measuring to now");
                None
            }
        });

        self.between(start, end)
    }

    /// Downtime of a record, from its primary date and opening time
    pub fn for_record(&self, record: &ServiceRecord) -> Downtime {
        match dates::combine(&record.primary_date, record.opened_time.as_deref().unwrap_or("")) {
            Ok(start) => self.between(start, record.resolved_at),
            Err(e) => {
                tracing::debug!(record_id = %record.id, error = %e, "Skipping downtime for record");
                Downtime::invalid()
            }
        }
    }

    fn between(&self, start: NaiveDateTime, end: Option<NaiveDateTime>) -> Downtime {
        let resolved = end.is_some();
        let end = end.unwrap_or_else(|| self.clock.now());
        let millis = end
            .signed_duration_since(start)
            .num_milliseconds()
            .unsigned_abs();

        Downtime {
            formatted: format_duration(millis),
            millis,
            valid: true,
            resolved,
        }
    }
}

/// Format a duration using the largest applicable unit: days and hours, hours
/// and minutes, or minutes alone
pub fn format_duration(millis: u64) -> String {
    let days = millis / MILLIS_PER_DAY;
    let hours = (millis % MILLIS_PER_DAY) / MILLIS_PER_HOUR;
    let minutes = (millis % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;

    if days > 0 {
        format!("{}, {}", unit(days, "day"), unit(hours, "hour"))
    } else if hours > 0 {
        format!("{}, {}", unit(hours, "hour"), unit(minutes, "minute"))
    } else {
        unit(minutes, "minute")
    }
}

fn unit(value: u64, name: &str) -> String {
    if value == 1 {
        format!("{} {}", value, name)
    } else {
        format!("{} {}s", value, name)
    }
}
