//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use service_records::lifecycle::LifecycleTable;
use service_records::models::{load_records, RecordKind, ServiceRecord, Status};

/// Build an instant from calendar parts
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Contract in `status` with the given total value
pub fn contract(id: &str, status: Status, total_value: f64) -> ServiceRecord {
    let mut record = ServiceRecord::new(
        RecordKind::Contract,
        &LifecycleTable::default(),
        at(2024, 1, 10, 9, 0),
    );
    record.id = id.to_string();
    record.status = status;
    record.total_value = Some(total_value);
    record
}

/// Maintenance report opened at `date` for `facility`
pub fn report(id: &str, facility: &str, date: &str) -> ServiceRecord {
    let mut record = ServiceRecord::new(
        RecordKind::Report,
        &LifecycleTable::default(),
        at(2024, 1, 1, 0, 0),
    );
    record.id = id.to_string();
    record.facility = Some(facility.to_string());
    record.primary_date = date.to_string();
    record
}

/// The mixed contract fixture set
pub fn sample_contracts() -> Vec<ServiceRecord> {
    load_records(
        include_str!("../fixtures/contracts.json"),
        &LifecycleTable::default(),
    )
    .expect("fixture should load")
}
