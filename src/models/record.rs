use crate::dates::{self, MalformedDateError};
use crate::error::{AppError, Result};
use crate::lifecycle::LifecycleTable;
use crate::models::StatusHistory;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;
use validator::Validate;

/// A contract, maintenance report, or purchase/withdrawal order tracked
/// through its kind's lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    /// Unique identifier
    #[validate(length(min = 1, max = 128))]
    pub id: String,

    /// Which lifecycle this record follows
    pub kind: RecordKind,

    /// Current status
    pub status: Status,

    /// Date the record was opened, as received
    #[serde(default)]
    pub primary_date: String,

    /// Time of day the record was opened (reports only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opened_time: Option<String>,

    /// Contract or order value
    #[validate(range(min = 0.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_value: Option<f64>,

    /// Value already received
    #[validate(range(min = 0.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_value: Option<f64>,

    /// Value still outstanding
    #[validate(range(min = 0.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_value: Option<f64>,

    /// Ordered or withdrawn quantity
    #[validate(range(min = 0.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// Item category or device type
    #[serde(default, alias = "deviceType", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[validate(length(max = 500))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Contract, report or order number shown to operators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// First time each status was reached, in lifecycle order
    #[serde(default)]
    pub status_history: StatusHistory,

    /// Set when a terminal status is reached
    #[serde(
        default,
        with = "crate::dates::lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub resolved_at: Option<NaiveDateTime>,
}

impl ServiceRecord {
    /// Create a record in the initial status of its kind's chain
    pub fn new(kind: RecordKind, table: &LifecycleTable, opened_at: NaiveDateTime) -> Self {
        let chain = table.chain(kind);
        let status = chain.initial();
        let mut status_history = StatusHistory::new();
        status_history.insert(status, StatusEntry::new(opened_at, None), chain);

        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            status,
            primary_date: opened_at.date().format("%Y-%m-%d").to_string(),
            opened_time: None,
            total_value: None,
            received_value: None,
            remaining_value: None,
            quantity: None,
            facility: None,
            supplier: None,
            category: None,
            title: None,
            description: None,
            reference: None,
            status_history,
            resolved_at: None,
        }
    }

    /// Primary date, parsed on demand
    pub fn parsed_primary_date(&self) -> std::result::Result<NaiveDate, MalformedDateError> {
        dates::parse_date(&self.primary_date)
    }

    /// Value of a categorical dimension, if present
    pub fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Facility => self.facility.as_deref(),
            Dimension::Supplier => self.supplier.as_deref(),
            Dimension::Category => self.category.as_deref(),
        }
    }

    /// Value of a free-text field, if present
    pub fn text(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::Id => Some(self.id.as_str()),
            TextField::Title => self.title.as_deref(),
            TextField::Description => self.description.as_deref(),
            TextField::Reference => self.reference.as_deref(),
            TextField::Facility => self.facility.as_deref(),
            TextField::Supplier => self.supplier.as_deref(),
            TextField::Category => self.category.as_deref(),
        }
    }
}

/// Record kinds, each with its own lifecycle chain
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordKind {
    Contract,
    Report,
    Order,
}

/// Every status a record can hold. Which ones are valid for a given kind is
/// decided by the lifecycle table, not by this enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    New,
    Approved,
    Contracted,
    Delivered,
    Rejected,
    Open,
    Closed,
    OutOfOrder,
}

/// History stamp for a status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    #[serde(with = "crate::dates::lenient")]
    pub timestamp: NaiveDateTime,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl StatusEntry {
    pub fn new(timestamp: NaiveDateTime, note: Option<String>) -> Self {
        Self { timestamp, note }
    }
}

/// Categorical dimensions records can be grouped by
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dimension {
    Facility,
    Supplier,
    Category,
}

/// Text fields searchable by the free-text predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TextField {
    Id,
    Title,
    Description,
    Reference,
    Facility,
    Supplier,
    Category,
}

/// Deserialize and validate records coming from the data-access layer.
///
/// Field aliases are resolved here so the rest of the crate sees one schema.
/// A record whose status, or any of whose history statuses, does not belong
/// to its kind is rejected. History is put back into lifecycle order.
pub fn load_records(json: &str, table: &LifecycleTable) -> Result<Vec<ServiceRecord>> {
    let mut records: Vec<ServiceRecord> = serde_json::from_str(json)?;

    for record in &mut records {
        record.validate()?;
        let chain = table.chain(record.kind);

        if !chain.contains(record.status) {
            return Err(AppError::Validation(format!(
                "record {}: status {} is not defined for kind {}",
                record.id, record.status, record.kind
            )));
        }

        if record.resolved_at.is_some() && !chain.is_terminal(record.status) {
            return Err(AppError::Validation(format!(
                "record {}: resolvedAt set but status {} is not terminal",
                record.id, record.status
            )));
        }

        if let Some(foreign) = record.status_history.keys().find(|s| !chain.contains(**s)) {
            return Err(AppError::Validation(format!(
                "record {}: history status {} is not defined for kind {}",
                record.id, foreign, record.kind
            )));
        }

        record.status_history.sort_by_chain(chain);
    }

    tracing::debug!(count = records.len(), "Loaded service records");
    Ok(records)
}
