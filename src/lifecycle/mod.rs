//! Status lifecycle for contracts, maintenance reports and orders
//!
//! Each record kind follows an ordered chain of forward statuses plus one
//! absorbing failure status. One generic routine validates transitions for
//! every kind:
//!
//! - from chain position `i`, any of `chain[i..]` is allowed (stay or advance)
//! - the failure status is allowed from every non-terminal position
//! - anything else is an [`LifecycleError::InvalidTransition`]
//!
//! Transitions never mutate their input; they return the updated record,
//! which the caller swaps back into its collection.
//!
//! # Example
//!
//! ```
//! use service_records::lifecycle::{LifecycleTable, StatusLifecycle};
//! use service_records::models::{RecordKind, ServiceRecord, Status};
//! use chrono::Local;
//!
//! let lifecycle = StatusLifecycle::new(LifecycleTable::default());
//! let record = ServiceRecord::new(RecordKind::Contract, lifecycle.table(), Local::now().naive_local());
//!
//! let approved = lifecycle.transition(&record, Status::Approved, None, None).unwrap();
//! assert_eq!(approved.status, Status::Approved);
//! assert!(lifecycle.transition(&approved, Status::New, None, None).is_err());
//! ```

mod chain;
mod error;
mod transition;

pub use chain::{Chain, LifecycleTable};
pub use error::{LifecycleError, LifecycleResult};
pub use transition::{RevisitPolicy, StatusLifecycle};
