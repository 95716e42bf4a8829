//! Status lifecycle, filtering and aggregation core for the contract,
//! maintenance report and order dashboards.
//!
//! Records move through a fixed chain of statuses per kind
//! ([`lifecycle`]), are narrowed by operator filters ([`filter`]) and
//! summarised into counts, sums, distributions and trends ([`analytics`]).
//! Downtime of open or resolved records comes from [`downtime`].
//!
//! Everything here is synchronous and pure over in-memory collections; the
//! caller owns the record set and active filters (see [`session::Session`]).

pub mod analytics;
pub mod clock;
pub mod config;
pub mod dates;
pub mod downtime;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod models;
pub mod session;

pub use error::{AppError, Result};
