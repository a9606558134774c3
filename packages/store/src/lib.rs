#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident report store.
//!
//! The [`ReportStore`] trait is the seam between the aggregation core and
//! wherever reports actually live. Two implementations are provided: an
//! in-memory store for tests and embedding, and a JSON file store for the
//! server and CLI.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use safe_steps_incident_models::{IncidentRecord, IncidentReport};

/// Errors that can occur while reading or writing reports.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store answered, but not with a report list.
    #[error("Report query failed: {message}")]
    QueryFailed {
        /// Description of what went wrong.
        message: String,
    },
}

/// A source of raw incident records.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Returns every stored record, in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    async fn query_reports(&self) -> Result<Vec<IncidentRecord>, StoreError>;

    /// Appends a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record cannot be persisted.
    async fn append(&self, record: IncidentRecord) -> Result<(), StoreError>;
}

/// Queries `store` and normalizes every record into an [`IncidentReport`].
///
/// Individual malformed records are defaulted rather than rejected, so this
/// only fails when the query itself fails.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails.
pub async fn load_reports(
    store: &dyn ReportStore,
    now: DateTime<Utc>,
) -> Result<Vec<IncidentReport>, StoreError> {
    let records = store.query_reports().await.inspect_err(|e| {
        log::error!("Report query failed: {e}");
    })?;

    let reports: Vec<IncidentReport> = records
        .into_iter()
        .map(|record| IncidentReport::from_record(record, now))
        .collect();

    let unlocated = reports.iter().filter(|r| r.location.is_none()).count();
    log::info!(
        "Loaded {} reports ({unlocated} without a usable location)",
        reports.len()
    );

    Ok(reports)
}
