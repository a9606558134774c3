//! JSON file report store.
//!
//! The file holds a single JSON array of records. Malformed fields are
//! read as missing; only entries without a usable id are skipped, with a
//! warning, so that one corrupt entry does not hide the rest.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use safe_steps_incident_models::IncidentRecord;
use tokio::sync::Mutex;

use crate::{ReportStore, StoreError};

/// Report store backed by a JSON file on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<IncidentRecord>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Report file {} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        parse_records(&bytes)
    }
}

fn parse_records(bytes: &[u8]) -> Result<Vec<IncidentRecord>, StoreError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;

    let serde_json::Value::Array(entries) = value else {
        return Err(StoreError::QueryFailed {
            message: "report file must contain a JSON array".to_string(),
        });
    };

    let total = entries.len();
    let records: Vec<IncidentRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping unreadable report entry {index}: {e}");
                None
            }
        })
        .collect();

    if records.len() < total {
        log::warn!("Read {} of {total} report entries", records.len());
    }

    Ok(records)
}

#[async_trait]
impl ReportStore for JsonFileStore {
    async fn query_reports(&self) -> Result<Vec<IncidentRecord>, StoreError> {
        self.read_all().await
    }

    async fn append(&self, record: IncidentRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_all().await?;
        log::debug!("Appending report {} to {}", record.id, self.path.display());
        records.push(record);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(&records)?;
        tokio::fs::write(&self.path, json).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safe_steps_incident_models::{IncidentReport, Severity};

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("safe_steps_store_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn missing_file_is_an_empty_store() {
        let dir = scratch("missing");
        let store = JsonFileStore::new(dir.join("reports.json"));

        assert!(store.query_reports().await.unwrap().is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn skips_unreadable_entries() {
        let dir = scratch("skips");
        let path = dir.join("reports.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "ok", "type": "Harassment", "severity": "high"},
                {"type": "no id"},
                {"id": "also-ok"}
            ]"#,
        )
        .unwrap();

        let records = JsonFileStore::new(&path).query_reports().await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "also-ok"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn malformed_fields_keep_the_record() {
        let dir = scratch("malformed_fields");
        let path = dir.join("reports.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "bad-severity", "severity": 3},
                {"id": "bad-timestamp", "timestamp": "yesterday"},
                {"id": "string-lat", "location": {"latitude": "28.6", "longitude": 77.2}},
                {"id": "bad-verified", "verified": "yes"}
            ]"#,
        )
        .unwrap();

        let records = JsonFileStore::new(&path).query_reports().await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["bad-severity", "bad-timestamp", "string-lat", "bad-verified"]
        );

        let now = chrono::Utc::now();
        let reports: Vec<IncidentReport> = records
            .into_iter()
            .map(|record| IncidentReport::from_record(record, now))
            .collect();
        assert_eq!(reports[0].severity, Severity::Low);
        assert_eq!(reports[1].timestamp, now);
        assert!(reports[2].location.is_none());
        assert!(!reports[3].verified);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn non_array_is_a_query_failure() {
        let dir = scratch("non_array");
        let path = dir.join("reports.json");
        std::fs::write(&path, r#"{"reports": []}"#).unwrap();

        let result = JsonFileStore::new(&path).query_reports().await;
        assert!(matches!(result, Err(StoreError::QueryFailed { .. })));

        std::fs::write(&path, "not json").unwrap();
        let result = JsonFileStore::new(&path).query_reports().await;
        assert!(matches!(result, Err(StoreError::Json(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn append_creates_and_extends_the_file() {
        let dir = scratch("append");
        let path = dir.join("nested").join("reports.json");
        let store = JsonFileStore::new(&path);

        for id in ["first", "second"] {
            store
                .append(IncidentRecord {
                    id: id.to_string(),
                    incident_type: Some("Stalking".to_string()),
                    ..IncidentRecord::default()
                })
                .await
                .unwrap();
        }

        let records = store.query_reports().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, "second");
        assert_eq!(records[1].incident_type.as_deref(), Some("Stalking"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
