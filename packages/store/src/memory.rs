//! In-memory report store.

use async_trait::async_trait;
use safe_steps_incident_models::IncidentRecord;
use tokio::sync::RwLock;

use crate::{ReportStore, StoreError};

/// Keeps records in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<IncidentRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(records: Vec<IncidentRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn query_reports(&self) -> Result<Vec<IncidentRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn append(&self, record: IncidentRecord) -> Result<(), StoreError> {
        self.records.write().await.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_then_query() {
        let store = MemoryStore::default();
        assert!(store.query_reports().await.unwrap().is_empty());

        for id in ["a", "b"] {
            store
                .append(IncidentRecord {
                    id: id.to_string(),
                    ..IncidentRecord::default()
                })
                .await
                .unwrap();
        }

        let ids: Vec<String> = store
            .query_reports()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
