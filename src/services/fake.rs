//! In-memory source for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::CreatureRecord;
use crate::services::CreatureSource;

/// Serves records from memory and remembers which identifiers were requested.
#[derive(Default)]
pub struct FakeSource {
    records: HashMap<u32, CreatureRecord>,
    bulk: Option<Vec<CreatureRecord>>,
    calls: Mutex<Vec<u32>>,
}

impl FakeSource {
    /// Source that knows identifiers `ids`, named `Mon{id}`.
    pub fn with_ids(ids: impl IntoIterator<Item = u32>) -> Self {
        let records = ids
            .into_iter()
            .map(|id| (id, CreatureRecord::new(id, format!("Mon{id}"))))
            .collect();
        Self {
            records,
            ..Self::default()
        }
    }

    /// Source whose bulk endpoint returns `records`.
    pub fn with_bulk(records: Vec<CreatureRecord>) -> Self {
        Self {
            bulk: Some(records),
            ..Self::default()
        }
    }

    pub fn insert(&mut self, record: CreatureRecord) {
        if let Some(id) = record.id {
            self.records.insert(id, record);
        }
    }

    /// Identifiers requested so far, in request order.
    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CreatureSource for FakeSource {
    async fn fetch_by_id(&self, id: u32) -> Result<CreatureRecord> {
        self.calls.lock().unwrap().push(id);
        // Give other futures on the same task a chance to run.
        tokio::task::yield_now().await;
        self.records
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::Status {
                status: 404,
                url: format!("fake://digimon/{id}"),
            })
    }

    async fn fetch_all(&self) -> Result<Vec<CreatureRecord>> {
        tokio::task::yield_now().await;
        self.bulk
            .clone()
            .ok_or_else(|| AppError::fetch("bulk", "service unavailable"))
    }

    async fn search(&self, name: &str) -> Result<Vec<CreatureRecord>> {
        let needle = name.to_lowercase();
        let mut found: Vec<_> = self
            .records
            .values()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .map(|r| CreatureRecord {
                levels: Vec::new(),
                ..r.clone()
            })
            .collect();
        found.sort_by_key(|r| r.id);
        Ok(found)
    }
}
