//! In-process marker store

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use super::MarkerStore;
use crate::error::{Error, Result};
use crate::types::{MarkerId, MarkerRecord, Position};

/// Marker store that keeps records in a concurrent map
///
/// Clones share the same records. Ids are assigned from 1 upwards, like a
/// fresh collection would. `set_offline(true)` makes every call fail, which
/// stands in for an unreachable backend.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    records: Arc<DashMap<MarkerId, MarkerRecord>>,
    next_id: Arc<AtomicU64>,
    offline: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a store pre-filled with `records`
    pub fn with_records(records: impl IntoIterator<Item = MarkerRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.next_id.fetch_max(record.id + 1, Ordering::SeqCst);
            store.records.insert(record.id, record);
        }
        store
    }

    /// Toggles simulated backend failure
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Returns a record by id
    pub fn get(&self, id: MarkerId) -> Option<MarkerRecord> {
        self.records.get(&id).map(|entry| entry.value().clone())
    }

    /// Returns the current number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "marker store is offline",
            )))
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerStore for MemoryStore {
    async fn fetch_markers(&self) -> Result<Vec<MarkerRecord>> {
        self.ensure_online()?;
        let mut markers: Vec<MarkerRecord> =
            self.records.iter().map(|entry| entry.value().clone()).collect();
        markers.sort_by_key(|marker| marker.id);
        Ok(markers)
    }

    async fn create_marker(&self, position: Position, label: &str) -> Result<MarkerRecord> {
        self.ensure_online()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = MarkerRecord::new(id, position, vec![label.to_string()]);
        self.records.insert(id, record.clone());
        Ok(record)
    }

    async fn update_marker(&self, id: MarkerId, diseases: &[String]) -> Result<()> {
        self.ensure_online()?;
        match self.records.get_mut(&id) {
            Some(mut entry) => {
                entry.diseases = diseases.to_vec();
                Ok(())
            }
            None => Err(Error::Status {
                status: 404,
                url: format!("memory://user-locs/{}", id),
            }),
        }
    }
}
