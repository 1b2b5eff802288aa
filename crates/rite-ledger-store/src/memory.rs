//! In-memory implementation of the Store trait.
//!
//! Primarily for tests. Same semantics as the file store but nothing is
//! persisted.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::RwLock;

use async_trait::async_trait;

use rite_ledger_core::{DispatchId, DispatchRecord, HonorEntry, HonorId};

use crate::error::Result;
use crate::traits::{Cursor, InsertOutcome, ListFilter, Page, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock;
/// the write lock is the append serialization point.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Dispatch records indexed by id.
    dispatches: HashMap<String, DispatchRecord>,

    /// Insertion-order index: (timestamp, dispatch_id).
    order: BTreeMap<(i64, String), ()>,

    /// Honor entries indexed by id.
    honors: HashMap<String, HonorEntry>,

    /// Persisted replay traces, keyed by dispatch id.
    traces: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_filter(record: &DispatchRecord, filter: &ListFilter) -> bool {
    if let Some(realm) = &filter.realm {
        if &record.realm_id != realm {
            return false;
        }
    }
    if let Some(capsule) = &filter.capsule {
        if &record.capsule != capsule {
            return false;
        }
    }
    if let Some(since) = filter.since {
        if record.timestamp < since {
            return false;
        }
    }
    true
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_dispatch(&self, record: &DispatchRecord) -> Result<InsertOutcome> {
        let mut inner = self.inner.write().unwrap();

        let key = record.dispatch_id.as_str().to_string();
        if inner.dispatches.contains_key(&key) {
            return Ok(InsertOutcome::IdExists);
        }

        inner.order.insert((record.timestamp, key.clone()), ());
        inner.dispatches.insert(key, record.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn get_dispatch(&self, id: &DispatchId) -> Result<Option<DispatchRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.dispatches.get(id.as_str()).cloned())
    }

    async fn has_dispatch(&self, id: &DispatchId) -> Result<bool> {
        let inner = self.inner.read().unwrap();
        Ok(inner.dispatches.contains_key(id.as_str()))
    }

    async fn list_dispatches(
        &self,
        filter: &ListFilter,
        cursor: Option<&Cursor>,
        limit: usize,
    ) -> Result<Page> {
        let inner = self.inner.read().unwrap();

        let start = match cursor {
            Some(c) => Bound::Excluded((c.timestamp, c.dispatch_id.as_str().to_string())),
            None => Bound::Unbounded,
        };

        let mut records = Vec::new();
        for ((_, id), _) in inner.order.range((start, Bound::Unbounded)) {
            if records.len() == limit {
                break;
            }
            if let Some(record) = inner.dispatches.get(id) {
                if matches_filter(record, filter) {
                    records.push(record.clone());
                }
            }
        }

        let next = if records.len() == limit {
            records.last().map(|r| Cursor {
                timestamp: r.timestamp,
                dispatch_id: r.dispatch_id.clone(),
            })
        } else {
            None
        };

        Ok(Page { records, next })
    }

    async fn dispatch_count(&self) -> Result<usize> {
        let inner = self.inner.read().unwrap();
        Ok(inner.dispatches.len())
    }

    async fn insert_honor(&self, entry: &HonorEntry) -> Result<InsertOutcome> {
        let mut inner = self.inner.write().unwrap();

        let key = entry.honor_id.as_str().to_string();
        if inner.honors.contains_key(&key) {
            return Ok(InsertOutcome::IdExists);
        }
        inner.honors.insert(key, entry.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn get_honor(&self, id: &HonorId) -> Result<Option<HonorEntry>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.honors.get(id.as_str()).cloned())
    }

    async fn has_honor(&self, id: &HonorId) -> Result<bool> {
        let inner = self.inner.read().unwrap();
        Ok(inner.honors.contains_key(id.as_str()))
    }

    async fn get_trace(&self, id: &DispatchId) -> Result<Option<Vec<u8>>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.traces.get(id.as_str()).cloned())
    }

    async fn put_trace_if_absent(&self, id: &DispatchId, bytes: &[u8]) -> Result<Vec<u8>> {
        let mut inner = self.inner.write().unwrap();
        if let Some(existing) = inner.traces.get(id.as_str()) {
            return Ok(existing.clone());
        }
        inner.traces.insert(id.as_str().to_string(), bytes.to_vec());
        Ok(bytes.to_vec())
    }
}
