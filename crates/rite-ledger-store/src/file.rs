//! File-backed implementation of the Store trait.
//!
//! One JSON document per record, laid out as:
//!
//! ```text
//! <root>/dispatches/<dispatch_id>.json
//! <root>/honors/<honor_id>.json
//! <root>/traces/<dispatch_id>.json
//! ```
//!
//! Writes go through a temp file in the same directory followed by a
//! rename, so readers never observe a partially written record. A mutex
//! over the in-memory id index is the single append serialization point;
//! reads go straight to the files without taking it.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use rite_ledger_core::{DispatchId, DispatchRecord, HonorEntry, HonorId};

use crate::error::{Result, StoreError};
use crate::traits::{Cursor, InsertOutcome, ListFilter, Page, Store};

const DISPATCH_DIR: &str = "dispatches";
const HONOR_DIR: &str = "honors";
const TRACE_DIR: &str = "traces";

/// Durable file-backed store.
pub struct FileStore {
    root: PathBuf,
    inner: Mutex<FileIndex>,
}

/// Id index rebuilt from the directory on open.
#[derive(Default)]
struct FileIndex {
    /// dispatch_id -> timestamp, for existence checks.
    dispatches: HashMap<String, i64>,

    /// Insertion-order index: (timestamp, dispatch_id).
    order: BTreeMap<(i64, String), ()>,

    honor_ids: HashSet<String>,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the layout if needed and
    /// rebuilding the id index from the records already on disk.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        for dir in [DISPATCH_DIR, HONOR_DIR, TRACE_DIR] {
            fs::create_dir_all(root.join(dir))?;
        }

        let mut index = FileIndex::default();

        for entry in fs::read_dir(root.join(DISPATCH_DIR))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let record: DispatchRecord = read_json(&path)?;
            let id = record.dispatch_id.as_str().to_string();
            index.order.insert((record.timestamp, id.clone()), ());
            index.dispatches.insert(id, record.timestamp);
        }

        for entry in fs::read_dir(root.join(HONOR_DIR))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let honor: HonorEntry = read_json(&path)?;
            index.honor_ids.insert(honor.honor_id.as_str().to_string());
        }

        debug!(
            root = %root.display(),
            dispatches = index.dispatches.len(),
            honors = index.honor_ids.len(),
            "opened file store"
        );

        Ok(Self {
            root,
            inner: Mutex::new(index),
        })
    }

    /// Directory holding the dispatch record files. This is what the
    /// backup subsystem snapshots.
    pub fn dispatch_dir(&self) -> PathBuf {
        self.root.join(DISPATCH_DIR)
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dispatch_path(&self, id: &DispatchId) -> PathBuf {
        self.root.join(DISPATCH_DIR).join(format!("{}.json", id.as_str()))
    }

    fn honor_path(&self, id: &HonorId) -> PathBuf {
        self.root.join(HONOR_DIR).join(format!("{}.json", id.as_str()))
    }

    fn trace_path(&self, id: &DispatchId) -> PathBuf {
        self.root.join(TRACE_DIR).join(format!("{}.json", id.as_str()))
    }
}

/// Read and deserialize a JSON document.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        StoreError::InvalidData(format!("{}: {}", path.display(), e))
    })
}

/// Write bytes durably and atomically: temp file in the same directory,
/// fsync, rename over the final path, then fsync the directory so the
/// rename itself survives a crash.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    if let Some(parent) = path.parent() {
        fs::File::open(parent)?.sync_all()?;
    }
    Ok(())
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
impl Store for FileStore {
    async fn insert_dispatch(&self, record: &DispatchRecord) -> Result<InsertOutcome> {
        let bytes = serde_json::to_vec_pretty(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut inner = self.inner.lock().unwrap();

        let id = record.dispatch_id.as_str().to_string();
        if inner.dispatches.contains_key(&id) {
            return Ok(InsertOutcome::IdExists);
        }

        // Durable before visible: the index entry (and thus the ack) only
        // lands after the rename has completed.
        write_atomic(&self.dispatch_path(&record.dispatch_id), &bytes)?;

        inner.order.insert((record.timestamp, id.clone()), ());
        inner.dispatches.insert(id, record.timestamp);

        debug!(dispatch_id = %record.dispatch_id, "dispatch persisted");
        Ok(InsertOutcome::Inserted)
    }

    async fn get_dispatch(&self, id: &DispatchId) -> Result<Option<DispatchRecord>> {
        let path = self.dispatch_path(id);
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    async fn has_dispatch(&self, id: &DispatchId) -> Result<bool> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.dispatches.contains_key(id.as_str()))
    }

    async fn list_dispatches(
        &self,
        filter: &ListFilter,
        cursor: Option<&Cursor>,
        limit: usize,
    ) -> Result<Page> {
        // Snapshot the key range, then read files without the lock.
        let keys: Vec<(i64, String)> = {
            let inner = self.inner.lock().unwrap();
            let start = match cursor {
                Some(c) => Bound::Excluded((c.timestamp, c.dispatch_id.as_str().to_string())),
                None => Bound::Unbounded,
            };
            inner
                .order
                .range((start, Bound::Unbounded))
                .map(|(k, _)| k.clone())
                .collect()
        };

        let mut records = Vec::new();
        for (_, id) in keys {
            if records.len() == limit {
                break;
            }
            let id = DispatchId::parse(&id)
                .map_err(|e| StoreError::InvalidData(e.to_string()))?;
            let path = self.dispatch_path(&id);
            if !path.exists() {
                continue;
            }
            let record: DispatchRecord = read_json(&path)?;
            if matches_filter(&record, filter) {
                records.push(record);
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
        let inner = self.inner.lock().unwrap();
        Ok(inner.dispatches.len())
    }

    async fn insert_honor(&self, entry: &HonorEntry) -> Result<InsertOutcome> {
        let bytes = serde_json::to_vec_pretty(entry)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut inner = self.inner.lock().unwrap();

        let id = entry.honor_id.as_str().to_string();
        if inner.honor_ids.contains(&id) {
            return Ok(InsertOutcome::IdExists);
        }

        write_atomic(&self.honor_path(&entry.honor_id), &bytes)?;
        inner.honor_ids.insert(id);

        debug!(honor_id = %entry.honor_id, "honor persisted");
        Ok(InsertOutcome::Inserted)
    }

    async fn get_honor(&self, id: &HonorId) -> Result<Option<HonorEntry>> {
        let path = self.honor_path(id);
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    async fn has_honor(&self, id: &HonorId) -> Result<bool> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.honor_ids.contains(id.as_str()))
    }

    async fn get_trace(&self, id: &DispatchId) -> Result<Option<Vec<u8>>> {
        let path = self.trace_path(id);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read(&path)?))
    }

    async fn put_trace_if_absent(&self, id: &DispatchId, bytes: &[u8]) -> Result<Vec<u8>> {
        let _guard = self.inner.lock().unwrap();

        let path = self.trace_path(id);
        if path.exists() {
            return Ok(fs::read(&path)?);
        }
        write_atomic(&path, bytes)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rite_ledger_core::{DispatchDraft, RealmId, Seal};

    fn make_record(suffix: &str, timestamp: i64) -> DispatchRecord {
        let id = DispatchId::parse(&format!("DSP-2026-08-26-{suffix}")).unwrap();
        DispatchDraft::new(
            "Custodian",
            RealmId::parse("PL-001").unwrap(),
            "Sovereign Crown",
            "Crown.Invocation",
            Seal::Eternal,
        )
        .input(b"offering".to_vec())
        .seal_record(id, timestamp)
    }

    #[tokio::test]
    async fn test_insert_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let record = make_record("00000001", 100);

        assert_eq!(
            store.insert_dispatch(&record).await.unwrap(),
            InsertOutcome::Inserted
        );
        let got = store.get_dispatch(&record.dispatch_id).await.unwrap().unwrap();
        assert_eq!(got, record);
        assert!(got.hash_intact());
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.insert_dispatch(&make_record("00000001", 100)).await.unwrap();

        let leftovers: Vec<_> = fs::read_dir(store.dispatch_dir())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_reopen_rebuilds_id_index() {
        let dir = tempfile::tempdir().unwrap();
        let record = make_record("00000001", 100);

        {
            let store = FileStore::open(dir.path()).unwrap();
            store.insert_dispatch(&record).await.unwrap();
        }

        // A fresh handle must still refuse the same id.
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.has_dispatch(&record.dispatch_id).await.unwrap());
        assert_eq!(
            store.insert_dispatch(&record).await.unwrap(),
            InsertOutcome::IdExists
        );
        assert_eq!(store.dispatch_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_order_and_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        for i in 0..4 {
            store
                .insert_dispatch(&make_record(&format!("0000000{i}"), 100 + i as i64))
                .await
                .unwrap();
        }

        let filter = ListFilter::default();
        let first = store.list_dispatches(&filter, None, 3).await.unwrap();
        assert_eq!(first.records.len(), 3);
        let timestamps: Vec<_> = first.records.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![100, 101, 102]);

        let rest = store
            .list_dispatches(&filter, first.next.as_ref(), 10)
            .await
            .unwrap();
        assert_eq!(rest.records.len(), 1);
        assert_eq!(rest.records[0].timestamp, 103);
    }

    #[tokio::test]
    async fn test_honor_roundtrip() {
        use rite_ledger_core::{AuthorityLevel, HonorDraft};

        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let honor = HonorDraft::new(
            "Herald",
            "Kept the vigil",
            "Silver Branch",
            AuthorityLevel::Warden,
            RealmId::parse("PL-001").unwrap(),
            Seal::Sacred,
        )
        .grant(HonorId::parse("HON-2026-08-26-99AABBCC").unwrap(), 100);

        assert_eq!(
            store.insert_honor(&honor).await.unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            store.insert_honor(&honor).await.unwrap(),
            InsertOutcome::IdExists
        );
        let got = store.get_honor(&honor.honor_id).await.unwrap().unwrap();
        assert_eq!(got, honor);
    }

    #[tokio::test]
    async fn test_trace_survives_reopen_and_stays_first() {
        let dir = tempfile::tempdir().unwrap();
        let id = DispatchId::parse("DSP-2026-08-26-00000001").unwrap();

        {
            let store = FileStore::open(dir.path()).unwrap();
            store.put_trace_if_absent(&id, b"trace-a").await.unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        let kept = store.put_trace_if_absent(&id, b"trace-b").await.unwrap();
        assert_eq!(kept, b"trace-a");
    }
}
