//! Newest-first, capacity-bounded history of generated prompts.
//!
//! Every mutation is applied to the in-memory list first and then written
//! through to the storage slot. Storage failures are logged and swallowed:
//! callers never see a [`PersistenceError`], and after a failed write the
//! in-memory list stays authoritative until the process exits.

use std::sync::Arc;

use promptcraft_core::record::{HistoryRecord, MAX_HISTORY_ITEMS};
use promptcraft_core::types::RecordId;

use crate::storage::{KeyValueStorage, PersistenceError};

/// Slot name the history is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "promptcraft.history";

pub struct HistoryStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    capacity: usize,
    records: Vec<HistoryRecord>,
    /// Set when the last write failed; the durable copy is behind memory.
    stale: bool,
}

impl HistoryStore {
    /// Open the store under the default key and capacity and load it.
    pub fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_options(storage, DEFAULT_STORAGE_KEY, MAX_HISTORY_ITEMS)
    }

    /// Open the store with an explicit slot key and capacity and load it.
    pub fn with_options(
        storage: Arc<dyn KeyValueStorage>,
        key: impl Into<String>,
        capacity: usize,
    ) -> Self {
        let mut store = Self {
            storage,
            key: key.into(),
            capacity,
            records: Vec::new(),
            stale: false,
        };
        store.load();
        store
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current records, newest first.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Re-read the persisted list.
    ///
    /// Any read or decode failure yields an empty list. If a write failed
    /// earlier in this process the durable copy is known to be behind, so
    /// the in-memory list is returned unchanged instead.
    pub fn load(&mut self) -> &[HistoryRecord] {
        if self.stale {
            tracing::debug!(key = %self.key, "Durable history is stale, keeping in-memory copy");
            return &self.records;
        }

        self.records = match self.read_persisted() {
            Ok(mut records) => {
                records.truncate(self.capacity);
                records
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to load history, starting empty");
                Vec::new()
            }
        };
        &self.records
    }

    /// Insert `record` at the front, evicting the oldest beyond capacity.
    pub fn append(&mut self, record: HistoryRecord) -> &[HistoryRecord] {
        self.records.insert(0, record);
        if self.records.len() > self.capacity {
            let evicted = self.records.split_off(self.capacity);
            for old in &evicted {
                tracing::debug!(record_id = %old.id, "Evicted oldest history record");
            }
        }
        self.persist();
        &self.records
    }

    /// Remove the record with `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: RecordId) -> &[HistoryRecord] {
        self.records.retain(|r| r.id != id);
        self.persist();
        &self.records
    }

    pub fn clear(&mut self) -> &[HistoryRecord] {
        self.records.clear();
        self.persist();
        &self.records
    }

    // ---- private helpers ----

    fn read_persisted(&self) -> Result<Vec<HistoryRecord>, PersistenceError> {
        match self.storage.load(&self.key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(PersistenceError::Decode),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.records)
            .map_err(PersistenceError::Encode)
            .and_then(|json| self.storage.save(&self.key, &json));

        match result {
            Ok(()) => self.stale = false,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to persist history");
                self.stale = true;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use assert_matches::assert_matches;

    use super::*;
    use crate::storage::MemoryStorage;
    use promptcraft_core::params::PromptParams;
    use promptcraft_core::platform::Platform;

    fn record(subject: &str) -> HistoryRecord {
        HistoryRecord::new(
            PromptParams::new(Platform::StableDiffusion).with_input("subject", subject),
            format!("{subject}, highly detailed"),
        )
    }

    fn ids(records: &[HistoryRecord]) -> Vec<RecordId> {
        records.iter().map(|r| r.id).collect()
    }

    /// Storage whose reads and writes can be switched to fail.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
    }

    impl KeyValueStorage for FlakyStorage {
        fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(PersistenceError::Read {
                    key: key.into(),
                    reason: "disk on fire".into(),
                });
            }
            self.inner.load(key)
        }

        fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PersistenceError::Write {
                    key: key.into(),
                    reason: "quota exceeded".into(),
                });
            }
            self.inner.save(key, value)
        }
    }

    // -- Capacity and ordering --

    #[test]
    fn capacity_two_evicts_oldest() {
        let mut store = HistoryStore::with_options(Arc::new(MemoryStorage::new()), "h", 2);
        let (a, b, c) = (record("a"), record("b"), record("c"));

        store.append(a);
        store.append(b.clone());
        let result = store.append(c.clone());

        assert_eq!(ids(result), vec![c.id, b.id]);
    }

    #[test]
    fn length_never_exceeds_capacity_and_order_is_newest_first() {
        let mut store = HistoryStore::open(Arc::new(MemoryStorage::new()));
        let mut appended = Vec::new();

        for i in 0..(MAX_HISTORY_ITEMS * 3) {
            let r = record(&format!("subject {i}"));
            appended.push(r.id);
            let len = store.append(r).len();
            assert!(len <= MAX_HISTORY_ITEMS);
        }

        let expected: Vec<_> = appended.iter().rev().take(MAX_HISTORY_ITEMS).copied().collect();
        assert_eq!(ids(store.records()), expected);
    }

    #[test]
    fn overflow_drops_exactly_the_oldest() {
        let mut store = HistoryStore::with_options(Arc::new(MemoryStorage::new()), "h", 3);
        for s in ["a", "b", "c"] {
            store.append(record(s));
        }
        let before = ids(store.records());

        let newest = record("d");
        store.append(newest.clone());

        let mut expected = vec![newest.id];
        expected.extend_from_slice(&before[..2]);
        assert_eq!(ids(store.records()), expected);
    }

    // -- Remove / clear --

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut store = HistoryStore::open(Arc::new(MemoryStorage::new()));
        store.append(record("a"));
        store.append(record("b"));
        let before = store.records().to_vec();

        let after = store.remove(RecordId::now_v7());

        assert_eq!(after, before.as_slice());
    }

    #[test]
    fn remove_drops_only_matching_record() {
        let mut store = HistoryStore::open(Arc::new(MemoryStorage::new()));
        let (a, b, c) = (record("a"), record("b"), record("c"));
        store.append(a.clone());
        store.append(b.clone());
        store.append(c.clone());

        store.remove(b.id);

        assert_eq!(ids(store.records()), vec![c.id, a.id]);
        assert!(store.get(b.id).is_none());
        assert_eq!(store.get(a.id), Some(&a));
    }

    #[test]
    fn clear_then_load_is_empty() {
        let mut store = HistoryStore::open(Arc::new(MemoryStorage::new()));
        store.append(record("a"));

        assert!(store.clear().is_empty());
        assert!(store.load().is_empty());
    }

    // -- Persistence --

    #[test]
    fn reopen_reconstructs_equal_sequence() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let mut store = HistoryStore::open(Arc::clone(&storage));
        store.append(record("a"));
        store.append(record("b"));
        let saved = store.records().to_vec();

        let reopened = HistoryStore::open(storage);

        assert_eq!(reopened.records(), saved.as_slice());
    }

    #[test]
    fn persisted_format_is_record_array() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = HistoryStore::open(storage.clone());
        store.append(record("a"));

        let raw = storage.load(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &json.as_array().unwrap()[0];
        for field in ["id", "timestamp", "params", "generatedText"] {
            assert!(first.get(field).is_some(), "missing field {field}");
        }
    }

    #[test]
    fn corrupt_slot_loads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.save(DEFAULT_STORAGE_KEY, "{not json").unwrap();

        let store = HistoryStore::open(storage);

        assert!(store.records().is_empty());
    }

    #[test]
    fn corrupt_slot_reports_decode_error() {
        let storage = Arc::new(MemoryStorage::new());
        let store = HistoryStore::open(storage.clone());
        storage.save(DEFAULT_STORAGE_KEY, "{not json").unwrap();

        assert_matches!(store.read_persisted(), Err(PersistenceError::Decode(_)));
    }

    #[test]
    fn read_failure_loads_empty() {
        let storage = Arc::new(FlakyStorage::default());
        storage.fail_reads.store(true, Ordering::SeqCst);

        let store = HistoryStore::open(storage);

        assert!(store.records().is_empty());
    }

    #[test]
    fn oversized_slot_is_truncated_on_load() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let mut wide = HistoryStore::with_options(Arc::clone(&storage), "h", 5);
        for s in ["a", "b", "c", "d", "e"] {
            wide.append(record(s));
        }
        let newest_two = ids(&wide.records()[..2]);

        let narrow = HistoryStore::with_options(storage, "h", 2);

        assert_eq!(ids(narrow.records()), newest_two);
    }

    #[test]
    fn write_failure_keeps_memory_authoritative() {
        let storage = Arc::new(FlakyStorage::default());
        let mut store = HistoryStore::open(storage.clone());
        store.append(record("persisted"));

        storage.fail_writes.store(true, Ordering::SeqCst);
        let unsaved = record("unsaved");
        let after_append = store.append(unsaved.clone()).to_vec();

        assert_eq!(after_append[0].id, unsaved.id);
        assert_eq!(store.load(), after_append.as_slice());

        // Once writes recover, the durable copy catches up.
        storage.fail_writes.store(false, Ordering::SeqCst);
        store.remove(RecordId::now_v7());
        let reopened = HistoryStore::open(storage);
        assert_eq!(reopened.records(), after_append.as_slice());
    }
}
