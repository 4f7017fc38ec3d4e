//! Generation workflow: call the model, record the result.
//!
//! [`HistoryController::request_generation`] moves through
//! `Idle -> Pending -> Idle` for every call. Calls are serialized: a call
//! made while another is in flight waits its turn, so history order always
//! matches call order. The pending count covers queued calls as well as the
//! one currently talking to the model.
//!
//! Store mutations write through to blocking storage, so they run on the
//! blocking pool. Readers are served from a snapshot that is replaced after
//! each mutation and never wait on a write.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use promptcraft_core::error::{CoreError, GenerationError};
use promptcraft_core::generation::GenerationClient;
use promptcraft_core::params::PromptParams;
use promptcraft_core::record::HistoryRecord;
use promptcraft_core::types::RecordId;

use crate::store::HistoryStore;

pub struct HistoryController {
    client: Arc<dyn GenerationClient>,
    store: Arc<Mutex<HistoryStore>>,
    snapshot: Arc<watch::Sender<Vec<HistoryRecord>>>,
    capacity: usize,
    pending: watch::Sender<usize>,
    turn: Mutex<()>,
}

impl HistoryController {
    pub fn new(client: Arc<dyn GenerationClient>, store: HistoryStore) -> Self {
        let (pending, _) = watch::channel(0);
        let (snapshot, _) = watch::channel(store.records().to_vec());
        Self {
            client,
            capacity: store.capacity(),
            store: Arc::new(Mutex::new(store)),
            snapshot: Arc::new(snapshot),
            pending,
            turn: Mutex::new(()),
        }
    }

    /// Maximum number of records kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether any generation is queued or in flight.
    pub fn is_pending(&self) -> bool {
        *self.pending.borrow() > 0
    }

    /// Watch the number of queued or in-flight generations.
    pub fn subscribe_pending(&self) -> watch::Receiver<usize> {
        self.pending.subscribe()
    }

    /// Generate text for `params` and, on success, record it in history.
    ///
    /// Failures are returned unchanged and leave history untouched. The
    /// pending count is released even if the returned future is dropped
    /// before completion.
    pub async fn request_generation(
        &self,
        params: PromptParams,
    ) -> Result<HistoryRecord, GenerationError> {
        let _pending = PendingGuard::enter(&self.pending);
        let _turn = self.turn.lock().await;

        match self.client.generate(&params).await {
            Ok(text) => {
                let platform = params.platform;
                let record = HistoryRecord::new(params, text);
                let entry = record.clone();
                let recorded = self
                    .mutate(move |store| {
                        store.append(entry);
                    })
                    .await;
                match recorded {
                    Ok(()) => tracing::info!(
                        record_id = %record.id,
                        platform = %platform,
                        "Generation recorded in history",
                    ),
                    Err(e) => tracing::error!(
                        record_id = %record.id,
                        error = %e,
                        "Failed to record generation",
                    ),
                }
                Ok(record)
            }
            Err(e) => {
                tracing::warn!(
                    platform = %params.platform,
                    code = e.code(),
                    error = %e,
                    "Generation failed",
                );
                Err(e)
            }
        }
    }

    /// Snapshot of the history, newest first.
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.snapshot.borrow().clone()
    }

    pub fn get(&self, id: RecordId) -> Option<HistoryRecord> {
        self.snapshot.borrow().iter().find(|r| r.id == id).cloned()
    }

    pub async fn remove(&self, id: RecordId) -> Result<Vec<HistoryRecord>, CoreError> {
        self.mutate(move |store| store.remove(id).to_vec()).await
    }

    pub async fn clear(&self) -> Result<Vec<HistoryRecord>, CoreError> {
        self.mutate(|store| store.clear().to_vec()).await
    }

    /// Run `f` against the store on the blocking pool and publish the result.
    ///
    /// The snapshot is replaced inside the blocking task, so it stays in step
    /// with the store even if the caller stops waiting.
    async fn mutate<T, F>(&self, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut HistoryStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let mut store = Arc::clone(&self.store).lock_owned().await;
        let snapshot = Arc::clone(&self.snapshot);

        tokio::task::spawn_blocking(move || {
            let out = f(&mut store);
            snapshot.send_replace(store.records().to_vec());
            out
        })
        .await
        .map_err(|e| CoreError::Internal(format!("History store task failed: {e}")))
    }
}

/// Increments the pending count for its lifetime.
struct PendingGuard<'a> {
    pending: &'a watch::Sender<usize>,
}

impl<'a> PendingGuard<'a> {
    fn enter(pending: &'a watch::Sender<usize>) -> Self {
        pending.send_modify(|n| *n += 1);
        Self { pending }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.send_modify(|n| *n = n.saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
