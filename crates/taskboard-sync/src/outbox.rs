//! Background delivery of reconciliation intents.
//!
//! The session enqueues one batch per reconciliation and never waits on
//! it. A single worker drains batches in order and runs the intents of a
//! batch concurrently, retrying each with backoff. When a batch settles
//! the worker reports back on the event channel.

use std::sync::Arc;

use futures::future::join_all;
use taskboard_core::BoardResult;
use taskboard_domain::{FailurePolicy, Intent};
use taskboard_persistence::EntityStore;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::retry::RetryPolicy;

#[derive(Debug)]
struct Batch {
    id: u64,
    intents: Vec<Intent>,
    /// Replaces each intent's own policy when set.
    on_failure: Option<FailurePolicy>,
}

#[derive(Debug, Clone)]
pub struct IntentFailure {
    pub intent: Intent,
    pub error: String,
    pub attempts: u32,
    pub policy: FailurePolicy,
}

#[derive(Debug, Clone)]
pub enum SyncEvent {
    BatchSettled {
        batch_id: u64,
        intent_count: usize,
        failures: Vec<IntentFailure>,
    },
}

impl SyncEvent {
    /// Whether any failure in this event calls for a full reload.
    pub fn needs_reload(&self) -> bool {
        match self {
            Self::BatchSettled { failures, .. } => failures
                .iter()
                .any(|f| f.policy == FailurePolicy::Reload),
        }
    }
}

/// Sending half of the outbox, owned by the session.
pub struct Outbox {
    tx: mpsc::UnboundedSender<Batch>,
    next_id: u64,
}

impl Outbox {
    /// Start the worker. Returns the outbox, the receiver for settled
    /// batches, and the worker's handle.
    pub fn spawn(
        store: Arc<dyn EntityStore>,
        retry: RetryPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<SyncEvent>, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_worker(store, retry, rx, events_tx));
        (Self { tx, next_id: 0 }, events_rx, handle)
    }

    /// Queue a batch. Returns its id, or `None` when there was nothing to
    /// send or the worker is gone.
    pub fn enqueue(&mut self, intents: Vec<Intent>) -> Option<u64> {
        self.send(intents, None)
    }

    /// Queue a batch whose failures are only logged, whatever the intents.
    pub fn enqueue_log_only(&mut self, intents: Vec<Intent>) -> Option<u64> {
        self.send(intents, Some(FailurePolicy::LogOnly))
    }

    fn send(&mut self, intents: Vec<Intent>, on_failure: Option<FailurePolicy>) -> Option<u64> {
        if intents.is_empty() {
            return None;
        }
        self.next_id += 1;
        let id = self.next_id;
        tracing::debug!("Queueing batch {} with {} intents", id, intents.len());
        let batch = Batch {
            id,
            intents,
            on_failure,
        };
        match self.tx.send(batch) {
            Ok(()) => Some(id),
            Err(e) => {
                tracing::error!("Failed to queue batch: outbox worker stopped: {:?}", e.0.id);
                None
            }
        }
    }
}

async fn run_worker(
    store: Arc<dyn EntityStore>,
    retry: RetryPolicy,
    mut rx: mpsc::UnboundedReceiver<Batch>,
    events: mpsc::UnboundedSender<SyncEvent>,
) {
    while let Some(batch) = rx.recv().await {
        let intent_count = batch.intents.len();
        let mut failures = dispatch_batch(store.as_ref(), &retry, batch.intents).await;
        if let Some(policy) = batch.on_failure {
            for failure in &mut failures {
                failure.policy = policy;
            }
        }
        if failures.is_empty() {
            tracing::debug!("Batch {} settled ({} intents)", batch.id, intent_count);
        }
        let event = SyncEvent::BatchSettled {
            batch_id: batch.id,
            intent_count,
            failures,
        };
        if events.send(event).is_err() {
            tracing::error!("Session dropped; stopping outbox worker");
            break;
        }
    }
}

async fn apply_intent(store: &dyn EntityStore, intent: &Intent) -> BoardResult<()> {
    match intent {
        Intent::UpdateTask { task_id, patch } => {
            store.update_task(task_id, patch.clone()).await.map(|_| ())
        }
        Intent::UpdateColumn { column_id, patch } => {
            store.update_column(column_id, patch.clone()).await.map(|_| ())
        }
    }
}

/// Run every intent concurrently and collect the ones that still failed
/// after retrying.
pub async fn dispatch_batch(
    store: &dyn EntityStore,
    retry: &RetryPolicy,
    intents: Vec<Intent>,
) -> Vec<IntentFailure> {
    let runs = intents.into_iter().map(|intent| async move {
        let label = intent.describe();
        tracing::debug!("Dispatching {}", label);
        let (result, attempts) = retry.run(&label, || apply_intent(store, &intent)).await;
        match result {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("Giving up on {} after {} attempts: {}", label, attempts, e);
                Some(IntentFailure {
                    policy: intent.failure_policy(),
                    intent,
                    error: e.to_string(),
                    attempts,
                })
            }
        }
    });
    join_all(runs).await.into_iter().flatten().collect()
}
