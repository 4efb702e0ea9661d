//! Generic entity store synchronized with a remote record store.
//!
//! # Responsibility
//! - Mirror one remote collection in memory.
//! - Translate remote failures into the store's `error` field.
//!
//! # Invariants
//! - The collection changes only by whole patches: replace-all, append,
//!   in-place replace or remove. A failed operation leaves it untouched.
//! - Local order is the order of the last successful fetch; mutations never
//!   re-sort.
//! - The state lock is never held across an await point.
//! - `is_loading` is true while any operation is in flight; `error` is owned
//!   by the most recently issued operation.

use crate::model::Entity;
use crate::remote::{FieldFilter, RecordStore, RemoteError};
use log::{info, warn};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Result of one store operation as seen by the caller.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote call succeeded and the local patch was applied.
    Applied,
    /// Remote call succeeded but the id was not held locally, so the local
    /// collection was left as is.
    MissingLocally,
    /// Remote call failed; the message is in the store's `error`.
    Failed,
}

impl SyncOutcome {
    pub fn is_failed(self) -> bool {
        self == Self::Failed
    }
}

/// Plain synchronous state container behind an [`EntityStore`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoreState<E> {
    collection: Vec<E>,
    error: Option<String>,
    in_flight: usize,
    latest_request: u64,
}

impl<E> Default for StoreState<E> {
    fn default() -> Self {
        Self {
            collection: Vec::new(),
            error: None,
            in_flight: 0,
            latest_request: 0,
        }
    }
}

impl<E: Entity> StoreState<E> {
    fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Replaces the whole collection.
    fn replace_all(&mut self, records: Vec<E>) {
        self.collection = records;
    }

    /// Appends one record at the end.
    fn append(&mut self, record: E) {
        self.collection.push(record);
    }

    /// Replaces the element with `id`, keeping its position.
    ///
    /// Returns `false` and leaves the collection untouched when absent.
    fn replace_in_place(&mut self, id: &str, record: E) -> bool {
        match self.collection.iter_mut().find(|item| item.id() == id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Removes the element with `id`. Returns whether one was removed.
    fn remove(&mut self, id: &str) -> bool {
        match self.collection.iter().position(|item| item.id() == id) {
            Some(index) => {
                self.collection.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Point-in-time copy of a store's observable state.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot<E> {
    pub collection: Vec<E>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// In-memory mirror of one remote collection.
pub struct EntityStore<E: Entity> {
    remote: Arc<dyn RecordStore>,
    state: Mutex<StoreState<E>>,
    request_seq: AtomicU64,
}

impl<E: Entity> EntityStore<E> {
    /// Creates an empty store over the injected record store.
    pub fn new(remote: Arc<dyn RecordStore>) -> Self {
        Self {
            remote,
            state: Mutex::new(StoreState::default()),
            request_seq: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot<E> {
        let state = self.lock();
        StoreSnapshot {
            collection: state.collection.clone(),
            is_loading: state.is_loading(),
            error: state.error.clone(),
        }
    }

    pub fn collection(&self) -> Vec<E> {
        self.lock().collection.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }

    pub fn len(&self) -> usize {
        self.lock().collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().collection.is_empty()
    }

    /// Returns a copy of the local record with `id`.
    pub fn get(&self, id: &str) -> Option<E> {
        self.lock()
            .collection
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    /// Runs `query` against the current collection without copying it.
    pub fn with_collection<T>(&self, query: impl FnOnce(&[E]) -> T) -> T {
        query(&self.lock().collection)
    }

    /// Reloads the full collection in canonical order.
    pub async fn fetch(&self) -> SyncOutcome {
        self.fetch_filtered(None).await
    }

    /// Reloads the collection restricted by an equality filter.
    ///
    /// On failure the previous collection stays readable.
    pub async fn fetch_filtered(&self, filter: Option<FieldFilter>) -> SyncOutcome {
        let mut request = self.begin("store_fetch");
        let result = self
            .remote
            .select(E::TABLE, filter.as_ref(), &E::default_order())
            .await
            .and_then(|rows| rows.into_iter().map(decode::<E>).collect::<Result<Vec<_>, _>>());

        match result {
            Ok(records) => {
                let count = records.len();
                request.finish(None, |state| {
                    state.replace_all(records);
                    true
                });
                info!(
                    "event=store_fetch module=store status=ok table={} count={count} duration_ms={}",
                    E::TABLE,
                    request.elapsed_ms()
                );
                SyncOutcome::Applied
            }
            Err(err) => request.fail(err),
        }
    }

    /// Inserts `entity` remotely and appends the stored record.
    pub async fn add(&self, entity: &E) -> SyncOutcome {
        let mut request = self.begin("store_add");
        let result = match encode(entity) {
            Ok(body) => self.remote.insert(E::TABLE, body).await.and_then(decode::<E>),
            Err(err) => Err(err),
        };

        match result {
            Ok(stored) => {
                let id = stored.id().to_string();
                request.finish(None, |state| {
                    state.append(stored);
                    true
                });
                info!(
                    "event=store_add module=store status=ok table={} id={id} duration_ms={}",
                    E::TABLE,
                    request.elapsed_ms()
                );
                SyncOutcome::Applied
            }
            Err(err) => request.fail(err),
        }
    }

    /// Writes `entity` remotely and replaces the local copy in place.
    pub async fn update(&self, entity: &E) -> SyncOutcome {
        let mut request = self.begin("store_update");
        let id = entity.id().to_string();
        let result = match encode(entity) {
            Ok(body) => self
                .remote
                .update(E::TABLE, &id, body)
                .await
                .and_then(decode::<E>),
            Err(err) => Err(err),
        };

        match result {
            Ok(stored) => {
                let replaced = request.finish(None, |state| state.replace_in_place(&id, stored));
                request.applied(&id, replaced)
            }
            Err(err) => request.fail(err),
        }
    }

    /// Deletes the record remotely and removes the local copy.
    pub async fn delete(&self, id: &str) -> SyncOutcome {
        let mut request = self.begin("store_delete");
        match self.remote.delete(E::TABLE, id).await {
            Ok(()) => {
                let removed = request.finish(None, |state| state.remove(id));
                request.applied(id, removed)
            }
            Err(err) => request.fail(err),
        }
    }

    fn begin(&self, event: &'static str) -> Request<'_, E> {
        let id = self.request_seq.fetch_add(1, Ordering::Relaxed) + 1;
        {
            let mut state = self.lock();
            state.in_flight += 1;
            state.latest_request = id;
            state.error = None;
        }
        Request {
            store: self,
            id,
            event,
            started_at: Instant::now(),
            finished: false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One in-flight store operation.
///
/// Dropping an unfinished request (a cancelled future) still releases its
/// in-flight slot.
struct Request<'a, E: Entity> {
    store: &'a EntityStore<E>,
    id: u64,
    event: &'static str,
    started_at: Instant,
    finished: bool,
}

impl<E: Entity> Request<'_, E> {
    /// Applies `patch` and settles loading/error in one critical section.
    fn finish(
        &mut self,
        error: Option<String>,
        patch: impl FnOnce(&mut StoreState<E>) -> bool,
    ) -> bool {
        let mut state = self.store.lock();
        let patched = patch(&mut state);
        state.in_flight = state.in_flight.saturating_sub(1);
        self.finished = true;
        if state.latest_request == self.id {
            state.error = error;
        } else if let Some(message) = error {
            warn!(
                "event={} module=store status=error_suppressed table={} request={} latest={} error={message}",
                self.event,
                E::TABLE,
                self.id,
                state.latest_request
            );
        }
        patched
    }

    fn fail(&mut self, err: RemoteError) -> SyncOutcome {
        let message = err.to_string();
        warn!(
            "event={} module=store status=error table={} duration_ms={} error={message}",
            self.event,
            E::TABLE,
            self.elapsed_ms()
        );
        self.finish(Some(message), |_| false);
        SyncOutcome::Failed
    }

    fn applied(&self, id: &str, patched: bool) -> SyncOutcome {
        if patched {
            info!(
                "event={} module=store status=ok table={} id={id} duration_ms={}",
                self.event,
                E::TABLE,
                self.elapsed_ms()
            );
            SyncOutcome::Applied
        } else {
            warn!(
                "event={} module=store status=missing_locally table={} id={id} duration_ms={}",
                self.event,
                E::TABLE,
                self.elapsed_ms()
            );
            SyncOutcome::MissingLocally
        }
    }

    fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }
}

impl<E: Entity> Drop for Request<'_, E> {
    fn drop(&mut self) {
        if !self.finished {
            let mut state = self.store.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
        }
    }
}

fn encode<E: Entity>(entity: &E) -> Result<Value, RemoteError> {
    Ok(serde_json::to_value(entity)?)
}

fn decode<E: Entity>(record: Value) -> Result<E, RemoteError> {
    Ok(serde_json::from_value(record)?)
}
