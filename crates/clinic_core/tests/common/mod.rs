//! Shared fixtures and fake record stores for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use clinic_core::{
    Appointment, FieldFilter, OrderBy, Patient, Psychologist, RecordStore, RemoteError,
    RemoteResult, SqliteRecordStore,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub fn appointment(id: &str, date: &str) -> Appointment {
    Appointment::new(id, "pat-1", "psy-1", date, "09:00", "09:50")
}

pub fn appointment_for(id: &str, date: &str, patient_id: &str, psychologist_id: &str) -> Appointment {
    Appointment::new(id, patient_id, psychologist_id, date, "14:00", "14:50")
}

pub fn patient(id: &str, name: &str) -> Patient {
    Patient::new(id, name)
}

pub fn psychologist(id: &str, name: &str) -> Psychologist {
    Psychologist::new(id, name)
}

pub fn sqlite_store() -> Arc<SqliteRecordStore> {
    Arc::new(SqliteRecordStore::open_in_memory().unwrap())
}

/// SQLite store that can be switched into failing every call.
pub struct FlakyStore {
    inner: SqliteRecordStore,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: SqliteRecordStore::open_in_memory().unwrap(),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> RemoteResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            Err(RemoteError::Transport("connection reset by peer".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn select(
        &self,
        table: &str,
        filter: Option<&FieldFilter>,
        order: &OrderBy,
    ) -> RemoteResult<Vec<Value>> {
        self.check()?;
        self.inner.select(table, filter, order).await
    }

    async fn insert(&self, table: &str, record: Value) -> RemoteResult<Value> {
        self.check()?;
        self.inner.insert(table, record).await
    }

    async fn update(&self, table: &str, id: &str, partial: Value) -> RemoteResult<Value> {
        self.check()?;
        self.inner.update(table, id, partial).await
    }

    async fn delete(&self, table: &str, id: &str) -> RemoteResult<()> {
        self.check()?;
        self.inner.delete(table, id).await
    }
}

type Gate = oneshot::Receiver<Result<(), String>>;

/// SQLite store whose calls block until the test opens their gate.
///
/// Gates are keyed by record id (`select` uses the key `"select"`). Calls
/// without a registered gate pass straight through.
pub struct GatedStore {
    inner: SqliteRecordStore,
    gates: Mutex<HashMap<String, Gate>>,
}

impl GatedStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: SqliteRecordStore::open_in_memory().unwrap(),
            gates: Mutex::new(HashMap::new()),
        })
    }

    /// Registers a gate; send `Ok(())` to proceed or `Err(msg)` to fail.
    pub fn gate(&self, key: &str) -> oneshot::Sender<Result<(), String>> {
        let (sender, receiver) = oneshot::channel();
        self.gates.lock().unwrap().insert(key.to_string(), receiver);
        sender
    }

    async fn pass(&self, key: &str) -> RemoteResult<()> {
        let gate = self.gates.lock().unwrap().remove(key);
        match gate {
            None => Ok(()),
            Some(receiver) => match receiver.await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(message)) => Err(RemoteError::Transport(message)),
                Err(_) => Err(RemoteError::Transport("gate dropped".to_string())),
            },
        }
    }
}

#[async_trait]
impl RecordStore for GatedStore {
    async fn select(
        &self,
        table: &str,
        filter: Option<&FieldFilter>,
        order: &OrderBy,
    ) -> RemoteResult<Vec<Value>> {
        self.pass("select").await?;
        self.inner.select(table, filter, order).await
    }

    async fn insert(&self, table: &str, record: Value) -> RemoteResult<Value> {
        let key = record
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        self.pass(&key).await?;
        self.inner.insert(table, record).await
    }

    async fn update(&self, table: &str, id: &str, partial: Value) -> RemoteResult<Value> {
        self.pass(id).await?;
        self.inner.update(table, id, partial).await
    }

    async fn delete(&self, table: &str, id: &str) -> RemoteResult<()> {
        self.pass(id).await?;
        self.inner.delete(table, id).await
    }
}
