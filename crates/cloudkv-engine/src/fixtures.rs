//! Test doubles: a blob store that records every call and can be told to
//! fail, and a resolver that records its inputs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use cloudkv_resolve::{ConflictResolver, ResolveError, ResolveResult};
use cloudkv_store::{BlobHandle, BlobStore, InMemoryBlobStore, StoreError, StoreResult};
use cloudkv_types::{Record, Values, Version};

pub fn values(pairs: &[(&str, &str)]) -> Values {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlobCall {
    List,
    Read(BlobHandle),
    Write(String),
    Delete(BlobHandle),
}

#[derive(Default)]
pub struct RecordingBlobStore {
    inner: InMemoryBlobStore,
    calls: Mutex<Vec<BlobCall>>,
    fail_writes: AtomicBool,
    failing_reads: Mutex<Vec<BlobHandle>>,
    stalled_reads: Mutex<Vec<BlobHandle>>,
    failing_deletes: Mutex<Vec<BlobHandle>>,
}

impl RecordingBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a blob without recording a call.
    pub fn seed(&self, content: impl Into<String>) -> BlobHandle {
        self.inner.insert_raw(content).unwrap()
    }

    pub fn handles(&self) -> Vec<BlobHandle> {
        self.inner.handles().unwrap()
    }

    pub fn calls(&self) -> Vec<BlobCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Content of every attempted write, in order.
    pub fn writes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BlobCall::Write(content) => Some(content),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<BlobHandle> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BlobCall::Delete(handle) => Some(handle),
                _ => None,
            })
            .collect()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads_of(&self, handle: BlobHandle) {
        self.failing_reads.lock().unwrap().push(handle);
    }

    /// Reads of `handle` never complete.
    pub fn stall_reads_of(&self, handle: BlobHandle) {
        self.stalled_reads.lock().unwrap().push(handle);
    }

    pub fn fail_deletes_of(&self, handle: BlobHandle) {
        self.failing_deletes.lock().unwrap().push(handle);
    }

    pub fn clear_delete_failures(&self) {
        self.failing_deletes.lock().unwrap().clear();
    }

    fn record(&self, call: BlobCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
    async fn list(&self) -> StoreResult<Vec<BlobHandle>> {
        self.record(BlobCall::List);
        self.inner.list().await
    }

    async fn read(&self, handle: &BlobHandle) -> StoreResult<String> {
        self.record(BlobCall::Read(handle.clone()));
        let stalled = self.stalled_reads.lock().unwrap().contains(handle);
        if stalled {
            std::future::pending::<()>().await;
        }
        let failing = self.failing_reads.lock().unwrap().contains(handle);
        if failing {
            return Err(StoreError::Backend(format!("injected read failure for {handle}")));
        }
        self.inner.read(handle).await
    }

    async fn write(&self, content: String) -> StoreResult<BlobHandle> {
        self.record(BlobCall::Write(content.clone()));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".into()));
        }
        self.inner.write(content).await
    }

    async fn delete(&self, handle: &BlobHandle) -> StoreResult<()> {
        self.record(BlobCall::Delete(handle.clone()));
        let failing = self.failing_deletes.lock().unwrap().contains(handle);
        if failing {
            return Err(StoreError::Backend(format!("injected delete failure for {handle}")));
        }
        self.inner.delete(handle).await
    }
}

enum Winner {
    First,
    Second,
    Fixed(Record),
}

struct ResolverState {
    winner: Winner,
    rejected: Vec<String>,
    conflicts: Vec<(String, Record, Record)>,
    new_stamps: usize,
    existing_stamps: Vec<(Values, Version)>,
}

/// Stamps `{"v": "new"}` and `{"v": "existing:<previous v>"}`; picks the
/// second record unless told otherwise.
pub struct RecordingResolver {
    state: Mutex<ResolverState>,
}

impl RecordingResolver {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ResolverState {
                winner: Winner::Second,
                rejected: Vec::new(),
                conflicts: Vec::new(),
                new_stamps: 0,
                existing_stamps: Vec::new(),
            }),
        }
    }

    pub fn resolve_to(&self, record: Record) {
        self.state.lock().unwrap().winner = Winner::Fixed(record);
    }

    pub fn prefer_first(&self) {
        self.state.lock().unwrap().winner = Winner::First;
    }

    pub fn reject(&self, key: &str) {
        self.state.lock().unwrap().rejected.push(key.to_string());
    }

    pub fn conflicts(&self) -> Vec<(String, Record, Record)> {
        self.state.lock().unwrap().conflicts.clone()
    }

    pub fn new_stamps(&self) -> usize {
        self.state.lock().unwrap().new_stamps
    }

    pub fn existing_stamps(&self) -> Vec<(Values, Version)> {
        self.state.lock().unwrap().existing_stamps.clone()
    }
}

impl ConflictResolver for RecordingResolver {
    fn stamp_new_record(&self, _values: &Values) -> Version {
        self.state.lock().unwrap().new_stamps += 1;
        values(&[("v", "new")])
    }

    fn stamp_existing_record(&self, values_in: &Values, current_version: &Version) -> Version {
        self.state
            .lock()
            .unwrap()
            .existing_stamps
            .push((values_in.clone(), current_version.clone()));
        let previous = current_version.get("v").map(String::as_str).unwrap_or("");
        let stamp = format!("existing:{previous}");
        values(&[("v", stamp.as_str())])
    }

    fn handle_conflict(&self, key: &str, one: Record, two: Record) -> ResolveResult<Record> {
        let mut state = self.state.lock().unwrap();
        state
            .conflicts
            .push((key.to_string(), one.clone(), two.clone()));
        if state.rejected.iter().any(|k| k == key) {
            return Err(ResolveError::Rejected {
                key: key.to_string(),
                reason: "rejected by test".into(),
            });
        }
        Ok(match &state.winner {
            Winner::First => one,
            Winner::Second => two,
            Winner::Fixed(record) => record.clone(),
        })
    }
}
