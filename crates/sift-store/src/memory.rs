//! In-memory store for tests and ephemeral runs.
//!
//! Uses `Vec` and `HashMap` behind a single `std::sync::RwLock`; the write
//! lock makes the fingerprint check and the push one atomic step.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use sift_domain::traits::{AuditSink, EntryStore, InsertError, MetricSink};
use sift_domain::{
    now_millis, DataType, Entry, EntryId, Fingerprint, Metric, NewEntry, ProcessingLogRecord,
};

use crate::{LogStats, StoreError};

#[derive(Default)]
struct Inner {
    entries: Vec<Entry>,
    by_fingerprint: HashMap<Fingerprint, usize>,
    logs: Vec<ProcessingLogRecord>,
    metrics: Vec<Metric>,
}

/// In-memory implementation of the store traits.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".into()))
    }

    /// All audit records in append order.
    pub fn logs(&self) -> Result<Vec<ProcessingLogRecord>, StoreError> {
        Ok(self.read()?.logs.clone())
    }

    /// All metric observations in append order.
    pub fn metrics(&self) -> Result<Vec<Metric>, StoreError> {
        Ok(self.read()?.metrics.clone())
    }

    pub fn log_stats(&self) -> Result<LogStats, StoreError> {
        Ok(LogStats::from_records(&self.read()?.logs))
    }
}

impl EntryStore for InMemoryStore {
    type Error = StoreError;

    fn insert(&self, new_entry: NewEntry) -> Result<Entry, InsertError<Self::Error>> {
        let mut inner = self.write()?;
        if inner.by_fingerprint.contains_key(&new_entry.fingerprint) {
            return Err(InsertError::DuplicateFingerprint(new_entry.fingerprint));
        }

        let entry = new_entry.into_entry(EntryId::new(), now_millis());
        let idx = inner.entries.len();
        inner.by_fingerprint.insert(entry.fingerprint.clone(), idx);
        inner.entries.push(entry.clone());
        Ok(entry)
    }

    fn lookup_by_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<Entry>, Self::Error> {
        let inner = self.read()?;
        Ok(inner
            .by_fingerprint
            .get(fingerprint)
            .map(|&idx| inner.entries[idx].clone()))
    }

    fn get(&self, id: EntryId) -> Result<Option<Entry>, Self::Error> {
        Ok(self.read()?.entries.iter().find(|e| e.id == id).cloned())
    }

    fn list_all(&self) -> Result<Vec<Entry>, Self::Error> {
        Ok(self.read()?.entries.clone())
    }

    fn list_range(&self, offset: usize, limit: usize) -> Result<Vec<Entry>, Self::Error> {
        Ok(self
            .read()?
            .entries
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn list_by_data_type(
        &self,
        data_type: DataType,
        limit: Option<usize>,
    ) -> Result<Vec<Entry>, Self::Error> {
        Ok(self
            .read()?
            .entries
            .iter()
            .filter(|e| e.data_type == data_type)
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<usize, Self::Error> {
        Ok(self.read()?.entries.len())
    }
}

impl AuditSink for InMemoryStore {
    type Error = StoreError;

    fn append(&self, record: &ProcessingLogRecord) -> Result<(), Self::Error> {
        self.write()?.logs.push(record.clone());
        Ok(())
    }
}

impl MetricSink for InMemoryStore {
    type Error = StoreError;

    fn record_metric(&self, metric: &Metric) -> Result<(), Self::Error> {
        self.write()?.metrics.push(metric.clone());
        Ok(())
    }
}
