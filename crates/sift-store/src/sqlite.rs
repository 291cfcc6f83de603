//! SQLite-backed entry store

use crate::connection::{acquire_lock_with_timeout, configure_connection};
use crate::{LogStats, StoreError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use sift_domain::traits::{AuditSink, EntryStore, InsertError, MetricSink};
use sift_domain::{
    now_millis, DataType, Entry, EntryId, Fingerprint, Metric, NewEntry, OperationType,
    ProcessingLogRecord,
};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const ENTRY_COLUMNS: &str = "id, content, data_type, fingerprint, similarity_score, \
     is_redundant, is_false_positive, created_at, updated_at";

const LOG_COLUMNS: &str = "operation_type, content, data_type, fingerprint, similarity_score, \
     is_redundant, is_false_positive, processing_time_ms, success, error_message, processed_at";

/// SQLite-based implementation of [`EntryStore`], [`AuditSink`] and [`MetricSink`]
///
/// # Concurrency
///
/// `rusqlite::Connection` is not `Sync`, so the connection sits behind a
/// `Mutex`. Every call acquires the lock with a deadline and the connection's
/// `busy_timeout` is set to the same value, so no call blocks indefinitely.
///
/// Fingerprint uniqueness is enforced by a `UNIQUE` constraint. A losing
/// concurrent insert surfaces as [`InsertError::DuplicateFingerprint`].
pub struct SqliteStore {
    conn: Mutex<Connection>,
    timeout: Duration,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Default deadline for a single storage call
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

    /// Open (or create) a database at `path` with the default timeout
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sift_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("sift.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::with_timeout(path, Self::DEFAULT_TIMEOUT)
    }

    /// Open (or create) a database at `path` with a custom call deadline
    pub fn with_timeout<P: AsRef<Path>>(path: P, timeout: Duration) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let stored_path = (path != Path::new(":memory:")).then(|| path.to_path_buf());
        Self::from_connection(conn, timeout, stored_path)
    }

    /// Create a private in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, Self::DEFAULT_TIMEOUT, None)
    }

    fn from_connection(
        conn: Connection,
        timeout: Duration,
        path: Option<PathBuf>,
    ) -> Result<Self, StoreError> {
        configure_connection(&conn, timeout)?;
        conn.execute_batch(include_str!("schema.sql"))?;

        tracing::debug!(
            path = ?path,
            timeout_ms = timeout.as_millis() as u64,
            "SQLite store initialized"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            timeout,
            path,
        })
    }

    /// Database file path (`None` for in-memory databases)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Deadline applied to each storage call
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        acquire_lock_with_timeout(&self.conn, self.timeout)
    }

    /// Convert EntryId to bytes for storage
    fn entry_id_to_bytes(id: EntryId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to EntryId
    fn bytes_to_entry_id(bytes: &[u8]) -> Result<EntryId, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for EntryId, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(EntryId::from_value(u128::from_be_bytes(arr)))
    }

    fn parse_data_type(idx: usize, s: &str) -> rusqlite::Result<DataType> {
        DataType::parse(s).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!("Unknown data type: {}", s))),
            )
        })
    }

    fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<Entry> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_entry_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        let data_type: String = row.get(2)?;
        let fingerprint: String = row.get(3)?;
        let fingerprint = Fingerprint::parse(&fingerprint).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(e)),
            )
        })?;

        Ok(Entry {
            id,
            content: row.get(1)?,
            data_type: Self::parse_data_type(2, &data_type)?,
            fingerprint,
            similarity_score: row.get(4)?,
            is_redundant: row.get(5)?,
            is_false_positive: row.get(6)?,
            created_at: row.get::<_, i64>(7)? as u64,
            updated_at: row.get::<_, i64>(8)? as u64,
        })
    }

    fn row_to_log(row: &Row<'_>) -> rusqlite::Result<ProcessingLogRecord> {
        let operation: String = row.get(0)?;
        let operation_type = OperationType::parse(&operation).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!("Unknown operation: {}", operation))),
            )
        })?;
        let data_type: String = row.get(2)?;

        Ok(ProcessingLogRecord {
            operation_type,
            content: row.get(1)?,
            data_type: Self::parse_data_type(2, &data_type)?,
            fingerprint: row.get(3)?,
            similarity_score: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
            is_redundant: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
            is_false_positive: row.get::<_, Option<bool>>(6)?.unwrap_or(false),
            processing_time_ms: row.get::<_, Option<i64>>(7)?.unwrap_or(0) as u64,
            success: row.get(8)?,
            error_message: row.get(9)?,
            processed_at: row.get::<_, i64>(10)? as u64,
        })
    }

    fn is_unique_violation(e: &rusqlite::Error) -> bool {
        matches!(
            e,
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation
                    && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    }

    /// Most recent audit records, newest first
    pub fn recent_logs(
        &self,
        limit: usize,
        failed_only: bool,
    ) -> Result<Vec<ProcessingLogRecord>, StoreError> {
        let conn = self.lock()?;
        let filter = if failed_only { "WHERE success = 0" } else { "" };
        let sql = format!(
            "SELECT {} FROM processing_logs {} ORDER BY id DESC LIMIT ?1",
            LOG_COLUMNS, filter
        );

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![limit as i64], Self::row_to_log)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Aggregate counts over all classification records
    pub fn log_stats(&self) -> Result<LogStats, StoreError> {
        let conn = self.lock()?;
        let stats = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN success = 0 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN success = 1 AND is_redundant = 1 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN success = 1 AND is_false_positive = 1 THEN 1 ELSE 0 END), 0),
                    COALESCE(AVG(processing_time_ms), 0.0)
             FROM processing_logs WHERE operation_type = ?1",
            params![OperationType::Classify.as_str()],
            |row| {
                Ok(LogStats {
                    total: row.get::<_, i64>(0)? as usize,
                    failed: row.get::<_, i64>(1)? as usize,
                    redundant: row.get::<_, i64>(2)? as usize,
                    false_positives: row.get::<_, i64>(3)? as usize,
                    avg_processing_time_ms: row.get(4)?,
                })
            },
        )?;

        Ok(stats)
    }

    /// Most recent metric observations, newest first
    pub fn recent_metrics(
        &self,
        name: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Metric>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT metric_name, metric_value, metric_timestamp, data_type
             FROM system_metrics
             WHERE ?1 IS NULL OR metric_name = ?1
             ORDER BY metric_timestamp DESC, id DESC
             LIMIT ?2",
        )?;

        let metrics = stmt
            .query_map(params![name, limit as i64], |row| {
                let data_type: Option<String> = row.get(3)?;
                let data_type = match data_type {
                    Some(s) => Some(Self::parse_data_type(3, &s)?),
                    None => None,
                };
                Ok(Metric {
                    name: row.get(0)?,
                    value: row.get(1)?,
                    timestamp: row.get::<_, i64>(2)? as u64,
                    data_type,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(metrics)
    }
}

impl EntryStore for SqliteStore {
    type Error = StoreError;

    fn insert(&self, new_entry: NewEntry) -> Result<Entry, InsertError<Self::Error>> {
        let conn = self.lock()?;
        // Stamped under the lock so ids and timestamps follow commit order
        let entry = new_entry.into_entry(EntryId::new(), now_millis());

        let result = conn.execute(
            &format!(
                "INSERT INTO data_entries ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                ENTRY_COLUMNS
            ),
            params![
                Self::entry_id_to_bytes(entry.id),
                &entry.content,
                entry.data_type.as_str(),
                entry.fingerprint.as_str(),
                entry.similarity_score,
                entry.is_redundant,
                entry.is_false_positive,
                entry.created_at as i64,
                entry.updated_at as i64,
            ],
        );

        match result {
            Ok(_) => Ok(entry),
            Err(e) if Self::is_unique_violation(&e) => {
                tracing::debug!(fingerprint = entry.fingerprint.short(), "Insert lost uniqueness race");
                Err(InsertError::DuplicateFingerprint(entry.fingerprint))
            }
            Err(e) => Err(InsertError::Storage(e.into())),
        }
    }

    fn lookup_by_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<Entry>, Self::Error> {
        let conn = self.lock()?;
        let entry = conn
            .query_row(
                &format!("SELECT {} FROM data_entries WHERE fingerprint = ?1", ENTRY_COLUMNS),
                params![fingerprint.as_str()],
                Self::row_to_entry,
            )
            .optional()?;

        Ok(entry)
    }

    fn get(&self, id: EntryId) -> Result<Option<Entry>, Self::Error> {
        let conn = self.lock()?;
        let entry = conn
            .query_row(
                &format!("SELECT {} FROM data_entries WHERE id = ?1", ENTRY_COLUMNS),
                params![Self::entry_id_to_bytes(id)],
                Self::row_to_entry,
            )
            .optional()?;

        Ok(entry)
    }

    fn list_all(&self) -> Result<Vec<Entry>, Self::Error> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM data_entries ORDER BY rowid",
            ENTRY_COLUMNS
        ))?;
        let entries = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn list_range(&self, offset: usize, limit: usize) -> Result<Vec<Entry>, Self::Error> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM data_entries ORDER BY rowid LIMIT ?1 OFFSET ?2",
            ENTRY_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![limit as i64, offset as i64], Self::row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn list_by_data_type(
        &self,
        data_type: DataType,
        limit: Option<usize>,
    ) -> Result<Vec<Entry>, Self::Error> {
        let conn = self.lock()?;
        // LIMIT -1 means no limit in SQLite
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM data_entries WHERE data_type = ?1 ORDER BY rowid LIMIT ?2",
            ENTRY_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![data_type.as_str(), limit], Self::row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn count(&self) -> Result<usize, Self::Error> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM data_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl AuditSink for SqliteStore {
    type Error = StoreError;

    fn append(&self, record: &ProcessingLogRecord) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO processing_logs ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                LOG_COLUMNS
            ),
            params![
                record.operation_type.as_str(),
                &record.content,
                record.data_type.as_str(),
                &record.fingerprint,
                record.similarity_score,
                record.is_redundant,
                record.is_false_positive,
                record.processing_time_ms as i64,
                record.success,
                &record.error_message,
                record.processed_at as i64,
            ],
        )?;
        Ok(())
    }
}

impl MetricSink for SqliteStore {
    type Error = StoreError;

    fn record_metric(&self, metric: &Metric) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO system_metrics (metric_name, metric_value, metric_timestamp, data_type)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                &metric.name,
                metric.value,
                metric.timestamp as i64,
                metric.data_type.map(|dt| dt.as_str()),
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_bytes_roundtrip() {
        let id = EntryId::new();
        let bytes = SqliteStore::entry_id_to_bytes(id);
        assert_eq!(bytes.len(), 16);
        assert_eq!(SqliteStore::bytes_to_entry_id(&bytes).unwrap(), id);
    }

    #[test]
    fn test_bytes_to_entry_id_wrong_length() {
        assert!(matches!(
            SqliteStore::bytes_to_entry_id(&[1, 2, 3]),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[test]
    fn test_in_memory_has_no_path() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.path().is_none());
        assert_eq!(store.timeout(), SqliteStore::DEFAULT_TIMEOUT);

        let named = SqliteStore::new(":memory:").unwrap();
        assert!(named.path().is_none());
    }
}
