//! Connection locking and configuration

use crate::StoreError;
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard, TryLockError};
use std::time::{Duration, Instant};

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Acquire the connection lock, giving up after `timeout`
///
/// `std::sync::Mutex` has no timed lock, so this polls `try_lock`. A poisoned
/// lock is recovered: the connection itself is still valid after a panic in
/// another thread.
pub(crate) fn acquire_lock_with_timeout<T>(
    mutex: &Mutex<T>,
    timeout: Duration,
) -> Result<MutexGuard<'_, T>, StoreError> {
    let start = Instant::now();

    loop {
        match mutex.try_lock() {
            Ok(guard) => return Ok(guard),
            Err(TryLockError::Poisoned(poisoned)) => {
                tracing::warn!("SQLite mutex was poisoned, recovering");
                return Ok(poisoned.into_inner());
            }
            Err(TryLockError::WouldBlock) => {
                if start.elapsed() >= timeout {
                    return Err(StoreError::Timeout(timeout.as_millis() as u64));
                }
                std::thread::sleep(LOCK_POLL_INTERVAL);
            }
        }
    }
}

/// Apply pragmas for concurrent access
///
/// WAL lets readers proceed during a write; `busy_timeout` bounds how long a
/// statement waits on a lock held by another connection.
pub(crate) fn configure_connection(conn: &Connection, timeout: Duration) -> Result<(), StoreError> {
    // journal_mode returns a row, and in-memory databases report "memory"
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(timeout)?;
    Ok(())
}
