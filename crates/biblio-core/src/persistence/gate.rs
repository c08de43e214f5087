//! Serialized access to the single shared connection
//!
//! Every statement runs while holding the gate, and each closure collects its
//! rows before returning, so no two statements ever interleave on the
//! connection. The tokio mutex hands the gate out in FIFO order.

use std::sync::Arc;
use std::time::Duration;

use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::error::{BiblioError, Result};

/// Owner of the one `rusqlite::Connection`
#[derive(Clone)]
pub struct ConnectionGate {
    conn: Arc<Mutex<Connection>>,
    lock_timeout: Duration,
}

impl ConnectionGate {
    pub fn new(conn: Connection, lock_timeout: Duration) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            lock_timeout,
        }
    }

    /// Run `f` with exclusive use of the connection.
    ///
    /// Waits at most `lock_timeout` for the gate. Once acquired, `f` runs to
    /// completion on the blocking pool even if the caller stops waiting, and the
    /// gate is released only after it returns.
    pub async fn run<T, F>(&self, label: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let acquire = Arc::clone(&self.conn).lock_owned();
        let mut guard = match tokio::time::timeout(self.lock_timeout, acquire).await {
            Ok(guard) => guard,
            Err(_) => {
                tracing::warn!(
                    operation = label,
                    timeout_ms = self.lock_timeout.as_millis() as u64,
                    "timed out waiting for database connection"
                );
                return Err(BiblioError::Timeout(self.lock_timeout));
            }
        };

        tracing::debug!(operation = label, "running statement");
        tokio::task::spawn_blocking(move || f(&mut *guard))
            .await
            .map_err(|e| BiblioError::Storage(format!("{}: worker failed: {}", label, e)))?
    }
}
