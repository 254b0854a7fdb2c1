//! Retrying query executor.
//!
//! Every operation runs inside the same loop: log the reconstructed SQL,
//! attempt the statement on a fresh prepared statement, and on failure roll
//! back the caller's transaction (if any), log, sleep and try again until the
//! [`RetryPolicy`] is exhausted. The last failure is returned wrapped in
//! [`DbError::Escalated`] with the original error as its source.
//!
//! Two entry-point families exist:
//! - shared connection: the caller owns the connection and transaction; the
//!   executor never opens, closes or commits them, and only rolls back on
//!   failure.
//! - `connect_*`: the executor opens a private connection through a
//!   [`Connector`] for one call and drops it on every exit path.

use crate::config::ExecutorConfig;
use crate::debug_sql::query_to_debug_string;
use crate::error::{DbError, DbResult};
use crate::retry::{FixedDelay, RetryPolicy, Sleeper, ThreadSleeper};
use crate::script::{LineSemicolonSplitter, StatementSplitter};
use crate::table::DataTable;
use crate::traits::{Connector, SqlConnection, SqlTransaction};
use crate::value::{Param, SqlValue};
use std::path::Path;
use std::sync::Arc;

/// Executes statements with uniform retry and rollback semantics.
#[derive(Clone)]
pub struct QueryExecutor {
    policy: Arc<dyn RetryPolicy>,
    sleeper: Arc<dyn Sleeper>,
    splitter: Arc<dyn StatementSplitter>,
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("max_attempts", &self.policy.max_attempts())
            .finish_non_exhaustive()
    }
}

impl QueryExecutor {
    /// Three attempts, 20 s apart, line/semicolon script splitting.
    pub fn new() -> Self {
        Self {
            policy: Arc::new(FixedDelay::default()),
            sleeper: Arc::new(ThreadSleeper),
            splitter: Arc::new(LineSemicolonSplitter),
        }
    }

    /// Build an executor whose retry policy comes from `config.retry`.
    pub fn from_config(config: &ExecutorConfig) -> Self {
        Self::new().with_policy(Arc::new(config.retry.policy()))
    }

    pub fn with_policy(mut self, policy: Arc<dyn RetryPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_splitter(mut self, splitter: Arc<dyn StatementSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    // ── Shared connection ──────────────────────────────────────────────

    /// First column of the first row, `None` when the statement yields no rows.
    pub fn execute_scalar<C: SqlConnection + ?Sized>(
        &self,
        conn: &C,
        sql: &str,
        params: &[Param],
        tx: Option<&dyn SqlTransaction>,
        retry: bool,
    ) -> DbResult<Option<SqlValue>> {
        self.run_with_retry(sql, params, tx, retry, || conn.query_scalar(sql, params))
    }

    /// Number of rows affected by the statement.
    pub fn execute_non_query<C: SqlConnection + ?Sized>(
        &self,
        conn: &C,
        sql: &str,
        params: &[Param],
        tx: Option<&dyn SqlTransaction>,
        retry: bool,
    ) -> DbResult<usize> {
        self.run_with_retry(sql, params, tx, retry, || conn.execute(sql, params))
    }

    /// Full result set materialized as a [`DataTable`].
    pub fn execute_tabular<C: SqlConnection + ?Sized>(
        &self,
        conn: &C,
        sql: &str,
        params: &[Param],
        tx: Option<&dyn SqlTransaction>,
        retry: bool,
    ) -> DbResult<DataTable> {
        self.run_with_retry(sql, params, tx, retry, || conn.query_table(sql, params))
    }

    /// Run every statement of a script file through
    /// [`execute_non_query`](Self::execute_non_query), stopping at the first
    /// statement that fails.
    pub fn execute_script<C: SqlConnection + ?Sized>(
        &self,
        conn: &C,
        script: &Path,
        params: &[Param],
        tx: Option<&dyn SqlTransaction>,
        retry: bool,
    ) -> DbResult<()> {
        let text = std::fs::read_to_string(script).map_err(|e| {
            let err = DbError::ScriptRead {
                path: script.display().to_string(),
                source: e,
            };
            log::error!("{}", err);
            err
        })?;

        let statements = self.splitter.split(&text);
        log::debug!(
            "Executing {} statement(s) from {}",
            statements.len(),
            script.display()
        );
        for statement in &statements {
            self.execute_non_query(conn, statement, params, tx, retry)?;
        }
        Ok(())
    }

    // ── Single connection per call ─────────────────────────────────────

    pub fn connect_execute_scalar<K: Connector>(
        &self,
        connector: &K,
        sql: &str,
        params: &[Param],
        retry: bool,
    ) -> DbResult<Option<SqlValue>> {
        let conn = connector.connect()?;
        self.execute_scalar(&conn, sql, params, None, retry)
    }

    pub fn connect_execute_non_query<K: Connector>(
        &self,
        connector: &K,
        sql: &str,
        params: &[Param],
        retry: bool,
    ) -> DbResult<usize> {
        let conn = connector.connect()?;
        self.execute_non_query(&conn, sql, params, None, retry)
    }

    pub fn connect_execute_tabular<K: Connector>(
        &self,
        connector: &K,
        sql: &str,
        params: &[Param],
        retry: bool,
    ) -> DbResult<DataTable> {
        let conn = connector.connect()?;
        self.execute_tabular(&conn, sql, params, None, retry)
    }

    pub fn connect_execute_script<K: Connector>(
        &self,
        connector: &K,
        script: &Path,
        params: &[Param],
        retry: bool,
    ) -> DbResult<()> {
        let conn = connector.connect()?;
        self.execute_script(&conn, script, params, None, retry)
    }

    // ── Retry loop ─────────────────────────────────────────────────────

    fn run_with_retry<T>(
        &self,
        sql: &str,
        params: &[Param],
        tx: Option<&dyn SqlTransaction>,
        retry: bool,
        mut attempt_once: impl FnMut() -> DbResult<T>,
    ) -> DbResult<T> {
        let max_attempts = if retry { self.policy.max_attempts().max(1) } else { 1 };
        let mut attempt = 1;

        loop {
            if log::log_enabled!(log::Level::Debug) {
                log::debug!("{}", query_to_debug_string(sql, params));
            }

            let result = match tx {
                Some(t) if !t.is_active() => Err(DbError::TransactionAborted),
                _ => attempt_once(),
            };

            let err = match result {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if let Some(t) = tx {
                if let Err(rollback_err) = t.rollback() {
                    log::warn!("Rollback after failed attempt also failed: {}", rollback_err);
                }
            }
            log::error!("Attempt {}/{} failed: {}", attempt, max_attempts, err);

            // A rolled-back transaction cannot host another attempt
            let tx_usable = tx.map_or(true, |t| t.is_active());
            if attempt < max_attempts && err.is_retryable() && tx_usable {
                self.sleeper.sleep(self.policy.delay_after(attempt));
                attempt += 1;
                continue;
            }

            return Err(DbError::Escalated {
                attempts: attempt,
                source: Box::new(err),
            });
        }
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
