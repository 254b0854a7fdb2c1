//! Shared test utilities for rq-db

use crate::error::{DbError, DbResult};
use crate::retry::Sleeper;
use crate::table::DataTable;
use crate::traits::{Connector, SqlConnection, SqlTransaction};
use crate::value::{Param, SqlValue};
use std::cell::{Cell, RefCell};
use std::sync::{Mutex, Once};
use std::time::Duration;

/// Connection that fails its first `fail_first` calls, then succeeds with
/// canned results. Records every SQL text it receives.
pub(crate) struct ScriptedConnection {
    fail_first: u32,
    calls: Cell<u32>,
    executed: RefCell<Vec<String>>,
}

impl ScriptedConnection {
    pub(crate) fn failing_first(fail_first: u32) -> Self {
        Self {
            fail_first,
            calls: Cell::new(0),
            executed: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn always_failing() -> Self {
        Self::failing_first(u32::MAX)
    }

    pub(crate) fn healthy() -> Self {
        Self::failing_first(0)
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.get()
    }

    pub(crate) fn executed(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }

    fn attempt(&self, sql: &str) -> DbResult<()> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        self.executed.borrow_mut().push(sql.to_string());
        if n <= self.fail_first {
            Err(DbError::ExecutionError(format!("simulated failure #{n}")))
        } else {
            Ok(())
        }
    }
}

impl SqlConnection for ScriptedConnection {
    fn execute(&self, sql: &str, _params: &[Param]) -> DbResult<usize> {
        self.attempt(sql).map(|_| 1)
    }

    fn query_scalar(&self, sql: &str, _params: &[Param]) -> DbResult<Option<SqlValue>> {
        self.attempt(sql).map(|_| Some(SqlValue::Int(42)))
    }

    fn query_table(&self, sql: &str, _params: &[Param]) -> DbResult<DataTable> {
        self.attempt(sql)
            .map(|_| DataTable::new(vec!["n".into()], vec![vec![SqlValue::Int(1)]]))
    }

    fn db_type(&self) -> &'static str {
        "scripted"
    }
}

/// Transaction that counts rollbacks.
#[derive(Default)]
pub(crate) struct CountingTransaction {
    rollbacks: Cell<u32>,
    fail_rollback: bool,
}

impl CountingTransaction {
    pub(crate) fn with_failing_rollback() -> Self {
        Self {
            rollbacks: Cell::new(0),
            fail_rollback: true,
        }
    }

    pub(crate) fn rollbacks(&self) -> u32 {
        self.rollbacks.get()
    }
}

impl SqlTransaction for CountingTransaction {
    fn rollback(&self) -> DbResult<()> {
        self.rollbacks.set(self.rollbacks.get() + 1);
        if self.fail_rollback {
            return Err(DbError::TransactionError("simulated rollback failure".into()));
        }
        Ok(())
    }
}

/// Sleeper that records requested pauses instead of sleeping.
#[derive(Default)]
pub(crate) struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Connector that counts how many connections it opened.
#[derive(Default)]
pub(crate) struct CountingConnector {
    opened: Cell<u32>,
    fail_first: u32,
}

impl CountingConnector {
    pub(crate) fn failing_statements(fail_first: u32) -> Self {
        Self {
            opened: Cell::new(0),
            fail_first,
        }
    }

    pub(crate) fn opened(&self) -> u32 {
        self.opened.get()
    }
}

impl Connector for CountingConnector {
    type Connection = ScriptedConnection;

    fn connect(&self) -> DbResult<ScriptedConnection> {
        self.opened.set(self.opened.get() + 1);
        Ok(ScriptedConnection::failing_first(self.fail_first))
    }
}

/// `log` backend that keeps records emitted on the current thread, so tests
/// running in parallel see only their own output.
struct ThreadCaptureLogger;

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

static CAPTURE_LOGGER: ThreadCaptureLogger = ThreadCaptureLogger;
static INSTALL_LOGGER: Once = Once::new();

impl log::Log for ThreadCaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        CAPTURED.with(|c| {
            c.borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

/// Run `f` and return its result with every log record it emitted.
pub(crate) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<(log::Level, String)>) {
    INSTALL_LOGGER.call_once(|| {
        if log::set_logger(&CAPTURE_LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
    CAPTURED.with(|c| c.borrow_mut().clear());
    let out = f();
    let records = CAPTURED.with(|c| c.borrow_mut().drain(..).collect());
    (out, records)
}
