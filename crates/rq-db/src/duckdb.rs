//! DuckDB connection backend

use crate::bind::bind_parameters;
use crate::error::{DbError, DbResult};
use crate::table::DataTable;
use crate::traits::{Connector, SqlConnection, SqlTransaction};
use crate::value::{Param, SqlValue};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime};
use duckdb::types::{TimeUnit, ToSql, ToSqlOutput, Value};
use duckdb::{params_from_iter, Connection};
use std::cell::Cell;
use std::path::Path;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// DuckDB connection.
///
/// Not shareable across threads; callers that need concurrency open one
/// connection per worker.
pub struct DuckDbConnection {
    conn: Connection,
}

impl DuckDbConnection {
    /// Open a new in-memory database
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open (or create) a database file
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Open from a path string (handles the `:memory:` special case)
    pub fn open(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Start a transaction. Statements issued on this connection run inside
    /// it until it is committed or rolled back.
    pub fn begin(&self) -> DbResult<DuckDbTransaction<'_>> {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        Ok(DuckDbTransaction {
            conn: &self.conn,
            state: Cell::new(TxState::Active),
        })
    }
}

fn execution_error(err: duckdb::Error, sql: &str) -> DbError {
    DbError::ExecutionError(format!("{err}: {sql}"))
}

impl SqlConnection for DuckDbConnection {
    fn execute(&self, sql: &str, params: &[Param]) -> DbResult<usize> {
        let bound = bind_parameters(sql, params);
        let mut stmt = self
            .conn
            .prepare(&bound.sql)
            .map_err(|e| execution_error(e, sql))?;
        stmt.execute(params_from_iter(bound.values.iter().copied()))
            .map_err(|e| execution_error(e, sql))
    }

    fn query_scalar(&self, sql: &str, params: &[Param]) -> DbResult<Option<SqlValue>> {
        let bound = bind_parameters(sql, params);
        let mut stmt = self
            .conn
            .prepare(&bound.sql)
            .map_err(|e| execution_error(e, sql))?;
        let mut rows = stmt
            .query(params_from_iter(bound.values.iter().copied()))
            .map_err(|e| execution_error(e, sql))?;

        match rows.next().map_err(|e| execution_error(e, sql))? {
            Some(row) => {
                let value: Value = row.get(0).map_err(|e| execution_error(e, sql))?;
                Ok(Some(from_duckdb_value(value)))
            }
            None => Ok(None),
        }
    }

    fn query_table(&self, sql: &str, params: &[Param]) -> DbResult<DataTable> {
        let bound = bind_parameters(sql, params);
        let mut stmt = self
            .conn
            .prepare(&bound.sql)
            .map_err(|e| execution_error(e, sql))?;

        // DuckDB panics on `stmt.column_count()` before execution, so rows are
        // collected first and column metadata read afterwards.
        let rows: Vec<Vec<SqlValue>> = stmt
            .query_map(params_from_iter(bound.values.iter().copied()), |row| {
                let col_count = row.as_ref().column_count();
                (0..col_count)
                    .map(|i| row.get::<_, Value>(i).map(from_duckdb_value))
                    .collect::<duckdb::Result<Vec<SqlValue>>>()
            })
            .map_err(|e| execution_error(e, sql))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| execution_error(e, sql))?;

        let column_count = stmt.column_count();
        let names: Vec<String> = (0..column_count)
            .map(|i| {
                stmt.column_name(i)
                    .map_or("?".to_string(), |v| v.to_string())
            })
            .collect();

        Ok(DataTable::new(names, rows))
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    Active,
    Committed,
    RolledBack,
}

/// Explicit transaction on a [`DuckDbConnection`].
///
/// Dropping an unfinished transaction rolls it back.
pub struct DuckDbTransaction<'c> {
    conn: &'c Connection,
    state: Cell<TxState>,
}

impl DuckDbTransaction<'_> {
    /// Commit the transaction.
    ///
    /// Fails with [`DbError::TransactionAborted`] if an earlier failure already
    /// rolled it back.
    pub fn commit(self) -> DbResult<()> {
        if self.state.get() != TxState::Active {
            return Err(DbError::TransactionAborted);
        }
        self.state.set(TxState::Committed);
        if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
            let _ = self.conn.execute_batch("ROLLBACK");
            return Err(DbError::TransactionError(format!(
                "COMMIT failed: {commit_err}"
            )));
        }
        Ok(())
    }
}

impl SqlTransaction for DuckDbTransaction<'_> {
    fn rollback(&self) -> DbResult<()> {
        if self.state.get() != TxState::Active {
            return Ok(());
        }
        self.state.set(TxState::RolledBack);
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }

    fn is_active(&self) -> bool {
        self.state.get() == TxState::Active
    }
}

impl Drop for DuckDbTransaction<'_> {
    fn drop(&mut self) {
        if self.state.get() == TxState::Active {
            log::debug!("Rolling back unfinished transaction on drop");
            let _ = self.conn.execute_batch("ROLLBACK");
        }
    }
}

/// Opens a fresh [`DuckDbConnection`] per executor call.
#[derive(Debug, Clone)]
pub struct DuckDbConnector {
    path: String,
}

impl DuckDbConnector {
    /// `path` is a database file or `:memory:`
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Connector for DuckDbConnector {
    type Connection = DuckDbConnection;

    fn connect(&self) -> DbResult<DuckDbConnection> {
        DuckDbConnection::open(&self.path)
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        let value = match self {
            SqlValue::Null => Value::Null,
            SqlValue::Bool(b) => Value::Boolean(*b),
            SqlValue::Int(i) => Value::BigInt(*i),
            SqlValue::Float(f) => Value::Double(*f),
            SqlValue::Text(s) => Value::Text(s.clone()),
            SqlValue::Blob(b) => Value::Blob(b.clone()),
            SqlValue::Date(d) => Value::Date32(d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE),
            SqlValue::Timestamp(ts) => {
                Value::Timestamp(TimeUnit::Microsecond, ts.and_utc().timestamp_micros())
            }
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

fn timestamp_micros(unit: TimeUnit, raw: i64) -> i64 {
    match unit {
        TimeUnit::Second => raw.saturating_mul(1_000_000),
        TimeUnit::Millisecond => raw.saturating_mul(1_000),
        TimeUnit::Microsecond => raw,
        TimeUnit::Nanosecond => raw / 1_000,
    }
}

/// Map a DuckDB value onto [`SqlValue`]. Decimals become floats; times,
/// intervals and nested types are carried as text.
fn from_duckdb_value(value: Value) -> SqlValue {
    match scalar_value(value) {
        Ok(scalar) => scalar,
        Err(other) => SqlValue::Text(value_text(&other)),
    }
}

/// Values with a direct [`SqlValue`] counterpart; anything else is handed back.
fn scalar_value(value: Value) -> Result<SqlValue, Value> {
    let scalar = match value {
        Value::Null => SqlValue::Null,
        Value::Boolean(b) => SqlValue::Bool(b),
        Value::TinyInt(i) => SqlValue::Int(i64::from(i)),
        Value::SmallInt(i) => SqlValue::Int(i64::from(i)),
        Value::Int(i) => SqlValue::Int(i64::from(i)),
        Value::BigInt(i) => SqlValue::Int(i),
        Value::UTinyInt(i) => SqlValue::Int(i64::from(i)),
        Value::USmallInt(i) => SqlValue::Int(i64::from(i)),
        Value::UInt(i) => SqlValue::Int(i64::from(i)),
        Value::UBigInt(i) => i64::try_from(i)
            .map(SqlValue::Int)
            .unwrap_or_else(|_| SqlValue::Text(i.to_string())),
        Value::HugeInt(i) => i64::try_from(i)
            .map(SqlValue::Int)
            .unwrap_or_else(|_| SqlValue::Text(i.to_string())),
        Value::UHugeInt(i) => i64::try_from(i)
            .map(SqlValue::Int)
            .unwrap_or_else(|_| SqlValue::Text(i.to_string())),
        Value::Float(f) => SqlValue::Float(f64::from(f)),
        Value::Double(f) => SqlValue::Float(f),
        Value::Decimal(d) => {
            let text = d.to_string();
            match text.parse::<f64>() {
                Ok(f) => SqlValue::Float(f),
                Err(_) => SqlValue::Text(text),
            }
        }
        Value::Text(s) | Value::Enum(s) => SqlValue::Text(s),
        Value::Blob(b) | Value::Geometry(b) => SqlValue::Blob(b),
        Value::Date32(days) => match infinity_text(i64::from(days), i64::from(i32::MAX)) {
            Some(text) => SqlValue::Text(text.to_string()),
            None => days
                .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                .and_then(NaiveDate::from_num_days_from_ce_opt)
                .map_or(SqlValue::Int(i64::from(days)), SqlValue::Date),
        },
        Value::Timestamp(unit, raw) => match infinity_text(raw, i64::MAX) {
            Some(text) => SqlValue::Text(text.to_string()),
            None => DateTime::from_timestamp_micros(timestamp_micros(unit, raw))
                .map_or(SqlValue::Int(raw), |dt| SqlValue::Timestamp(dt.naive_utc())),
        },
        Value::Union(inner) => from_duckdb_value(*inner),
        other => return Err(other),
    };
    Ok(scalar)
}

/// DuckDB stores `infinity` / `-infinity` as the largest magnitude of the
/// underlying integer.
fn infinity_text(raw: i64, max: i64) -> Option<&'static str> {
    if raw == max {
        Some("infinity")
    } else if raw == -max {
        Some("-infinity")
    } else {
        None
    }
}

/// Text rendering used for values without a [`SqlValue`] counterpart and for
/// the elements nested inside them.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Time64(unit, raw) => time_text(*unit, *raw),
        Value::Interval {
            months,
            days,
            nanos,
        } => interval_text(*months, *days, *nanos),
        Value::List(items) | Value::Array(items) => {
            let items: Vec<String> = items.iter().map(value_text).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Struct(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(name, v)| format!("'{name}': {}", value_text(v)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        Value::Map(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}={}", value_text(k), value_text(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Value::Union(inner) => value_text(inner),
        other => match scalar_value(other.clone()) {
            Ok(scalar) => scalar.invariant_text(),
            Err(unknown) => format!("{unknown:?}"),
        },
    }
}

/// `HH:MM:SS[.ffffff]`
fn time_text(unit: TimeUnit, raw: i64) -> String {
    let micros = timestamp_micros(unit, raw);
    let secs = micros.div_euclid(1_000_000);
    let nanos = micros.rem_euclid(1_000_000) * 1_000;
    u32::try_from(secs)
        .ok()
        .zip(u32::try_from(nanos).ok())
        .and_then(|(secs, nanos)| NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos))
        .map_or_else(|| raw.to_string(), |t| t.format("%H:%M:%S%.f").to_string())
}

/// ISO 8601 duration, e.g. `P1M2DT3.5S`
fn interval_text(months: i32, days: i32, nanos: i64) -> String {
    let mut out = String::from("P");
    if months != 0 {
        out.push_str(&format!("{months}M"));
    }
    if days != 0 {
        out.push_str(&format!("{days}D"));
    }
    if nanos != 0 || out.len() == 1 {
        let sign = if nanos < 0 { "-" } else { "" };
        let abs = nanos.unsigned_abs();
        let (secs, frac) = (abs / 1_000_000_000, abs % 1_000_000_000);
        out.push_str(&format!("T{sign}{secs}"));
        if frac != 0 {
            let digits = format!("{frac:09}");
            out.push('.');
            out.push_str(digits.trim_end_matches('0'));
        }
        out.push('S');
    }
    out
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
