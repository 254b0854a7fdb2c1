//! Connection and transaction seams used by the executor

use crate::error::DbResult;
use crate::table::DataTable;
use crate::value::{Param, SqlValue};

/// An open database connection.
///
/// Each call prepares a fresh statement; nothing is reused between calls.
/// Implementations are not expected to be safe for concurrent use.
pub trait SqlConnection {
    /// Execute a statement, returning the number of affected rows
    fn execute(&self, sql: &str, params: &[Param]) -> DbResult<usize>;

    /// First column of the first row, `None` when the result has no rows
    fn query_scalar(&self, sql: &str, params: &[Param]) -> DbResult<Option<SqlValue>>;

    /// Materialize the full result set
    fn query_table(&self, sql: &str, params: &[Param]) -> DbResult<DataTable>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// A caller-owned transaction the executor may roll back but never commits.
pub trait SqlTransaction {
    /// Roll back all work done in the transaction
    fn rollback(&self) -> DbResult<()>;

    /// Whether statements may still run inside this transaction
    fn is_active(&self) -> bool {
        true
    }
}

/// Opens a private connection for a single executor call.
pub trait Connector {
    type Connection: SqlConnection;

    fn connect(&self) -> DbResult<Self::Connection>;
}
