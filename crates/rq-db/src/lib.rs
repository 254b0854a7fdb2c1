//! rq-db - Retrying query executor
//!
//! Runs SQL statements and scripts against a relational database with a
//! bounded retry policy, transaction-aware rollback on failure, and a
//! debug-log rendering of each statement with its parameters inlined.
//! DuckDB is the bundled backend; other drivers plug in through the
//! [`SqlConnection`], [`SqlTransaction`] and [`Connector`] traits.

pub(crate) mod bind;
pub mod config;
pub mod debug_sql;
pub mod duckdb;
pub mod error;
pub mod executor;
pub mod retry;
pub mod script;
pub mod sql_builder;
pub mod table;
pub mod traits;
pub mod value;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{DatabaseConfig, ExecutorConfig, RetryConfig};
pub use debug_sql::query_to_debug_string;
pub use self::duckdb::{DuckDbConnection, DuckDbConnector, DuckDbTransaction};
pub use error::{DbError, DbResult};
pub use executor::QueryExecutor;
pub use retry::{FixedDelay, RetryPolicy, Sleeper, ThreadSleeper};
pub use script::{LineSemicolonSplitter, StatementSplitter};
pub use sql_builder::KeyFilter;
pub use table::{ColumnType, DataColumn, DataTable};
pub use traits::{Connector, SqlConnection, SqlTransaction};
pub use value::{Param, SqlValue};
