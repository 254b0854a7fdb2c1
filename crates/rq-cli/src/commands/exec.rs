//! Exec command implementation

use anyhow::{Context, Result};
use rq_db::DuckDbConnection;

use crate::cli::{ExecArgs, GlobalArgs};
use crate::commands::common::open_session;

/// Execute the exec command
pub fn execute(args: &ExecArgs, global: &GlobalArgs) -> Result<()> {
    let session = open_session(global)?;
    let stmt = &args.statement;

    let affected = if args.transaction {
        let conn = DuckDbConnection::open(&session.config.database.path)
            .context("Failed to open database")?;
        let tx = conn.begin()?;
        let affected = session.executor.execute_non_query(
            &conn,
            &stmt.sql,
            &stmt.params,
            Some(&tx),
            stmt.retry,
        )?;
        tx.commit()?;
        affected
    } else {
        session.executor.connect_execute_non_query(
            &session.connector,
            &stmt.sql,
            &stmt.params,
            stmt.retry,
        )?
    };

    println!("{affected} row(s) affected");
    Ok(())
}
