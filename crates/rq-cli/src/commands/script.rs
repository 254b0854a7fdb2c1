//! Script command implementation

use anyhow::{Context, Result};
use rq_db::DuckDbConnection;
use std::path::Path;

use crate::cli::{GlobalArgs, ScriptArgs};
use crate::commands::common::open_session;

/// Execute the script command
pub fn execute(args: &ScriptArgs, global: &GlobalArgs) -> Result<()> {
    let session = open_session(global)?;
    let script = Path::new(&args.file);

    if args.transaction {
        let conn = DuckDbConnection::open(&session.config.database.path)
            .context("Failed to open database")?;
        let tx = conn.begin()?;
        session
            .executor
            .execute_script(&conn, script, &args.params, Some(&tx), args.retry)?;
        tx.commit()?;
    } else {
        session.executor.connect_execute_script(
            &session.connector,
            script,
            &args.params,
            args.retry,
        )?;
    }

    println!("Executed {}", script.display());
    Ok(())
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
