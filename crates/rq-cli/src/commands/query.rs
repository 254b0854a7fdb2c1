//! Query command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, OutputFormat, QueryArgs};
use crate::commands::common::{open_session, render_table};

/// Execute the query command
pub fn execute(args: &QueryArgs, global: &GlobalArgs) -> Result<()> {
    let session = open_session(global)?;
    let stmt = &args.statement;
    let table = session.executor.connect_execute_tabular(
        &session.connector,
        &stmt.sql,
        &stmt.params,
        stmt.retry,
    )?;

    match args.output {
        OutputFormat::Table => println!("{}", render_table(&table)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table.to_json())?),
    }
    Ok(())
}
