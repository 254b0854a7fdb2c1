//! Debug-sql command implementation

use anyhow::Result;
use rq_db::query_to_debug_string;

use crate::cli::DebugSqlArgs;

/// Execute the debug-sql command
pub fn execute(args: &DebugSqlArgs) -> Result<()> {
    println!("{}", query_to_debug_string(&args.sql, &args.params));
    Ok(())
}
