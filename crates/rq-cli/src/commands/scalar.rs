//! Scalar command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, StatementArgs};
use crate::commands::common::{display_value, open_session};

/// Execute the scalar command
pub fn execute(args: &StatementArgs, global: &GlobalArgs) -> Result<()> {
    let session = open_session(global)?;
    let value = session.executor.connect_execute_scalar(
        &session.connector,
        &args.sql,
        &args.params,
        args.retry,
    )?;

    match value {
        Some(value) => println!("{}", display_value(&value)),
        None => println!("(no rows)"),
    }
    Ok(())
}
