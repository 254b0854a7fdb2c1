//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use rq_db::{Param, SqlValue};

/// rq - run SQL through the retrying query executor
#[derive(Parser, Debug)]
#[command(name = "rq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (debug logging, including reconstructed SQL)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: rq.yml or rq.yaml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Database path or :memory:, overrides the config file
    #[arg(short, long, global = true, env = "RQ_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the first column of the first row
    Scalar(StatementArgs),

    /// Execute a statement and print the affected row count
    Exec(ExecArgs),

    /// Execute a query and print the result set
    Query(QueryArgs),

    /// Execute every `;`-terminated statement of a script file
    Script(ScriptArgs),

    /// Print a statement with its parameters inlined, without executing it
    DebugSql(DebugSqlArgs),
}

/// Statement text plus parameters and retry flag
#[derive(Args, Debug)]
pub struct StatementArgs {
    /// SQL statement
    pub sql: String,

    /// Parameter as name=value (repeatable); `@` is prefixed when missing
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    pub params: Vec<Param>,

    /// Retry failed attempts per the configured policy
    #[arg(long)]
    pub retry: bool,
}

/// Arguments for the exec command
#[derive(Args, Debug)]
pub struct ExecArgs {
    #[command(flatten)]
    pub statement: StatementArgs,

    /// Run inside a transaction committed on success
    #[arg(long)]
    pub transaction: bool,
}

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub statement: StatementArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Query output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table
    Table,
    /// JSON array of row objects
    Json,
}

/// Arguments for the script command
#[derive(Args, Debug)]
pub struct ScriptArgs {
    /// Path to the SQL script
    pub file: String,

    /// Parameter as name=value (repeatable), shared by every statement
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    pub params: Vec<Param>,

    /// Retry failed statements per the configured policy
    #[arg(long)]
    pub retry: bool,

    /// Run the whole script inside a transaction committed on success
    #[arg(long)]
    pub transaction: bool,
}

/// Arguments for the debug-sql command
#[derive(Args, Debug)]
pub struct DebugSqlArgs {
    /// SQL statement
    pub sql: String,

    /// Parameter as name=value (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    pub params: Vec<Param>,
}

/// Parse `name=value` into a [`Param`].
///
/// Values are read as `null`, `true`/`false`, an integer, a float, or text.
/// Wrap a value in single quotes to force text.
pub(crate) fn parse_param(raw: &str) -> Result<Param, String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() || name == "@" {
        return Err(format!("parameter name is empty in '{raw}'"));
    }
    let name = if name.starts_with('@') {
        name.to_string()
    } else {
        format!("@{name}")
    };
    Ok(Param::new(name, parse_value(value)))
}

fn parse_value(raw: &str) -> SqlValue {
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return SqlValue::Text(raw[1..raw.len() - 1].to_string());
    }
    match raw {
        "null" | "NULL" => return SqlValue::Null,
        "true" => return SqlValue::Bool(true),
        "false" => return SqlValue::Bool(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return SqlValue::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return SqlValue::Float(f);
        }
    }
    SqlValue::Text(raw.to_string())
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
