//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use rq_db::{DataTable, DuckDbConnector, ExecutorConfig, QueryExecutor, SqlValue};
use std::path::Path;

use crate::cli::GlobalArgs;

/// Resolved config, executor and connector for one invocation.
pub(crate) struct Session {
    pub config: ExecutorConfig,
    pub executor: QueryExecutor,
    pub connector: DuckDbConnector,
}

/// Install the env_logger backend. `--verbose` forces debug level,
/// otherwise `RUST_LOG` applies with a default of `warn`.
pub(crate) fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    let _ = builder.format_timestamp_millis().try_init();
}

/// Load the executor config named by `--config`, else `rq.yml`/`rq.yaml`
/// in the working directory, else defaults. `--database` overrides the path.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<ExecutorConfig> {
    let mut config = match &global.config {
        Some(path) => ExecutorConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config from {path}"))?,
        None if Path::new("rq.yml").exists() || Path::new("rq.yaml").exists() => {
            ExecutorConfig::load_from_dir(Path::new(".")).context("Failed to load rq.yml")?
        }
        None => ExecutorConfig::default(),
    };

    if let Some(database) = &global.database {
        config.database.path = database.clone();
    }
    Ok(config)
}

/// Build the session shared by every database-touching command.
pub(crate) fn open_session(global: &GlobalArgs) -> Result<Session> {
    let config = load_config(global)?;
    log::debug!(
        "Using database {} (max attempts {}, delay {}ms)",
        config.database.path,
        config.retry.max_attempts,
        config.retry.delay_ms
    );
    Ok(Session {
        executor: QueryExecutor::from_config(&config),
        connector: DuckDbConnector::new(config.database.path.clone()),
        config,
    })
}

/// Text for a single value as printed by the CLI.
pub(crate) fn display_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        other => other.invariant_text(),
    }
}

/// Render a result set as an aligned text table.
pub(crate) fn render_table(table: &DataTable) -> String {
    let headers: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(display_value).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out.push_str(&format!("({} row(s))", table.row_count()));
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
