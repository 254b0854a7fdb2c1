//! Builders for common DDL/DML statements.
//!
//! Identifiers are double-quoted with embedded quotes doubled. Values are
//! never inlined: row statements reference `@column` placeholders that the
//! executor binds from the matching [`Param`]s.

use crate::table::DataTable;
use crate::value::{Param, SqlValue};

/// Which columns form the WHERE clause of a generated insert/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFilter {
    /// No WHERE clause
    None,
    /// Match on the first non-excluded column
    FirstColumn,
    /// Match on the listed columns, whether or not they are written
    Columns(Vec<String>),
}

/// Double-quote an identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn placeholder(column: &str) -> String {
    format!("@{column}")
}

pub fn primary_key(table: &str, column: &str) -> String {
    format!(
        "ALTER TABLE {} ADD PRIMARY KEY ({});",
        quote_ident(table),
        quote_ident(column)
    )
}

/// `CREATE INDEX "<table>_<column>_IDX" ON "<table>" ("<column>");`
pub fn create_index(table: &str, column: &str) -> String {
    format!(
        "CREATE INDEX {} ON {} ({});",
        quote_ident(&format!("{table}_{column}_IDX")),
        quote_ident(table),
        quote_ident(column)
    )
}

pub fn add_column(table: &str, column: &str, column_type: &str) -> String {
    format!(
        "ALTER TABLE {} ADD COLUMN {} {};",
        quote_ident(table),
        quote_ident(column),
        column_type
    )
}

pub fn truncate(table: &str) -> String {
    format!("TRUNCATE {};", quote_ident(table))
}

fn written_columns<'a>(columns: &'a [String], exclude: &[&str]) -> Vec<&'a str> {
    columns
        .iter()
        .map(String::as_str)
        .filter(|c| !exclude.contains(c))
        .collect()
}

fn key_condition(written: &[&str], key: &KeyFilter) -> Option<String> {
    let keys: Vec<&str> = match key {
        KeyFilter::None => return None,
        KeyFilter::FirstColumn => written.first().copied().into_iter().collect(),
        KeyFilter::Columns(cols) => cols.iter().map(String::as_str).collect(),
    };
    if keys.is_empty() {
        return None;
    }
    Some(
        keys.iter()
            .map(|k| format!("{} = {}", quote_ident(k), placeholder(k)))
            .collect::<Vec<_>>()
            .join(" AND "),
    )
}

/// Insert one row unless a row matching `key` already exists.
///
/// With [`KeyFilter::None`] the insert is unconditional.
pub fn insert_if_absent(
    table: &str,
    columns: &[String],
    key: &KeyFilter,
    exclude: &[&str],
) -> String {
    let written = written_columns(columns, exclude);
    let column_list = written
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let value_list = written
        .iter()
        .map(|c| placeholder(c))
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!(
        "INSERT INTO {} ({}) SELECT {}",
        quote_ident(table),
        column_list,
        value_list
    );
    if let Some(condition) = key_condition(&written, key) {
        sql.push_str(&format!(
            " WHERE NOT EXISTS (SELECT 1 FROM {} WHERE {})",
            quote_ident(table),
            condition
        ));
    }
    sql.push(';');
    sql
}

/// Update the rows matching `key`, or every row with [`KeyFilter::None`].
pub fn update(table: &str, columns: &[String], key: &KeyFilter, exclude: &[&str]) -> String {
    let written = written_columns(columns, exclude);
    let assignments = written
        .iter()
        .map(|c| format!("{} = {}", quote_ident(c), placeholder(c)))
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!("UPDATE {} SET {}", quote_ident(table), assignments);
    if let Some(condition) = key_condition(&written, key) {
        sql.push_str(" WHERE ");
        sql.push_str(&condition);
    }
    sql.push(';');
    sql
}

/// `@column` parameters for one row of a table, skipping `exclude`.
///
/// Returns an empty list when `row` is out of range.
pub fn params_from_row(table: &DataTable, row: usize, exclude: &[&str]) -> Vec<Param> {
    let Some(cells) = table.rows().get(row) else {
        return Vec::new();
    };
    table
        .columns()
        .iter()
        .zip(cells)
        .filter(|(col, _)| !exclude.contains(&col.name.as_str()))
        .map(|(col, cell)| Param::new(placeholder(&col.name), cell.clone()))
        .collect()
}

/// `@column` parameters from name/value pairs, skipping `exclude`.
pub fn params_from_pairs<'a, I>(pairs: I, exclude: &[&str]) -> Vec<Param>
where
    I: IntoIterator<Item = (&'a str, SqlValue)>,
{
    pairs
        .into_iter()
        .filter(|(name, _)| !exclude.contains(name))
        .map(|(name, value)| Param::new(placeholder(name), value))
        .collect()
}

#[cfg(test)]
#[path = "sql_builder_test.rs"]
mod tests;
