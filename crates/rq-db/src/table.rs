//! In-memory tabular result sets.

use crate::error::{DbError, DbResult};
use crate::value::SqlValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Column type inferred from the values a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// No non-null value seen
    #[default]
    Unknown,
    Bool,
    Int,
    Float,
    Text,
    Blob,
    Date,
    Timestamp,
}

impl ColumnType {
    /// Type of a single value, `None` for NULL.
    pub fn of(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Null => None,
            SqlValue::Bool(_) => Some(ColumnType::Bool),
            SqlValue::Int(_) => Some(ColumnType::Int),
            SqlValue::Float(_) => Some(ColumnType::Float),
            SqlValue::Text(_) => Some(ColumnType::Text),
            SqlValue::Blob(_) => Some(ColumnType::Blob),
            SqlValue::Date(_) => Some(ColumnType::Date),
            SqlValue::Timestamp(_) => Some(ColumnType::Timestamp),
        }
    }

    /// Widen two observed types. Int and Float widen to Float, any other
    /// disagreement falls back to Text.
    fn merge(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (ColumnType::Unknown, t) | (t, ColumnType::Unknown) => t,
            (a, b) if a == b => a,
            (ColumnType::Int, ColumnType::Float) | (ColumnType::Float, ColumnType::Int) => {
                ColumnType::Float
            }
            _ => ColumnType::Text,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Unknown => "unknown",
            ColumnType::Bool => "bool",
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::Blob => "blob",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataColumn {
    pub name: String,
    pub data_type: ColumnType,
}

/// Ordered columns plus ordered rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DataTable {
    columns: Vec<DataColumn>,
    rows: Vec<Vec<SqlValue>>,
}

impl DataTable {
    /// Build a table from column names and rows, inferring column types.
    ///
    /// Rows shorter than the header are padded with NULL; extra cells are
    /// dropped.
    pub fn new(names: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        let width = names.len();
        let rows: Vec<Vec<SqlValue>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, SqlValue::Null);
                row
            })
            .collect();

        let columns = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let data_type = rows
                    .iter()
                    .filter_map(|row| ColumnType::of(&row[idx]))
                    .fold(ColumnType::Unknown, ColumnType::merge);
                DataColumn { name, data_type }
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[DataColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<SqlValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of the first column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cell at `row` in the column called `column`.
    pub fn value(&self, row: usize, column: &str) -> Option<&SqlValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// True when the table holds at least one row.
    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    /// True when the table holds at least one and at most `max` rows.
    pub fn has_rows_at_most(&self, max: usize) -> bool {
        self.has_rows() && self.rows.len() <= max
    }

    /// One row as a JSON object keyed by column name.
    pub fn row_to_json(&self, row: usize) -> Option<serde_json::Map<String, serde_json::Value>> {
        let cells = self.rows.get(row)?;
        Some(
            self.columns
                .iter()
                .zip(cells)
                .map(|(col, cell)| (col.name.clone(), cell.to_json()))
                .collect(),
        )
    }

    /// All rows as a JSON array of objects.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            (0..self.rows.len())
                .filter_map(|idx| self.row_to_json(idx))
                .map(serde_json::Value::Object)
                .collect(),
        )
    }

    /// Deserialize each row into `T`, matching columns to fields by name.
    pub fn to_records<T: DeserializeOwned>(&self) -> DbResult<Vec<T>> {
        (0..self.rows.len())
            .filter_map(|idx| self.row_to_json(idx))
            .map(|obj| {
                serde_json::from_value(serde_json::Value::Object(obj)).map_err(DbError::from)
            })
            .collect()
    }

    /// Build a table from serializable records.
    ///
    /// Columns appear in first-seen key order; a record missing a key gets
    /// NULL in that column.
    pub fn from_records<T: Serialize>(records: &[T]) -> DbResult<Self> {
        let mut names: Vec<String> = Vec::new();
        let mut objects = Vec::with_capacity(records.len());

        for record in records {
            match serde_json::to_value(record)? {
                serde_json::Value::Object(obj) => {
                    for key in obj.keys() {
                        if !names.contains(key) {
                            names.push(key.clone());
                        }
                    }
                    objects.push(obj);
                }
                other => {
                    return Err(DbError::ConversionError(format!(
                        "record must serialize to an object, got {other}"
                    )));
                }
            }
        }

        let rows = objects
            .iter()
            .map(|obj| {
                names
                    .iter()
                    .map(|name| obj.get(name).map_or(SqlValue::Null, SqlValue::from_json))
                    .collect()
            })
            .collect();

        Ok(Self::new(names, rows))
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
