//! Record flattening
//!
//! A [`Schema`] is a fixed, ordered list of [`Column`]s. Flattening a record
//! produces exactly one cell per column followed by the record itself as
//! compact JSON, so column positions never shift when optional parts of the
//! record are missing.

use crate::error::Result;
use crate::path::FieldPath;
use serde_json::Value;
use std::fmt;

/// How an extracted value is turned into a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// Integer; numeric strings are parsed, anything else is a placeholder
    Int,
    /// Floating point; numeric strings are parsed
    Float,
    /// Strings unmodified; other scalars rendered, compound values as JSON
    Text,
    /// The whole subtree as compact JSON
    Json,
}

/// One output column: a name, a path into the record, and a kind
#[derive(Clone, Debug)]
pub struct Column {
    /// Column name, used in logs and documentation only (files are header-less)
    pub name: &'static str,
    /// Where the value lives inside the record
    pub path: FieldPath,
    /// How the value is coerced
    pub kind: ColumnKind,
}

/// Ordered column list for one entity
#[derive(Clone, Debug)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Build a schema from `(name, path, kind)` triples
    pub fn new(columns: &[(&'static str, &str, ColumnKind)]) -> Result<Self> {
        let columns = columns
            .iter()
            .map(|&(name, path, kind)| {
                Ok(Column {
                    name,
                    path: FieldPath::parse(path)?,
                    kind,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { columns })
    }

    /// Structured columns, without the trailing raw JSON column
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Total cells per row, raw JSON column included
    pub fn width(&self) -> usize {
        self.columns.len() + 1
    }

    /// Flatten one record; never fails
    pub fn flatten(&self, record: &Value) -> FlatRow {
        let cells = self
            .columns
            .iter()
            .map(|column| match column.path.extract(record) {
                Some(value) => Cell::coerce(value, column.kind),
                None => Cell::Empty,
            })
            .collect();

        FlatRow {
            cells,
            raw: record.to_string(),
        }
    }
}

/// One flattened value
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    /// Placeholder for a missing, null or malformed field
    Empty,
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
}

impl Cell {
    /// Coerce a JSON value according to `kind`
    pub fn coerce(value: &Value, kind: ColumnKind) -> Self {
        if value.is_null() {
            return Cell::Empty;
        }
        match kind {
            ColumnKind::Int => as_int(value).map_or(Cell::Empty, Cell::Int),
            ColumnKind::Float => as_float(value).map_or(Cell::Empty, Cell::Float),
            ColumnKind::Text => match value {
                Value::String(s) => Cell::Text(s.clone()),
                other => Cell::Text(other.to_string()),
            },
            ColumnKind::Json => Cell::Text(value.to_string()),
        }
    }

    /// Whether this is the placeholder
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Int(n) => write!(f, "{n}"),
            Cell::Float(x) => write!(f, "{x}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|x| x.fract() == 0.0 && x.abs() < i64::MAX as f64)
                .map(|x| x as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok().filter(|x: &f64| x.is_finite()),
        _ => None,
    }
}

/// A flattened record: fixed cells plus the original record as JSON text
#[derive(Clone, Debug, PartialEq)]
pub struct FlatRow {
    /// One cell per schema column, in schema order
    pub cells: Vec<Cell>,
    /// The source record, serialized back to compact JSON
    pub raw: String,
}

impl FlatRow {
    /// Cell for the column at `index`
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Cells rendered as text, raw JSON last
    pub fn to_record(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(Cell::to_string)
            .chain(std::iter::once(self.raw.clone()))
            .collect()
    }

    /// Total cells, raw JSON column included
    pub fn width(&self) -> usize {
        self.cells.len() + 1
    }
}
