#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Result-set data types shared by the executor and the grading engine.

use std::{cmp::Ordering, fmt::Display};

use serde::{Deserialize, Serialize};
use tabled::{builder::Builder, settings::Style};

/// A single scalar cell of a query result.
///
/// Equality is type-sensitive: `Int(1)`, `Float(1.0)` and `Text("1")` are
/// three different values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL `NULL`
    #[default]
    Null,
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
}

impl Value {
    /// Returns true if this value is `NULL`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric tag used to order values of different variants
    fn type_tag(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Int(_) => 1,
            Value::Float(_) => 2,
            Value::Text(_) => 3,
        }
    }
}

/// Folds `-0.0` into `0.0` so both zeros compare equal.
fn unsigned_zero(f: f64) -> f64 {
    if f == 0.0 { 0.0 } else { f }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => unsigned_zero(*a).total_cmp(&unsigned_zero(*b)),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.type_tag().cmp(&other.type_tag()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// One row of a result set.
pub type Row = Vec<Value>;

/// Errors raised while constructing a [`ResultSet`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultSetError {
    /// A row does not have one value per column.
    #[error("Row {row} has {found} values, expected {expected} (one per column).")]
    RowArity {
        /// Zero-based index of the offending row
        row:      usize,
        /// Column count of the result set
        expected: usize,
        /// Length of the offending row
        found:    usize,
    },
}

/// Shape of a result set as it appears on disk.
#[derive(Deserialize)]
struct RawResultSet {
    /// column names
    columns: Vec<String>,
    /// row values
    #[serde(default)]
    rows:    Vec<Row>,
}

impl TryFrom<RawResultSet> for ResultSet {
    type Error = ResultSetError;

    fn try_from(raw: RawResultSet) -> Result<Self, Self::Error> {
        ResultSet::new(raw.columns, raw.rows)
    }
}

/// Ordered column names plus ordered rows, as produced by executing one
/// query.
///
/// Every row holds exactly one value per column. Once built, a result set is
/// never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawResultSet")]
pub struct ResultSet {
    /// Column names, in query order. Duplicates are allowed.
    columns: Vec<String>,
    /// Rows, in query order.
    rows:    Vec<Row>,
}

impl ResultSet {
    /// Creates a result set, checking that every row matches the column count.
    pub fn new<C, S>(columns: C, rows: Vec<Row>) -> Result<Self, ResultSetError>
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != columns.len())
        {
            return Err(ResultSetError::RowArity {
                row,
                expected: columns.len(),
                found,
            });
        }

        Ok(Self { columns, rows })
    }

    /// Column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows, in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Parses a result set from its JSON form
    /// (`{"columns": [...], "rows": [[...], ...]}`).
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Renders the result set as a text table.
    pub fn to_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().cloned());
        for row in &self.rows {
            builder.push_record(row.iter().map(ToString::to_string));
        }

        builder.build().with(Style::modern()).to_string()
    }
}

impl Display for ResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.columns.join(", "))?;
        writeln!(f, "{}", "-".repeat(30))?;
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            writeln!(f, "{}", cells.join(", "))?;
        }
        Ok(())
    }
}
