#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Running SQL statements and collecting their results.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, types::ValueRef};

use crate::types::{ResultSet, ResultSetError, Row, Value};

/// Errors from executing a statement.
///
/// A statement that fails is always reported as an error, never as an empty
/// result set.
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    /// The database rejected the statement.
    #[error("SQLite error {code}: {message}")]
    InvalidQuery {
        /// extended result code reported by SQLite
        code:    i32,
        /// error message reported by SQLite
        message: String,
    },
    /// The statement ran but produces no result columns (DDL, DML, ...).
    #[error("Statement does not return rows: {0}")]
    NotAQuery(String),
    /// The backend returned rows that do not fit the column list.
    #[error("Malformed result set: {0}")]
    Malformed(#[from] ResultSetError),
    /// Any other backend failure.
    #[error("Query execution failed: {0}")]
    Execution(String),
}

/// Something that can execute a query and return its result set.
pub trait QueryExecutor {
    /// Executes `statement`, returning its columns and rows in order.
    fn execute(&self, statement: &str) -> Result<ResultSet, QueryError>;
}

impl From<rusqlite::Error> for QueryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(error, message) => QueryError::InvalidQuery {
                code:    error.extended_code,
                message: message.unwrap_or_else(|| error.to_string()),
            },
            rusqlite::Error::SqlInputError { error, msg, .. } => QueryError::InvalidQuery {
                code:    error.extended_code,
                message: msg,
            },
            other => QueryError::Execution(other.to_string()),
        }
    }
}

/// Returns the text following the first complete statement in `sql`, if
/// that text holds anything besides whitespace, semicolons and comments.
///
/// Semicolons inside string literals, quoted identifiers and comments do not
/// end a statement.
fn trailing_statement(sql: &str) -> Option<&str> {
    let bytes = sql.as_bytes();
    let mut ended_at = None;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                if ended_at.is_some() {
                    break;
                }
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
            }
            b'[' if ended_at.is_none() => {
                while i < bytes.len() && bytes[i] != b']' {
                    i += 1;
                }
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 1;
            }
            b';' => {
                ended_at.get_or_insert(i + 1);
            }
            c if c.is_ascii_whitespace() => {}
            _ if ended_at.is_some() => break,
            _ => {}
        }
        i += 1;
    }

    match ended_at {
        Some(start) if i < bytes.len() => Some(sql[start..].trim()),
        _ => None,
    }
}

/// Converts a SQLite cell into a [`Value`]. Blobs become lossy UTF-8 text.
fn to_value(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Executes queries against a SQLite database.
pub struct SqliteExecutor {
    /// open connection
    conn: Connection,
}

impl SqliteExecutor {
    /// Opens the database at `path` read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Cannot connect to database {}", path.display()))?;

        tracing::info!(path = %path.display(), "Opened database");
        Ok(Self { conn })
    }

    /// Opens a fresh in-memory database.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Cannot open in-memory database")?;
        Ok(Self { conn })
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Runs setup SQL (schema, fixtures) outside of grading.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn
            .execute_batch(sql)
            .context("Failed to run setup statements")
    }
}

impl QueryExecutor for SqliteExecutor {
    fn execute(&self, statement: &str) -> Result<ResultSet, QueryError> {
        if let Some(rest) = trailing_statement(statement) {
            return Err(QueryError::InvalidQuery {
                code:    rusqlite::ffi::SQLITE_MISUSE,
                message: format!("only one statement may be submitted, found more: {rest}"),
            });
        }

        let mut stmt = self.conn.prepare(statement)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        if columns.is_empty() {
            return Err(QueryError::NotAQuery(statement.trim().to_string()));
        }

        let mut rows: Vec<Row> = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let values = (0..columns.len())
                .map(|i| row.get_ref(i).map(to_value))
                .collect::<Result<Row, _>>()?;
            rows.push(values);
        }

        tracing::debug!(columns = columns.len(), rows = rows.len(), "Executed query");
        Ok(ResultSet::new(columns, rows)?)
    }
}
