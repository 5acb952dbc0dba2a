//! # resultgrade
//!
//! Grades a student's SQL query by comparing its result set against the
//! result set of a reference query, producing a tiered score and hints.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Tunables for the grading engine
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Running statements and collecting their result sets
pub mod executor;
/// For all things related to grading
pub mod grade;
/// Grading sessions tying an executor to the rubric
pub mod grader;
/// Result-set data types
pub mod types;

pub use config::GraderConfig;
pub use executor::{QueryError, QueryExecutor, SqliteExecutor};
pub use grade::{Hint, Rubric, RubricVerdict, Tier, grade};
pub use grader::{GradedQuery, Grader};
pub use types::{ResultSet, ResultSetError, Row, Value};
