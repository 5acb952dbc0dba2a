#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Structural comparisons between a student and a grader result set.
//!
//! Every function here is pure and total: it only reads the two result sets
//! and never assumes another predicate has already run.

use std::fmt::Display;

use itertools::Itertools;
use serde::Serialize;

use super::equivalence::{rows_unsorted_equivalence, rows_unsorted_quick_guess};
use crate::{config::GraderConfig, types::ResultSet};

/// True iff `|student - grader| / grader <= threshold`.
///
/// A grader count of zero is only close to a student count of zero.
fn count_close(student: usize, grader: usize, threshold: f64) -> bool {
    if grader == 0 {
        return student == 0;
    }
    (student as f64 - grader as f64).abs() / grader as f64 <= threshold
}

/// `max(1 - |1 - student / grader|, 0)`, with the same zero rule as
/// [`count_close`].
fn count_linear(student: usize, grader: usize) -> f64 {
    if grader == 0 {
        return if student == 0 { 1.0 } else { 0.0 };
    }
    (1.0 - (1.0 - student as f64 / grader as f64).abs()).max(0.0)
}

/// True iff both result sets have the same number of columns.
pub fn columns_count_exact(student: &ResultSet, grader: &ResultSet) -> bool {
    student.column_count() == grader.column_count()
}

/// True iff the column counts differ by at most `threshold`, relative to the
/// grader's count.
pub fn columns_count_close(student: &ResultSet, grader: &ResultSet, threshold: f64) -> bool {
    count_close(student.column_count(), grader.column_count(), threshold)
}

/// Fraction in `[0, 1]` describing how close the column counts are.
pub fn columns_count_linear(student: &ResultSet, grader: &ResultSet) -> f64 {
    count_linear(student.column_count(), grader.column_count())
}

/// True iff the column names are equal as multisets, ignoring order.
pub fn columns_name_set_equal(student: &ResultSet, grader: &ResultSet) -> bool {
    student.column_count() == grader.column_count()
        && student.columns().iter().sorted().eq(grader.columns().iter().sorted())
}

/// True iff the column sequences are identical.
pub fn columns_exact_order(student: &ResultSet, grader: &ResultSet) -> bool {
    student.columns() == grader.columns()
}

/// True iff both result sets have the same number of rows.
pub fn rows_count_exact(student: &ResultSet, grader: &ResultSet) -> bool {
    student.row_count() == grader.row_count()
}

/// True iff the row counts differ by at most `threshold`, relative to the
/// grader's count. The boundary is inclusive.
pub fn rows_count_close(student: &ResultSet, grader: &ResultSet, threshold: f64) -> bool {
    count_close(student.row_count(), grader.row_count(), threshold)
}

/// Fraction in `[0, 1]` describing how close the row counts are.
pub fn rows_count_linear(student: &ResultSet, grader: &ResultSet) -> f64 {
    count_linear(student.row_count(), grader.row_count())
}

/// True iff the row sequences are identical, in their original order.
pub fn rows_exact_order(student: &ResultSet, grader: &ResultSet) -> bool {
    student.rows() == grader.rows()
}

/// Result of evaluating one [`Predicate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredicateOutcome {
    /// Pass/fail predicate
    Bool(bool),
    /// Fractional predicate, in `[0, 1]`
    Fraction(f64),
}

impl PredicateOutcome {
    /// Whether the predicate passed. A fraction only passes at `1.0`.
    pub fn passed(&self) -> bool {
        match self {
            PredicateOutcome::Bool(b) => *b,
            PredicateOutcome::Fraction(f) => *f >= 1.0,
        }
    }

    /// The outcome as a number in `[0, 1]`.
    pub fn value(&self) -> f64 {
        match self {
            PredicateOutcome::Bool(true) => 1.0,
            PredicateOutcome::Bool(false) => 0.0,
            PredicateOutcome::Fraction(f) => *f,
        }
    }
}

impl Display for PredicateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredicateOutcome::Bool(b) => write!(f, "{b}"),
            PredicateOutcome::Fraction(x) => write!(f, "{x:.2}"),
        }
    }
}

impl From<bool> for PredicateOutcome {
    fn from(value: bool) -> Self {
        PredicateOutcome::Bool(value)
    }
}

impl From<f64> for PredicateOutcome {
    fn from(value: f64) -> Self {
        PredicateOutcome::Fraction(value)
    }
}

/// Every comparison in the battery, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// See [`columns_count_exact`]
    ColumnsCountExact,
    /// See [`columns_count_close`]
    ColumnsCountClose,
    /// See [`columns_count_linear`]
    ColumnsCountLinear,
    /// See [`columns_name_set_equal`]
    ColumnsNameSetEqual,
    /// See [`columns_exact_order`]
    ColumnsExactOrder,
    /// See [`rows_count_exact`]
    RowsCountExact,
    /// See [`rows_count_close`]
    RowsCountClose,
    /// See [`rows_count_linear`]
    RowsCountLinear,
    /// See [`rows_exact_order`]
    RowsExactOrder,
    /// See [`rows_unsorted_quick_guess`]
    RowsUnsortedQuickGuess,
    /// See [`rows_unsorted_equivalence`]. Factorial in the column count.
    RowsUnsortedEquivalence,
}

impl Predicate {
    /// The whole battery, cheapest first.
    pub const ALL: [Predicate; 11] = [
        Predicate::ColumnsCountExact,
        Predicate::ColumnsCountClose,
        Predicate::ColumnsCountLinear,
        Predicate::ColumnsNameSetEqual,
        Predicate::ColumnsExactOrder,
        Predicate::RowsCountExact,
        Predicate::RowsCountClose,
        Predicate::RowsCountLinear,
        Predicate::RowsExactOrder,
        Predicate::RowsUnsortedQuickGuess,
        Predicate::RowsUnsortedEquivalence,
    ];

    /// Snake-case identifier of the predicate.
    pub fn name(&self) -> &'static str {
        match self {
            Predicate::ColumnsCountExact => "columns_count_exact",
            Predicate::ColumnsCountClose => "columns_count_close",
            Predicate::ColumnsCountLinear => "columns_count_linear",
            Predicate::ColumnsNameSetEqual => "columns_name_set_equal",
            Predicate::ColumnsExactOrder => "columns_exact_order",
            Predicate::RowsCountExact => "rows_count_exact",
            Predicate::RowsCountClose => "rows_count_close",
            Predicate::RowsCountLinear => "rows_count_linear",
            Predicate::RowsExactOrder => "rows_exact_order",
            Predicate::RowsUnsortedQuickGuess => "rows_unsorted_quick_guess",
            Predicate::RowsUnsortedEquivalence => "rows_unsorted_equivalence",
        }
    }

    /// Whether the predicate is too expensive to run on wide tables.
    pub fn is_expensive(&self) -> bool {
        matches!(self, Predicate::RowsUnsortedEquivalence)
    }

    /// Runs the predicate.
    ///
    /// `RowsUnsortedEquivalence` is unbounded here; use
    /// [`super::equivalence::rows_unsorted_equivalence_bounded`] to cap it.
    pub fn evaluate(
        &self,
        student: &ResultSet,
        grader: &ResultSet,
        config: &GraderConfig,
    ) -> PredicateOutcome {
        match self {
            Predicate::ColumnsCountExact => columns_count_exact(student, grader).into(),
            Predicate::ColumnsCountClose => {
                columns_count_close(student, grader, config.columns_close_threshold()).into()
            }
            Predicate::ColumnsCountLinear => columns_count_linear(student, grader).into(),
            Predicate::ColumnsNameSetEqual => columns_name_set_equal(student, grader).into(),
            Predicate::ColumnsExactOrder => columns_exact_order(student, grader).into(),
            Predicate::RowsCountExact => rows_count_exact(student, grader).into(),
            Predicate::RowsCountClose => {
                rows_count_close(student, grader, config.rows_close_threshold()).into()
            }
            Predicate::RowsCountLinear => rows_count_linear(student, grader).into(),
            Predicate::RowsExactOrder => rows_exact_order(student, grader).into(),
            Predicate::RowsUnsortedQuickGuess => rows_unsorted_quick_guess(student, grader).into(),
            Predicate::RowsUnsortedEquivalence => {
                rows_unsorted_equivalence(student, grader).into()
            }
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
