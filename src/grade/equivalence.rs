#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Permutation-invariant comparison of two result sets.
//!
//! Two tables are *equivalent* when some permutation of the student's columns,
//! followed by some reordering of rows, makes them cell-for-cell identical.
//! Values that share a row must still share a row: only whole columns and
//! whole rows move.

use itertools::Itertools;

use super::predicates::{columns_count_exact, rows_count_exact, rows_exact_order};
use crate::types::{ResultSet, Row, Value};

/// Errors from [`rows_unsorted_equivalence_bounded`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EquivalenceError {
    /// Enumerating every column permutation would be too expensive.
    #[error("Refusing to enumerate permutations of {columns} columns (limit is {max}).")]
    TooManyColumns {
        /// column count of the tables
        columns: usize,
        /// configured limit
        max:     usize,
    },
}

/// Sorts rows lexicographically over the full row tuple, in column order.
fn canonical<'a>(mut rows: Vec<Vec<&'a Value>>) -> Vec<Vec<&'a Value>> {
    rows.sort_unstable();
    rows
}

/// Borrows every row of a table.
fn borrowed(rows: &[Row]) -> Vec<Vec<&Value>> {
    rows.iter().map(|row| row.iter().collect()).collect()
}

/// Sorted values of one column, used to rule out permutations early.
fn column_profile(rows: &[Row], column: usize) -> Vec<&Value> {
    rows.iter().map(|row| &row[column]).sorted_unstable().collect()
}

/// Treats each row as a multiset of values (sorted within the row), then
/// sorts the rows.
fn row_multisets(rows: &[Row]) -> Vec<Vec<&Value>> {
    rows.iter()
        .map(|row| row.iter().sorted_unstable().collect::<Vec<_>>())
        .sorted_unstable()
        .collect()
}

/// A cheap guess at [`rows_unsorted_equivalence`].
///
/// Sorts values within each row, then sorts the rows, and compares. Sorting
/// inside a row forgets which column a value came from, so this can report a
/// match for tables no column permutation relates (`[(1,2),(1,2)]` against
/// `[(1,2),(2,1)]`). It never misses a true equivalence. Treat a pass as a
/// signal, not a proof.
pub fn rows_unsorted_quick_guess(student: &ResultSet, grader: &ResultSet) -> bool {
    row_multisets(student.rows()) == row_multisets(grader.rows())
}

/// True iff the tables are equal up to a column permutation and a row
/// reordering.
///
/// Expensive: `O(k! * n log n)` for `k` columns and `n` rows. Only tractable
/// for a handful of columns; callers that cannot bound `k` should use
/// [`rows_unsorted_equivalence_bounded`].
pub fn rows_unsorted_equivalence(student: &ResultSet, grader: &ResultSet) -> bool {
    if !columns_count_exact(student, grader) || !rows_count_exact(student, grader) {
        return false;
    }
    if rows_exact_order(student, grader) {
        return true;
    }
    // equivalence implies the per-row multisets agree
    if !rows_unsorted_quick_guess(student, grader) {
        return false;
    }

    let width = student.column_count();
    let target = canonical(borrowed(grader.rows()));

    // compatible[s][g]: student column s holds the same values as grader column g
    let grader_profiles: Vec<_> = (0..width)
        .map(|g| column_profile(grader.rows(), g))
        .collect();
    let compatible: Vec<Vec<bool>> = (0..width)
        .map(|s| {
            let profile = column_profile(student.rows(), s);
            grader_profiles.iter().map(|g| *g == profile).collect()
        })
        .collect();

    let mut checked = 0usize;
    let found = (0..width)
        .permutations(width)
        .filter(|order| {
            order
                .iter()
                .enumerate()
                .all(|(position, &column)| compatible[column][position])
        })
        .any(|order| {
            checked += 1;
            let permuted = student
                .rows()
                .iter()
                .map(|row| order.iter().map(|&column| &row[column]).collect())
                .collect();
            canonical(permuted) == target
        });

    tracing::debug!(width, checked, found, "Permutation equivalence finished");
    found
}

/// [`rows_unsorted_equivalence`], refusing to enumerate permutations when
/// the tables have more than `max_columns` columns.
///
/// Shape mismatches and exact matches are still answered regardless of width,
/// since they need no enumeration.
pub fn rows_unsorted_equivalence_bounded(
    student: &ResultSet,
    grader: &ResultSet,
    max_columns: usize,
) -> Result<bool, EquivalenceError> {
    if !columns_count_exact(student, grader) || !rows_count_exact(student, grader) {
        return Ok(false);
    }
    if rows_exact_order(student, grader) {
        return Ok(true);
    }
    if student.column_count() > max_columns {
        return Err(EquivalenceError::TooManyColumns {
            columns: student.column_count(),
            max:     max_columns,
        });
    }

    Ok(rows_unsorted_equivalence(student, grader))
}
