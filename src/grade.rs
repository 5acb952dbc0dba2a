#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Permutation-invariant table comparison.
pub mod equivalence;
/// The predicate battery.
pub mod predicates;
/// Verdict, tier, hint and breakdown types.
pub mod results;
/// The tiered scoring policy.
pub mod rubric;

pub use equivalence::{
    EquivalenceError, rows_unsorted_equivalence, rows_unsorted_equivalence_bounded,
    rows_unsorted_quick_guess,
};
pub use predicates::{
    Predicate, PredicateOutcome, columns_count_close, columns_count_exact, columns_count_linear,
    columns_exact_order, columns_name_set_equal, rows_count_close, rows_count_exact,
    rows_count_linear, rows_exact_order,
};
pub use results::{Breakdown, BreakdownEntry, Hint, RubricVerdict, Tier};
pub use rubric::{Outcomes, Rubric, derive_hints, grade, select_tier};
