#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Tiered scoring policy over the predicate battery.

use std::collections::BTreeMap;

use super::{
    equivalence::rows_unsorted_equivalence_bounded,
    predicates::{Predicate, PredicateOutcome},
    results::{Breakdown, BreakdownEntry, Hint, RubricVerdict, Tier},
};
use crate::{config::GraderConfig, types::ResultSet};

/// Predicates the rubric reads to pick a tier and derive hints.
const RUBRIC_PREDICATES: [Predicate; 8] = [
    Predicate::RowsCountClose,
    Predicate::RowsCountExact,
    Predicate::RowsUnsortedQuickGuess,
    Predicate::RowsExactOrder,
    Predicate::ColumnsCountClose,
    Predicate::ColumnsCountExact,
    Predicate::ColumnsNameSetEqual,
    Predicate::ColumnsExactOrder,
];

/// Predicate outcomes computed for a single grading call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcomes {
    /// outcome per predicate
    results: BTreeMap<Predicate, PredicateOutcome>,
}

impl Outcomes {
    /// Whether `predicate` ran and passed. Predicates that did not run count
    /// as failed.
    pub fn passed(&self, predicate: Predicate) -> bool {
        self.results
            .get(&predicate)
            .is_some_and(PredicateOutcome::passed)
    }

    /// Outcome of `predicate`, if it ran.
    pub fn get(&self, predicate: Predicate) -> Option<PredicateOutcome> {
        self.results.get(&predicate).copied()
    }

    /// All outcomes, ordered by predicate.
    pub fn iter(&self) -> impl Iterator<Item = (&Predicate, &PredicateOutcome)> {
        self.results.iter()
    }
}

impl FromIterator<(Predicate, PredicateOutcome)> for Outcomes {
    fn from_iter<T: IntoIterator<Item = (Predicate, PredicateOutcome)>>(iter: T) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

/// Picks the tier; the first matching rule wins.
pub fn select_tier(outcomes: &Outcomes) -> Tier {
    let pass = |p| outcomes.passed(p);

    if pass(Predicate::RowsExactOrder) && pass(Predicate::ColumnsExactOrder) {
        Tier::ExactMatch
    } else if pass(Predicate::RowsUnsortedQuickGuess) {
        // Quick-guess false positives land here on purpose; the scores were
        // tuned with that leniency in place.
        Tier::EquivalentUpToOrder
    } else if (pass(Predicate::ColumnsNameSetEqual) && pass(Predicate::RowsCountClose))
        || (pass(Predicate::ColumnsCountExact) && pass(Predicate::RowsCountExact))
        || pass(Predicate::ColumnsExactOrder)
    {
        Tier::PartialStructuralMatch
    } else if pass(Predicate::RowsCountClose) && pass(Predicate::ColumnsCountClose) {
        Tier::RoughAttempt
    } else {
        Tier::NoCredit
    }
}

/// Derives hints from the outcomes, in fixed order.
///
/// The row-count hint is independent; the column and row-content hints form
/// a chain where only the first applicable one is emitted.
pub fn derive_hints(student: &ResultSet, grader: &ResultSet, outcomes: &Outcomes) -> Vec<Hint> {
    let pass = |p| outcomes.passed(p);
    let mut hints = Vec::new();

    if !pass(Predicate::RowsCountExact) {
        hints.push(if student.row_count() > grader.row_count() {
            Hint::TooManyRows
        } else {
            Hint::TooFewRows
        });
    }

    if !pass(Predicate::ColumnsCountExact) {
        hints.push(if student.column_count() > grader.column_count() {
            Hint::TooManyColumns
        } else {
            Hint::TooFewColumns
        });
    } else if !pass(Predicate::ColumnsNameSetEqual) {
        hints.push(Hint::ColumnsNamedIncorrectly);
    } else if !pass(Predicate::ColumnsExactOrder) {
        hints.push(Hint::ColumnsOutOfOrder);
    } else if pass(Predicate::RowsUnsortedQuickGuess) && !pass(Predicate::RowsExactOrder) {
        hints.push(Hint::RowsOutOfOrder);
    } else if pass(Predicate::RowsCountExact) && !pass(Predicate::RowsUnsortedQuickGuess) {
        hints.push(Hint::IncorrectComputation);
    }

    hints
}

/// The scoring policy, parameterised by closeness thresholds.
#[derive(Debug, Clone, Default)]
pub struct Rubric {
    /// thresholds and limits
    config: GraderConfig,
}

impl Rubric {
    /// Creates a rubric using `config`.
    pub fn new(config: GraderConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &GraderConfig {
        &self.config
    }

    /// Runs the predicates the rubric needs.
    pub fn outcomes(&self, student: &ResultSet, grader: &ResultSet) -> Outcomes {
        RUBRIC_PREDICATES
            .iter()
            .map(|p| {
                let outcome = p.evaluate(student, grader, &self.config);
                tracing::debug!(predicate = %p, %outcome, "Evaluated predicate");
                (*p, outcome)
            })
            .collect()
    }

    /// Grades `student` against `grader`.
    pub fn grade(&self, student: &ResultSet, grader: &ResultSet) -> RubricVerdict {
        let outcomes = self.outcomes(student, grader);
        let tier = select_tier(&outcomes);
        let hints = derive_hints(student, grader, &outcomes);
        RubricVerdict::new(tier, hints)
    }

    /// Evaluates the whole battery for diagnosis.
    ///
    /// The permutation-equivalence test is skipped, and noted as such, when
    /// the tables are wider than the configured column cap.
    pub fn breakdown(&self, student: &ResultSet, grader: &ResultSet) -> Breakdown {
        let entries = Predicate::ALL
            .iter()
            .map(|&predicate| {
                if !predicate.is_expensive() {
                    return BreakdownEntry {
                        predicate,
                        outcome: Some(predicate.evaluate(student, grader, &self.config)),
                        note: None,
                    };
                }

                match rows_unsorted_equivalence_bounded(
                    student,
                    grader,
                    self.config.max_permutation_columns(),
                ) {
                    Ok(equivalent) => BreakdownEntry {
                        predicate,
                        outcome: Some(equivalent.into()),
                        note: None,
                    },
                    Err(e) => {
                        tracing::warn!("{e}");
                        BreakdownEntry {
                            predicate,
                            outcome: None,
                            note: Some(e.to_string()),
                        }
                    }
                }
            })
            .collect();

        Breakdown::new(entries)
    }
}

/// Grades `student` against `grader` with the default thresholds.
///
/// Pure and deterministic: the same inputs always give the same verdict.
pub fn grade(student: &ResultSet, grader: &ResultSet) -> RubricVerdict {
    Rubric::default().grade(student, grader)
}
