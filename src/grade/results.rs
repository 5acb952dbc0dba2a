#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use colored::Colorize;
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};

use super::predicates::{Predicate, PredicateOutcome};

/// One of the fixed score buckets of the rubric, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Rows and columns match exactly, in order
    ExactMatch,
    /// Rows match once order is ignored (quick guess)
    EquivalentUpToOrder,
    /// Shape or column names line up
    PartialStructuralMatch,
    /// Row and column counts are in the right neighbourhood
    RoughAttempt,
    /// Nothing lines up
    NoCredit,
}

impl Tier {
    /// Score awarded for this tier.
    pub fn score(&self) -> f64 {
        match self {
            Tier::ExactMatch => 1.0,
            Tier::EquivalentUpToOrder => 0.8,
            Tier::PartialStructuralMatch => 0.6,
            Tier::RoughAttempt => 0.4,
            Tier::NoCredit => 0.0,
        }
    }

    /// Short human label for this tier.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::ExactMatch => "exact match",
            Tier::EquivalentUpToOrder => "equivalent up to order",
            Tier::PartialStructuralMatch => "partial structural match",
            Tier::RoughAttempt => "rough attempt",
            Tier::NoCredit => "no credit",
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} ({})", self.score(), self.label())
    }
}

/// Diagnostic feedback attached to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hint {
    /// Student returned more rows than expected
    TooManyRows,
    /// Student returned fewer rows than expected
    TooFewRows,
    /// Student returned more columns than expected
    TooManyColumns,
    /// Student returned fewer columns than expected
    TooFewColumns,
    /// Right number of columns, wrong names
    ColumnsNamedIncorrectly,
    /// Right column names, wrong order
    ColumnsOutOfOrder,
    /// Right rows, wrong order
    RowsOutOfOrder,
    /// Right shape, wrong values
    IncorrectComputation,
}

impl Hint {
    /// The message shown to the student.
    pub fn message(&self) -> &'static str {
        match self {
            Hint::TooManyRows => "too many rows",
            Hint::TooFewRows => "too few rows",
            Hint::TooManyColumns => "too many columns",
            Hint::TooFewColumns => "too few columns",
            Hint::ColumnsNamedIncorrectly => "columns are named incorrectly",
            Hint::ColumnsOutOfOrder => "columns are out of order",
            Hint::RowsOutOfOrder => "rows are out of order",
            Hint::IncorrectComputation => "incorrect computation",
        }
    }
}

impl Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Final outcome of grading one student result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RubricVerdict {
    /// Score bucket reached
    tier:  Tier,
    /// Ordered, duplicate-free hints
    hints: Vec<Hint>,
}

impl RubricVerdict {
    /// Creates a verdict, dropping repeated hints while keeping first-seen
    /// order.
    pub fn new(tier: Tier, hints: impl IntoIterator<Item = Hint>) -> Self {
        let mut unique = Vec::new();
        for hint in hints {
            if !unique.contains(&hint) {
                unique.push(hint);
            }
        }
        Self {
            tier,
            hints: unique,
        }
    }

    /// Score in `{0.0, 0.4, 0.6, 0.8, 1.0}`.
    pub fn score(&self) -> f64 {
        self.tier.score()
    }

    /// Tier reached.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Hints, in rubric order.
    pub fn hints(&self) -> &[Hint] {
        &self.hints
    }

    /// Hints as display strings.
    pub fn hint_messages(&self) -> Vec<String> {
        self.hints.iter().map(ToString::to_string).collect()
    }

    /// Renders the verdict as a table.
    pub fn to_table(&self) -> String {
        let rows: Vec<HintRow> = self
            .hints
            .iter()
            .enumerate()
            .map(|(i, hint)| HintRow {
                number: i + 1,
                hint:   hint.message().to_string(),
            })
            .collect();

        Table::new(&rows)
            .with(Panel::header("Grading Overview"))
            .with(Panel::footer(format!("Final Score: {}", self.tier)))
            .with(Modify::new(Rows::new(1..)).with(Width::wrap(48).keep_words(true)))
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Style::modern())
            .to_string()
    }
}

impl Display for RubricVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Final Score: {}", self.score())?;
        if !self.hints.is_empty() {
            write!(f, "\nHints: {}", self.hint_messages().join("; "))?;
        }
        Ok(())
    }
}

/// Table row for a hint.
#[derive(Tabled)]
struct HintRow {
    /// position in the hint list
    #[tabled(rename = "#")]
    number: usize,
    /// hint text
    #[tabled(rename = "Hint")]
    hint:   String,
}

/// Outcome of one predicate in a [`Breakdown`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    /// Which predicate
    pub predicate: Predicate,
    /// Its outcome, or `None` when it was skipped
    pub outcome:   Option<PredicateOutcome>,
    /// Why the predicate was skipped, if it was
    pub note:      Option<String>,
}

/// Every predicate in the battery, evaluated for diagnosis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Breakdown {
    /// Entries, in battery order
    entries: Vec<BreakdownEntry>,
}

impl Breakdown {
    /// Creates a breakdown from entries.
    pub fn new(entries: Vec<BreakdownEntry>) -> Self {
        Self { entries }
    }

    /// Entries, in battery order.
    pub fn entries(&self) -> &[BreakdownEntry] {
        &self.entries
    }

    /// Looks up the outcome of a predicate, if it ran.
    pub fn get(&self, predicate: Predicate) -> Option<PredicateOutcome> {
        self.entries
            .iter()
            .find(|e| e.predicate == predicate)
            .and_then(|e| e.outcome)
    }

    /// Entries that ran and passed.
    pub fn passed(&self) -> impl Iterator<Item = &BreakdownEntry> {
        self.entries
            .iter()
            .filter(|e| e.outcome.is_some_and(|o| o.passed()))
    }

    /// Entries that failed or were skipped.
    pub fn failed(&self) -> impl Iterator<Item = &BreakdownEntry> {
        self.entries
            .iter()
            .filter(|e| !e.outcome.is_some_and(|o| o.passed()))
    }

    /// Renders the breakdown as a table, passed predicates first.
    pub fn to_table(&self) -> String {
        let rows: Vec<BreakdownRow> = self
            .passed()
            .map(|e| BreakdownRow::from_entry(e, "passed".green().to_string()))
            .chain(
                self.failed()
                    .map(|e| BreakdownRow::from_entry(e, "failed".red().to_string())),
            )
            .collect();

        Table::new(&rows)
            .with(Panel::header("Predicate Breakdown"))
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Style::modern())
            .to_string()
    }
}

/// Table row for a breakdown entry.
#[derive(Tabled)]
struct BreakdownRow {
    /// predicate name
    #[tabled(rename = "Predicate")]
    predicate: String,
    /// outcome, or the reason it was skipped
    #[tabled(rename = "Outcome")]
    outcome:   String,
    /// passed or failed
    #[tabled(rename = "Status")]
    status:    String,
}

impl BreakdownRow {
    /// Builds a row for `entry` with the given status label.
    fn from_entry(entry: &BreakdownEntry, status: String) -> Self {
        let outcome = match (&entry.outcome, &entry.note) {
            (Some(outcome), _) => outcome.to_string(),
            (None, Some(note)) => format!("skipped: {note}"),
            (None, None) => "skipped".to_string(),
        };
        Self {
            predicate: entry.predicate.to_string(),
            outcome,
            status,
        }
    }
}
