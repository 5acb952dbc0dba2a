#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::str::FromStr;

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::constants::{
    COLUMNS_THRESHOLD_ENV, DEFAULT_COLUMNS_CLOSE_THRESHOLD, DEFAULT_MAX_PERMUTATION_COLUMNS,
    DEFAULT_ROWS_CLOSE_THRESHOLD, MAX_PERMUTATION_COLUMNS_ENV, ROWS_THRESHOLD_ENV,
};

/// Tunables for the grading engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(default)]
#[builder(doc)]
pub struct GraderConfig {
    /// Largest relative row-count difference accepted by `rows_count_close`.
    #[builder(default = DEFAULT_ROWS_CLOSE_THRESHOLD)]
    rows_close_threshold:    f64,
    /// Largest relative column-count difference accepted by
    /// `columns_count_close`.
    #[builder(default = DEFAULT_COLUMNS_CLOSE_THRESHOLD)]
    columns_close_threshold: f64,
    /// Column count above which the permutation-equivalence test is skipped.
    #[builder(default = DEFAULT_MAX_PERMUTATION_COLUMNS)]
    max_permutation_columns: usize,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            rows_close_threshold:    DEFAULT_ROWS_CLOSE_THRESHOLD,
            columns_close_threshold: DEFAULT_COLUMNS_CLOSE_THRESHOLD,
            max_permutation_columns: DEFAULT_MAX_PERMUTATION_COLUMNS,
        }
    }
}

/// Reads and parses an environment variable, warning and returning `None`
/// when it is set but unusable.
fn env_value<T>(key: &str, accept: impl Fn(&T) -> bool) -> Option<T>
where
    T: FromStr,
{
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) if accept(&value) => Some(value),
        _ => {
            tracing::warn!(key, value = %raw, "Ignoring invalid configuration value");
            None
        }
    }
}

/// Returns true for thresholds the closeness predicates can use.
fn usable_threshold(value: &f64) -> bool {
    value.is_finite() && *value >= 0.0
}

impl GraderConfig {
    /// Builds a config from the defaults, overridden by
    /// `RESULTGRADE_ROWS_THRESHOLD`, `RESULTGRADE_COLUMNS_THRESHOLD` and
    /// `RESULTGRADE_MAX_PERMUTATION_COLUMNS` when they are set and valid.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rows_close_threshold:    env_value(ROWS_THRESHOLD_ENV, usable_threshold)
                .unwrap_or(defaults.rows_close_threshold),
            columns_close_threshold: env_value(COLUMNS_THRESHOLD_ENV, usable_threshold)
                .unwrap_or(defaults.columns_close_threshold),
            max_permutation_columns: env_value(MAX_PERMUTATION_COLUMNS_ENV, |_: &usize| true)
                .unwrap_or(defaults.max_permutation_columns),
        }
    }

    /// Checks that both thresholds are finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            usable_threshold(&self.rows_close_threshold),
            "Row closeness threshold must be a non-negative number, got {}",
            self.rows_close_threshold
        );
        ensure!(
            usable_threshold(&self.columns_close_threshold),
            "Column closeness threshold must be a non-negative number, got {}",
            self.columns_close_threshold
        );
        Ok(())
    }

    /// Returns the row closeness threshold.
    pub fn rows_close_threshold(&self) -> f64 {
        self.rows_close_threshold
    }

    /// Returns the column closeness threshold.
    pub fn columns_close_threshold(&self) -> f64 {
        self.columns_close_threshold
    }

    /// Returns the column cap for the permutation-equivalence test.
    pub fn max_permutation_columns(&self) -> usize {
        self.max_permutation_columns
    }

    /// Returns a new config with a custom row closeness threshold.
    pub fn with_rows_close_threshold(mut self, threshold: f64) -> Self {
        self.rows_close_threshold = threshold;
        self
    }

    /// Returns a new config with a custom column closeness threshold.
    pub fn with_columns_close_threshold(mut self, threshold: f64) -> Self {
        self.columns_close_threshold = threshold;
        self
    }

    /// Returns a new config with a custom permutation column cap.
    pub fn with_max_permutation_columns(mut self, columns: usize) -> Self {
        self.max_permutation_columns = columns;
        self
    }
}
