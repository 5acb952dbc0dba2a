#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Relative row-count difference still considered "close"
pub const DEFAULT_ROWS_CLOSE_THRESHOLD: f64 = 0.5;

/// Relative column-count difference still considered "close"
pub const DEFAULT_COLUMNS_CLOSE_THRESHOLD: f64 = 0.5;

/// Largest column count for which the permutation-equivalence test is run.
/// 8 columns is 40320 permutations.
pub const DEFAULT_MAX_PERMUTATION_COLUMNS: usize = 8;

/// Environment variable overriding [`DEFAULT_ROWS_CLOSE_THRESHOLD`]
pub const ROWS_THRESHOLD_ENV: &str = "RESULTGRADE_ROWS_THRESHOLD";

/// Environment variable overriding [`DEFAULT_COLUMNS_CLOSE_THRESHOLD`]
pub const COLUMNS_THRESHOLD_ENV: &str = "RESULTGRADE_COLUMNS_THRESHOLD";

/// Environment variable overriding [`DEFAULT_MAX_PERMUTATION_COLUMNS`]
pub const MAX_PERMUTATION_COLUMNS_ENV: &str = "RESULTGRADE_MAX_PERMUTATION_COLUMNS";
