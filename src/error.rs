//! Error types for rvea
//!
//! Configuration problems are reported before any generation runs; evaluator
//! failures carry the row that produced them.

use thiserror::Error;

/// Error raised by a problem author's evaluator
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    /// The evaluator could not produce a value
    #[error("Evaluator failed: {0}")]
    Failed(String),

    /// The evaluator produced NaN or an infinite value
    #[error("Non-finite value at objective {index}")]
    NonFinite { index: usize },
}

/// Error type for variation operators
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// Crossover operation failed
    #[error("Crossover failed: {0}")]
    CrossoverFailed(String),

    /// Invalid operator configuration
    #[error("Invalid operator configuration: {0}")]
    InvalidConfiguration(String),
}

/// Top-level error type for optimization runs
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Evaluator failure for a specific population row
    #[error("Evaluation of row {row} failed: {source}")]
    Evaluation {
        row: usize,
        #[source]
        source: EvaluationError,
    },

    /// Evaluator returned the wrong number of objectives
    #[error("Row {row} returned {actual} objectives, expected {expected}")]
    ObjectiveLength {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// The problem's per-chunk update hook failed
    #[error("Problem update failed: {0}")]
    ProblemUpdate(#[source] EvaluationError),

    /// Operator error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Numerical domain error
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,

    /// Row index outside the population
    #[error("Row index {index} out of range for population of {len}")]
    RowOutOfRange { index: usize, len: usize },

    /// Rows are still waiting for objective values
    #[error("{pending} rows have not been evaluated")]
    Unevaluated { pending: usize },
}

impl EvolutionError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result type alias for optimization operations
pub type EvoResult<T> = Result<T, EvolutionError>;
