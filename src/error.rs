//! Error types surfaced to callers of the solver.

use thiserror::Error;

/// Failures that abort a solve.
///
/// Nodes dropped for lack of capacity are **not** errors: they are carried to
/// later trips or reported as unserved in the result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The request is malformed (too few locations, depot with demand,
    /// negative capacity, mismatched matrix, ...). Nothing was solved.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The cost matrix provider was unreachable or returned a malformed table.
    #[error("cost matrix unavailable: {0}")]
    MatrixUnavailable(String),

    /// The problem cannot be solved by definition (no vehicles, or a required
    /// node that no vehicle can take).
    #[error("infeasible: {0}")]
    Infeasible(String),
}

impl RoutingError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn matrix(msg: impl Into<String>) -> Self {
        Self::MatrixUnavailable(msg.into())
    }

    pub(crate) fn infeasible(msg: impl Into<String>) -> Self {
        Self::Infeasible(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RoutingError>;
