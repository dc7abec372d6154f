//! Error types for graph bisection.

use thiserror::Error;

/// Result type for partitioning operations.
pub type Result<T> = std::result::Result<T, PartitionError>;

/// Errors surfaced by the bisection engine. None of them is fatal: the caller
/// decides whether to skip an instance, abort or switch oracles.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PartitionError {
    /// Node subset passed to `induce` is empty, repeats a node or is out of range.
    #[error("invalid node subset: {0}")]
    InvalidSubset(String),

    /// Edge rejected while building a graph.
    #[error("invalid edge ({0}, {1}): {2}")]
    InvalidEdge(usize, usize, String),

    /// Graph too small to cut, or an oracle produced an empty side.
    #[error("degenerate graph: {0}")]
    DegenerateGraph(String),

    /// Oracle returned partitions that overlap or do not cover the graph.
    #[error("oracle `{oracle}` violated the cut contract: {reason}")]
    OracleContractViolation { oracle: String, reason: String },

    /// Prediction and truth sequences differ in length.
    #[error("length mismatch: {predicted} predicted vs {truth} truth labels")]
    LengthMismatch { predicted: usize, truth: usize },

    /// A long-running search was cancelled cooperatively.
    #[error("search cancelled")]
    Cancelled,

    /// Exhaustive search refused because of the graph size.
    #[error("graph with {0} nodes exceeds the exhaustive search limit of {1}")]
    SearchSpaceTooLarge(usize, usize),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PartitionError {
    pub(crate) fn contract(oracle: &str, reason: impl Into<String>) -> Self {
        PartitionError::OracleContractViolation {
            oracle: oracle.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PartitionError::InvalidEdge(1, 1, "self-loop".to_string());
        assert_eq!(err.to_string(), "invalid edge (1, 1): self-loop");

        let err = PartitionError::LengthMismatch {
            predicted: 3,
            truth: 4,
        };
        assert_eq!(
            err.to_string(),
            "length mismatch: 3 predicted vs 4 truth labels"
        );

        let err = PartitionError::contract("brute-force", "node 2 missing");
        assert_eq!(
            err.to_string(),
            "oracle `brute-force` violated the cut contract: node 2 missing"
        );
    }
}
