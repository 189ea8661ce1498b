//! Error types for graph evaluation and differentiation.

use thiserror::Error;

/// Failures surfaced by forward evaluation and gradient computation.
///
/// The engine is a pure synchronous computation with no transient failure
/// modes, so every variant is surfaced directly to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A node kind was asked for an operation it has no rule for.
    #[error("{operation} is not implemented for node kind {kind}")]
    Unsupported {
        kind: &'static str,
        operation: &'static str,
    },

    /// A bare tensor-family leaf cannot be forward-evaluated.
    #[error("no evaluation rule for node kind {kind}")]
    NoEvaluationRule { kind: &'static str },

    /// A variable's tag was absent from the stimulus mapping.
    #[error("missing binding for variable '{tag}'")]
    MissingBinding { tag: String },
}
