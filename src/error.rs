//! Error types for einsum path search and execution.

/// Errors that can occur while parsing an expression, searching for a
/// contraction path, or executing a plan.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EinsumError {
    /// Invalid einsum notation syntax.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Index appears in the output but not in any input.
    #[error("output index '{index}' not found in any input")]
    OutputIndexNotInInputs { index: char },

    /// A term's length disagrees with its operand's rank.
    #[error("subscript '{term}' expects {expected} dimensions, operand {operand} has {got}")]
    DimensionMismatch {
        term: String,
        operand: usize,
        expected: usize,
        got: usize,
    },

    /// A label's size disagrees across terms.
    #[error("size of label '{index}' for operand {operand} ({got}) does not match previous terms ({expected})")]
    ShapeMismatch {
        index: char,
        operand: usize,
        expected: usize,
        got: usize,
    },

    /// Unrecognized path strategy name.
    #[error("unknown path strategy '{name}'")]
    UnknownStrategy { name: String },

    /// Non-positive memory limit other than the -1 unbounded sentinel.
    #[error("memory limit must be positive or -1 for unbounded, got {limit}")]
    InvalidMemoryLimit { limit: i64 },

    /// A supplied contraction path is malformed.
    #[error("invalid contraction path: {message}")]
    InvalidPath { message: String },

    /// A reusable expression was called with the wrong number of tensors.
    #[error("expression takes exactly {expected} tensor arguments but received {got}")]
    ArgumentCount { expected: usize, got: usize },

    /// Shape computation or primitive-level shape error.
    #[error("shape error: {message}")]
    Shape { message: String },

    /// Failure surfaced while evaluating a prebuilt plan.
    #[error("internal error during evaluation: {message}")]
    Internal { message: String },
}

impl EinsumError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape {
            message: message.into(),
        }
    }

    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Result type for einsum operations.
pub type EinsumResult<T> = core::result::Result<T, EinsumError>;
