//! Error types for quarry

use thiserror::Error;

/// Result type alias for quarry operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Error types for query construction and compilation
#[derive(Debug, Error)]
pub enum QueryError {
    /// Malformed field, predicate, or aggregate shape detected at compile time
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    /// A value of the wrong kind was passed into a constrained position
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error propagated unchanged from the execution collaborator
    #[error("Execution error: {0}")]
    Execution(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl QueryError {
    /// Create an invalid expression error
    pub fn invalid_expression(message: impl Into<String>) -> Self {
        Self::InvalidExpression(message.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Wrap an error reported by the execution collaborator
    pub fn execution(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Execution(err.into())
    }

    /// Check if this is an invalid expression error
    pub fn is_invalid_expression(&self) -> bool {
        matches!(self, Self::InvalidExpression(_))
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
