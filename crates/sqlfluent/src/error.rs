//! Error types for sqlfluent

use thiserror::Error;

/// Result type alias for sqlfluent operations
pub type QbResult<T> = Result<T, QbError>;

/// Error types for query building, compilation and execution
#[derive(Debug, Error)]
pub enum QbError {
    /// Binding category outside of `select, join, where, having, order`
    #[error("Invalid binding type: {0}.")]
    InvalidBindingCategory(String),

    /// A comparison operator other than `=` paired with a `null` value
    #[error("Illegal operator and value combination: {operator} null")]
    IllegalOperatorAndValue { operator: String },

    /// Adapter/dialect name that has no grammar
    #[error("You must specify a valid sql adapter (got '{0}')")]
    UnsupportedAdapter(String),

    /// Statement compiled without a target table
    #[error("Cannot compile {0} statement without a table; call `from` first")]
    MissingTable(&'static str),

    /// Invalid builder argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Placeholder count does not match the supplied bindings
    #[error("Binding mismatch: {placeholders} placeholder(s) but {bindings} binding(s)")]
    BindingMismatch { placeholders: usize, bindings: usize },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Driver error reported by tokio-postgres
    #[cfg(feature = "postgres")]
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Driver-reported execution failure
    #[error("Execution error: {0}")]
    Execution(String),
}

impl QbError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Configuration errors are raised before any I/O happens.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidBindingCategory(_) | Self::UnsupportedAdapter(_)
        )
    }

    /// Usage errors are raised at the call site that detected them.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::IllegalOperatorAndValue { .. }
                | Self::MissingTable(_)
                | Self::InvalidArgument(_)
                | Self::BindingMismatch { .. }
        )
    }

    /// Check if this error was reported by the database driver
    pub fn is_execution(&self) -> bool {
        #[cfg(feature = "postgres")]
        if matches!(self, Self::Query(_)) {
            return true;
        }
        matches!(self, Self::Execution(_) | Self::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy() {
        assert!(QbError::InvalidBindingCategory("foo".into()).is_configuration());
        assert!(QbError::UnsupportedAdapter("oracle".into()).is_configuration());
        assert!(
            QbError::IllegalOperatorAndValue {
                operator: ">".into()
            }
            .is_usage()
        );
        assert!(QbError::execution("boom").is_execution());
        assert!(!QbError::execution("boom").is_usage());
    }

    #[test]
    fn messages() {
        assert_eq!(
            QbError::InvalidBindingCategory("foo".into()).to_string(),
            "Invalid binding type: foo."
        );
        assert_eq!(
            QbError::BindingMismatch {
                placeholders: 2,
                bindings: 1
            }
            .to_string(),
            "Binding mismatch: 2 placeholder(s) but 1 binding(s)"
        );
    }
}
