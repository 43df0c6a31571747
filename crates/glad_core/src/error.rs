//! Error types for the record model.

use thiserror::Error;

/// Result type for record model operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building or mutating records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The record already carries an insert number.
    #[error("insert number already assigned: {existing}, refusing {requested}")]
    InsertNumberAlreadyAssigned {
        /// Insert number currently on the record.
        existing: i64,
        /// Insert number the caller tried to assign.
        requested: i64,
    },

    /// Unknown primary time basis name or tag.
    #[error("invalid time basis: {value}")]
    InvalidTimeBasis {
        /// The offending value.
        value: String,
    },

    /// Unknown channel type tag.
    #[error("invalid channel type tag: {tag}")]
    InvalidChannelType {
        /// The offending tag.
        tag: i64,
    },

    /// Unknown alarm level tag.
    #[error("invalid alarm level tag: {tag}")]
    InvalidAlarmLevel {
        /// The offending tag.
        tag: i64,
    },

    /// Query vocabulary not understood by the user data type lookup.
    #[error("invalid {kind}: {value}")]
    InvalidQueryTerm {
        /// Which term was rejected (query type, source, recorded state).
        kind: &'static str,
        /// The offending value.
        value: String,
    },
}

impl CoreError {
    /// Creates an invalid time basis error.
    pub fn invalid_time_basis(value: impl Into<String>) -> Self {
        Self::InvalidTimeBasis {
            value: value.into(),
        }
    }

    /// Creates an invalid query term error.
    pub fn invalid_query_term(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidQueryTerm {
            kind,
            value: value.into(),
        }
    }
}
