//! Error types for ezviz operations.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ezviz operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Empty data provided where non-empty is required.
    ///
    /// Raised when a series collection is empty, or every series in it
    /// has zero values, so no domain can be derived.
    #[error("Empty input: no series values to derive a domain from")]
    EmptyInput,

    /// Non-finite numeric value in the input data.
    #[error("Invalid value {value} in series {series:?}, category {category:?}")]
    InvalidValue {
        /// Key of the offending series.
        series: String,
        /// Key of the offending category.
        category: String,
        /// The non-finite value (NaN or infinity).
        value: f64,
    },

    /// A scale was queried outside its configured domain.
    #[error("Domain lookup failed: key {key:?} not in scale domain")]
    DomainLookup {
        /// The key that was not found.
        key: String,
    },

    /// The key function produced a repeated key within the incoming
    /// data, so reconciliation cannot disambiguate element ownership.
    #[error("Duplicate key {key:?} in reconciliation data")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    /// Scale construction was handed an inconsistent domain/range pair.
    #[error("Scale construction error: {0}")]
    ScaleConstruction(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidValue {
            series: "A".to_string(),
            category: "x".to_string(),
            value: f64::NAN,
        };
        assert!(err.to_string().contains("\"A\""));
        assert!(err.to_string().contains("\"x\""));
    }

    #[test]
    fn test_empty_input_display() {
        assert!(Error::EmptyInput.to_string().contains("Empty input"));
    }

    #[test]
    fn test_domain_lookup_display() {
        let err = Error::DomainLookup { key: "w".to_string() };
        assert!(err.to_string().contains("\"w\""));
    }

    #[test]
    fn test_duplicate_key_display() {
        let err = Error::DuplicateKey { key: "b".to_string() };
        assert!(err.to_string().contains("Duplicate"));
        assert!(err.to_string().contains("\"b\""));
    }
}
