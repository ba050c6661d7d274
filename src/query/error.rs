//! Query error types
//!
//! Errors raised while turning user input into descriptor fields.

use thiserror::Error;

/// Errors that can occur while building a query descriptor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Gender code other than M or F
    #[error("Invalid gender: {0} (expected M or F)")]
    InvalidGender(String),

    /// Sort column the API does not accept
    #[error("Invalid sort column: {0} (expected stay_id, intime, outtime or disposition)")]
    InvalidSortColumn(String),

    /// Sort direction other than asc/desc
    #[error("Invalid sort order: {0} (expected asc or desc)")]
    InvalidSortOrder(String),

    /// Calendar date that does not parse as YYYY-MM-DD
    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// Page size outside what the API serves
    #[error("Invalid page size: {0} (expected 1 to {max})", max = crate::query::MAX_PER_PAGE)]
    InvalidPageSize(u32),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::InvalidSortOrder("up".to_string());
        assert_eq!(err.to_string(), "Invalid sort order: up (expected asc or desc)");

        let err = QueryError::InvalidPageSize(500);
        assert_eq!(err.to_string(), "Invalid page size: 500 (expected 1 to 100)");
    }
}
