//! Data error types.

use thiserror::Error;

/// Data source errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid date or date range
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Unknown sampling interval code
    #[error("Invalid interval '{0}': expected one of 1m, 5m, 15m, 30m, 1h, 1d, 1wk, 1mo")]
    InvalidInterval(String),

    /// No data for the requested symbol and range
    #[error("Data not found")]
    NoData,

    /// API error from data provider
    #[error("API error [{code}]: {description}")]
    ApiError { code: String, description: String },
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_error() {
        let error = DataError::RequestFailed("Connection timeout".to_string());
        assert_eq!(error.to_string(), "Request failed: Connection timeout");
    }

    #[test]
    fn test_invalid_date_error() {
        let error = DataError::InvalidDate("2024-13-45".to_string());
        assert_eq!(error.to_string(), "Invalid date: 2024-13-45");
    }

    #[test]
    fn test_invalid_interval_error() {
        let error = DataError::InvalidInterval("2d".to_string());
        assert!(error.to_string().starts_with("Invalid interval '2d'"));
    }

    #[test]
    fn test_no_data_error() {
        assert_eq!(DataError::NoData.to_string(), "Data not found");
    }

    #[test]
    fn test_api_error() {
        let error = DataError::ApiError {
            code: "Bad Request".to_string(),
            description: "Invalid input".to_string(),
        };
        assert_eq!(error.to_string(), "API error [Bad Request]: Invalid input");
    }
}
