use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the domain, service and storage layers.
#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Formula not found: {0}")]
    FormulaNotFound(String),
    #[error("Result history not found: {0}")]
    ResultHistoryNotFound(String),
    #[error("No result history exists for user {0}")]
    NoResultHistory(String),
    #[error("Username `{0}` is already taken")]
    UsernameTaken(String),
    #[error("Email `{0}` is already registered")]
    EmailTaken(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage failure: {0}")]
    StorageFailure(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, ConverterError>;

impl ConverterError {
    /// Returns `true` for lookups that failed because a keyed record is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConverterError::UserNotFound(_)
                | ConverterError::FormulaNotFound(_)
                | ConverterError::ResultHistoryNotFound(_)
                | ConverterError::NoResultHistory(_)
        )
    }
}

impl From<std::io::Error> for ConverterError {
    fn from(err: std::io::Error) -> Self {
        ConverterError::StorageFailure(err.to_string())
    }
}

impl From<serde_json::Error> for ConverterError {
    fn from(err: serde_json::Error) -> Self {
        ConverterError::StorageFailure(err.to_string())
    }
}
