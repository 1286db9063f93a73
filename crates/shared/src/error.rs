use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ContactId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    DuplicateId,
    NotFound,
    Upload,
    Internal,
}

/// Precondition violations on store mutations. The store is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("contact {0} already exists")]
    DuplicateId(ContactId),
    #[error("contact {0} not found")]
    NotFound(ContactId),
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::DuplicateId(_) => ErrorCode::DuplicateId,
            StoreError::NotFound(_) => ErrorCode::NotFound,
        }
    }
}

/// User-facing rendering of any phonebook error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?}: {message}")]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorReport {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<StoreError> for ErrorReport {
    fn from(value: StoreError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}
