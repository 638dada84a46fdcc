use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error("not authorized")]
    Unauthorized,

    #[error("user {0} not found")]
    NotFound(i64),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Wire name of an [`AdminError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    InvalidArgument,
    StoreUnavailable,
}

impl AdminError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::Unauthorized => ErrorKind::Unauthorized,
            AdminError::NotFound(_) => ErrorKind::NotFound,
            AdminError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            AdminError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, AdminError::StoreUnavailable(_))
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        AdminError::InvalidArgument(msg.into())
    }

    /// Collapses a store failure, keeping the whole context chain in the message.
    pub fn store(err: anyhow::Error) -> Self {
        AdminError::StoreUnavailable(format!("{:#}", err))
    }
}

pub type AdminResult<T> = Result<T, AdminError>;
