//! Failure taxonomy shared by the tree, history and editor session.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShellError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// The backend could not be reached at all.
    #[error("backend unavailable: {0}")]
    NetworkUnavailable(String),
    /// The backend answered but reported a failure.
    #[error("{0}")]
    ApplicationError(String),
    #[error("path no longer exists: {0}")]
    StalePath(String),
    #[error("no history in that direction")]
    NoHistory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NetworkUnavailable,
    ApplicationError,
    StalePath,
    NoHistory,
}

impl ShellError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShellError::NetworkUnavailable(_) => ErrorKind::NetworkUnavailable,
            ShellError::ApplicationError(_) => ErrorKind::ApplicationError,
            ShellError::StalePath(_) => ErrorKind::StalePath,
            ShellError::NoHistory => ErrorKind::NoHistory,
        }
    }

    /// Local logic failures never involve the backend.
    pub fn is_local(&self) -> bool {
        matches!(self, ShellError::StalePath(_) | ShellError::NoHistory)
    }
}
