//! Remote file-storage contract
//!
//! The kernel never talks to a backend directly: the runtime adapter drives a
//! `FileBackend` and reports completions as messages. Paths are canonical
//! project-relative strings (see `models::path`).

use std::future::Future;
use std::pin::Pin;

use crate::error::ShellError;
use crate::models::DirEntry;

pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BackendError>> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Request never got an answer (connect refused, timeout, undecodable body).
    #[error("transport error: {0}")]
    Transport(String),
    /// The backend answered `success: false`.
    #[error("{0}")]
    Application(String),
}

impl From<BackendError> for ShellError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Transport(msg) => ShellError::NetworkUnavailable(msg),
            BackendError::Application(msg) => ShellError::ApplicationError(msg),
        }
    }
}

pub trait FileBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn list_directory<'a>(&'a self, path: &'a str) -> BackendFuture<'a, Vec<DirEntry>>;

    fn read_file<'a>(&'a self, path: &'a str) -> BackendFuture<'a, String>;

    fn write_file<'a>(&'a self, path: &'a str, content: String) -> BackendFuture<'a, ()>;

    fn rename_file<'a>(&'a self, from: &'a str, to: &'a str) -> BackendFuture<'a, ()>;

    fn delete_file<'a>(&'a self, path: &'a str) -> BackendFuture<'a, ()>;
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/file.rs"]
mod tests;
