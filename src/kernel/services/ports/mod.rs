//! Service ports: traits + data contracts.

pub mod config;
pub mod file;
pub mod settings;

pub use config::KernelConfig;
pub use file::{BackendError, BackendFuture, FileBackend};
pub use settings::{AiSettings, Settings};
