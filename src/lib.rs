//! codeshell - client-side state layer of a remote code-editing shell
//!
//! Module layout:
//! - models: pure data (paths, lazy file tree, buffers, navigation history)
//! - kernel: state, actions, effects, store reducers, service ports/adapters
//! - core: host-facing command vocabulary
//! - app: the workbench that pumps effects and runtime messages

pub mod app;
pub mod core;
pub mod error;
pub mod kernel;
pub mod models;

pub use error::{ErrorKind, Result, ShellError};
