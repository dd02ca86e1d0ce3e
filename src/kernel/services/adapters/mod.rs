//! Service adapters: backend, runtime and filesystem implementations (IO/async).

pub mod http;
pub mod memory;
pub mod runtime;
pub mod settings;

pub use http::HttpFileBackend;
pub use memory::{BackendOp, BackendRequest, MemoryFileBackend};
pub use runtime::{AppMessage, AsyncRuntime};
pub use settings::{
    ensure_log_dir, ensure_settings_file, get_config_dir, get_log_dir, get_settings_path,
    load_settings, load_settings_from,
};
