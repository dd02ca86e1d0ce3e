//! Host layer: pumps store effects into the runtime and runtime messages back
//! into the store.

pub mod workbench;

pub use workbench::Workbench;
