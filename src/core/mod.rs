//! Host-facing vocabulary shared by every front end.

pub mod command;

pub use command::Command;
