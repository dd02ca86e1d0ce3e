//! Workbench: owns the store and the runtime and keeps them talking.

use crate::core::Command;
use crate::kernel::services::adapters::{AppMessage, AsyncRuntime};
use crate::kernel::services::ports::{FileBackend, KernelConfig};
use crate::kernel::{Action as KernelAction, AppState, Store};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

mod bridge;
mod tick;

const MAX_MESSAGE_DRAIN_PER_TICK: usize = 1024;

pub struct Workbench {
    store: Store,
    runtime: AsyncRuntime,
    rx: Receiver<AppMessage>,
}

impl Workbench {
    pub fn new(backend: Arc<dyn FileBackend>, config: KernelConfig) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let runtime = AsyncRuntime::new(tx, backend)?;
        Ok(Self {
            store: Store::new(AppState::new(config)),
            runtime,
            rx,
        })
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn runtime(&self) -> &AsyncRuntime {
        &self.runtime
    }

    /// Reduces `action` and hands the resulting effects to the runtime.
    pub fn dispatch(&mut self, action: KernelAction) -> bool {
        self.dispatch_kernel(action)
    }

    pub fn run_command(&mut self, cmd: Command) -> bool {
        self.dispatch_kernel(KernelAction::RunCommand(cmd))
    }

    pub fn handle_message(&mut self, msg: AppMessage) -> bool {
        let action = bridge::message_to_action(msg);
        self.dispatch_kernel(action)
    }
}
