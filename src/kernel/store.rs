use crate::core::Command;
use crate::error::ShellError;

use super::{Action, AppState, Effect};

mod editor;
mod explorer;

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    fn changed(state_changed: bool) -> Self {
        Self {
            effects: Vec::new(),
            state_changed,
        }
    }

    fn with_effects(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            state_changed: true,
        }
    }

    fn request(effect: Effect) -> Self {
        Self {
            effects: vec![effect],
            state_changed: false,
        }
    }
}

pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::RunCommand(cmd) => self.dispatch_command(cmd),
            Action::Editor(editor_action) => self.reduce_editor_action(editor_action),
            Action::OpenPath(path) => self.open_path(&path),
            Action::Tick { now } => {
                DispatchResult::changed(self.state.notifications.expire(now))
            }
            Action::DismissNotification(id) => {
                DispatchResult::changed(self.state.notifications.dismiss(id))
            }
            other => self.reduce_explorer_action(other),
        }
    }

    /// Menu / keyboard entry point. Each command maps to exactly one reducer.
    pub fn dispatch_command(&mut self, cmd: Command) -> DispatchResult {
        tracing::debug!(command = cmd.name(), "run command");
        match cmd {
            Command::Save => self.save_now(),
            Command::CloseFile => self.close_file(),
            Command::NavigateBack => self.navigate_history(false),
            Command::NavigateForward => self.navigate_history(true),
            Command::RefreshExplorer => self.refresh_dir(crate::models::path::ROOT),
            Command::CollapseAll => {
                let had_expanded = self.state.explorer.tree.expanded_paths().next().is_some();
                self.state.explorer.tree.collapse_all();
                self.state.explorer.clear_expand_pending();
                DispatchResult::changed(had_expanded)
            }
        }
    }

    fn report(&mut self, error: ShellError) -> DispatchResult {
        self.state.notifications.push(&error);
        DispatchResult::changed(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
