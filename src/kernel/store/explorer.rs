use crate::error::ShellError;
use crate::kernel::editor::SwitchStage;
use crate::kernel::{Action, Effect};
use crate::models::{path, LoadState, NodeKind};

use super::DispatchResult;

/// Rejects names that would not resolve to a single child segment.
fn validate_name(name: &str) -> Result<&str, ShellError> {
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ShellError::ApplicationError(format!(
            "invalid file name '{name}'"
        )));
    }
    Ok(name)
}

impl super::Store {
    pub(super) fn reduce_explorer_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::ExplorerLoadRoot => match self.state.explorer.tree.begin_load(path::ROOT, false) {
                Ok(true) => DispatchResult::request(Effect::LoadDir(path::ROOT.to_string())),
                _ => DispatchResult::unchanged(),
            },
            Action::ExplorerExpand(dir) => self.expand_dir(&path::normalize(&dir)),
            Action::ExplorerCollapse(dir) => self.collapse_dir(&path::normalize(&dir)),
            Action::ExplorerToggle(dir) => {
                let dir = path::normalize(&dir);
                let explorer = &self.state.explorer;
                let open = (!path::is_root(&dir) && explorer.tree.is_expanded(&dir))
                    || explorer.is_expand_pending(&dir);
                if open {
                    self.collapse_dir(&dir)
                } else {
                    self.expand_dir(&dir)
                }
            }
            Action::ExplorerRefresh(dir) => self.refresh_dir(&path::normalize(&dir)),
            Action::ExplorerCreateFile { parent, name } => self.create_file(&parent, &name),
            Action::ExplorerRename { from, new_name } => self.rename_path(&from, &new_name),
            Action::ExplorerDelete(target) => self.delete_path(&target),
            Action::DirLoaded { path, entries } => {
                let explorer = &mut self.state.explorer;
                match explorer.tree.finish_load(&path, &entries) {
                    Ok(()) => {
                        if explorer.take_expand_pending(&path) {
                            let _ = explorer.tree.expand(&path);
                        }
                        tracing::debug!(path = %path, entries = entries.len(), "dir loaded");
                        DispatchResult::changed(true)
                    }
                    Err(err) => {
                        explorer.take_expand_pending(&path);
                        tracing::debug!(path = %path, %err, "dropping listing");
                        DispatchResult::unchanged()
                    }
                }
            }
            Action::DirLoadError { path, error } => {
                self.state.explorer.tree.fail_load(&path);
                self.state.explorer.take_expand_pending(&path);
                self.report(error)
            }
            Action::PathCreated { path: created } => {
                let parent = path::parent(&created).unwrap_or(path::ROOT);
                let name = path::file_name(&created);
                match self
                    .state
                    .explorer
                    .tree
                    .insert_child(parent, name, NodeKind::File)
                {
                    Ok(_) => DispatchResult::changed(true),
                    Err(err) => {
                        tracing::debug!(path = %created, %err, "created file not materialized");
                        DispatchResult::unchanged()
                    }
                }
            }
            Action::PathRenamed { from, to } => self.on_path_renamed(&from, &to),
            Action::PathDeleted { path: removed } => self.on_path_deleted(&removed),
            Action::FsOpError { op, path, error } => {
                tracing::warn!(op = op.label(), path = %path, %error, "file operation failed");
                self.report(error)
            }
            Action::RunCommand(_)
            | Action::Editor(_)
            | Action::OpenPath(_)
            | Action::Tick { .. }
            | Action::DismissNotification(_) => DispatchResult::unchanged(),
        }
    }

    fn expand_dir(&mut self, dir: &str) -> DispatchResult {
        let explorer = &mut self.state.explorer;
        let Some((is_dir, load_state)) = explorer
            .tree
            .node_at(dir)
            .map(|n| (n.is_dir(), n.load_state()))
        else {
            explorer.tree.forget_expanded(dir);
            explorer.take_expand_pending(dir);
            return self.report(ShellError::StalePath(dir.to_string()));
        };
        if !is_dir {
            tracing::debug!(path = dir, "expand on a file ignored");
            return DispatchResult::unchanged();
        }

        match load_state {
            LoadState::Loaded => {
                let was = explorer.tree.is_expanded(dir);
                let _ = explorer.tree.expand(dir);
                DispatchResult::changed(!was)
            }
            LoadState::Loading => {
                explorer.mark_expand_pending(dir);
                DispatchResult::unchanged()
            }
            LoadState::NotLoaded => match explorer.tree.begin_load(dir, false) {
                Ok(true) => {
                    explorer.mark_expand_pending(dir);
                    DispatchResult {
                        effects: vec![Effect::LoadDir(dir.to_string())],
                        state_changed: true,
                    }
                }
                _ => DispatchResult::unchanged(),
            },
        }
    }

    fn collapse_dir(&mut self, dir: &str) -> DispatchResult {
        let explorer = &mut self.state.explorer;
        let collapsed = explorer.tree.collapse(dir);
        let cancelled = explorer.take_expand_pending(dir);
        DispatchResult::changed(collapsed || cancelled)
    }

    /// Drops the cached listing's authority and asks for a fresh one.
    pub(super) fn refresh_dir(&mut self, dir: &str) -> DispatchResult {
        if !self.state.explorer.tree.is_dir(dir) {
            return self.report(ShellError::StalePath(dir.to_string()));
        }
        match self.state.explorer.tree.begin_load(dir, true) {
            Ok(true) => DispatchResult {
                effects: vec![Effect::LoadDir(dir.to_string())],
                state_changed: true,
            },
            _ => DispatchResult::unchanged(),
        }
    }

    fn create_file(&mut self, parent: &str, name: &str) -> DispatchResult {
        let parent = path::normalize(parent);
        let name = match validate_name(name) {
            Ok(name) => name,
            Err(err) => return self.report(err),
        };
        if !self.state.explorer.tree.is_dir(&parent) {
            return self.report(ShellError::StalePath(parent));
        }
        // Only a loaded listing can vouch that the name is free.
        if self.state.explorer.tree.load_state(&parent) != Some(LoadState::Loaded) {
            return self.report(ShellError::ApplicationError(format!(
                "'{parent}' is not loaded yet; expand it before creating files in it"
            )));
        }
        let target = path::join(&parent, name);
        if self.state.explorer.tree.contains(&target) {
            return self.report(ShellError::ApplicationError(format!(
                "'{target}' already exists"
            )));
        }
        DispatchResult::request(Effect::CreateFile(target))
    }

    fn rename_path(&mut self, from: &str, new_name: &str) -> DispatchResult {
        let from = path::normalize(from);
        if path::is_root(&from) {
            return self.report(ShellError::ApplicationError(
                "the project root cannot be renamed".to_string(),
            ));
        }
        let new_name = match validate_name(new_name) {
            Ok(name) => name,
            Err(err) => return self.report(err),
        };
        if !self.state.explorer.tree.contains(&from) {
            return self.report(ShellError::StalePath(from));
        }
        let to = path::join(path::parent(&from).unwrap_or(path::ROOT), new_name);
        if to == from {
            return DispatchResult::unchanged();
        }
        if self.state.explorer.tree.contains(&to) {
            return self.report(ShellError::ApplicationError(format!(
                "'{to}' already exists"
            )));
        }

        let editor = &self.state.editor;
        let unsaved = editor.open_file().filter(|o| path::is_within(&o.path, &from));
        if let Some(open) = unsaved {
            if open.is_dirty() || editor.scheduler().in_flight_revision(&open.path).is_some() {
                let message = format!("save '{}' before renaming it", open.path);
                return self.report(ShellError::ApplicationError(message));
            }
        }
        DispatchResult::request(Effect::RenamePath { from, to })
    }

    fn delete_path(&mut self, target: &str) -> DispatchResult {
        let target = path::normalize(target);
        if path::is_root(&target) {
            return self.report(ShellError::ApplicationError(
                "the project root cannot be deleted".to_string(),
            ));
        }
        if !self.state.explorer.tree.contains(&target) {
            return self.report(ShellError::StalePath(target));
        }
        DispatchResult::request(Effect::DeletePath(target))
    }

    fn on_path_renamed(&mut self, from: &str, to: &str) -> DispatchResult {
        if let Err(err) = self
            .state
            .explorer
            .tree
            .rename(from, path::file_name(to))
        {
            tracing::debug!(from, to, %err, "renamed node not materialized");
        }
        self.state.explorer.drop_pending_within(from);
        self.state.history.rebase(from, to);

        let mut effects = Vec::new();
        let editor = &mut self.state.editor;
        if let Some(open) = editor.open.as_mut() {
            if let Some(rebased) = path::rebase(&open.path, from, to) {
                open.path = rebased;
            }
        }
        if let Some(switch) = editor.switch.as_mut() {
            if let Some(rebased) = path::rebase(&switch.target, from, to) {
                switch.target = rebased;
            }
        }
        let rebound = editor
            .scheduler
            .pending()
            .and_then(|p| path::rebase(&p.path, from, to));
        if let Some(rebound) = rebound {
            effects.extend(editor.scheduler.reschedule(&rebound));
        }

        tracing::info!(from, to, "path renamed");
        DispatchResult::with_effects(effects)
    }

    fn on_path_deleted(&mut self, removed: &str) -> DispatchResult {
        if let Err(err) = self.state.explorer.tree.remove(removed) {
            tracing::debug!(path = removed, %err, "deleted node not materialized");
        }
        self.state.explorer.drop_pending_within(removed);
        self.state.history.forget(removed);
        self.state.editor.scheduler.discard_queued(removed);

        let switching_into = self
            .state
            .editor
            .switch()
            .is_some_and(|s| path::is_within(&s.target, removed));
        if switching_into {
            self.abort_switch();
        }

        let mut effects = Vec::new();
        let open_removed = self
            .state
            .editor
            .current_path()
            .is_some_and(|p| path::is_within(p, removed));
        if open_removed {
            let editor = &mut self.state.editor;
            effects.extend(editor.scheduler.cancel());
            editor.release();
            // Nothing left to flush; a switch away from the deleted file goes
            // straight to loading its target.
            let flushing = editor
                .switch
                .as_ref()
                .is_some_and(|s| matches!(s.stage, SwitchStage::Flushing { .. }));
            if flushing {
                let request = editor.next_read_request();
                if let Some(switch) = editor.switch.as_mut() {
                    switch.stage = SwitchStage::Loading { request };
                    effects.push(Effect::ReadFile {
                        request,
                        path: switch.target.clone(),
                    });
                }
            }
        }

        tracing::info!(path = removed, "path deleted");
        DispatchResult::with_effects(effects)
    }
}
