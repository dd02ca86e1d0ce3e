//! Editor session bridge: open/switch/close and the save pipeline.

use crate::error::ShellError;
use crate::kernel::editor::{EditorAction, OpenOrigin, Switch, SwitchStage};
use crate::kernel::Effect;
use crate::models::{path, NavigationEntry};

use super::DispatchResult;

impl super::Store {
    pub(super) fn reduce_editor_action(&mut self, action: EditorAction) -> DispatchResult {
        match action {
            EditorAction::SetCursorLine(line) => {
                if self.state.editor.switch.is_some() {
                    return DispatchResult::unchanged();
                }
                let Some(buffer) = self.state.editor.buffer_mut() else {
                    return DispatchResult::unchanged();
                };
                let prev = buffer.cursor_line();
                buffer.set_cursor_line(line);
                DispatchResult::changed(buffer.cursor_line() != prev)
            }
            EditorAction::SaveTimerFired { timer } => self.on_save_timer(timer),
            EditorAction::FileLoaded {
                request,
                path,
                content,
            } => self.on_file_loaded(request, &path, &content),
            EditorAction::FileLoadError {
                request,
                path,
                error,
            } => {
                let matches = self.state.editor.switch.as_ref().is_some_and(|s| {
                    s.stage == SwitchStage::Loading { request }
                });
                if !matches {
                    tracing::debug!(path = %path, "dropping stale read failure");
                    return DispatchResult::unchanged();
                }
                self.abort_switch();
                self.report(error)
            }
            EditorAction::FileSaved {
                path,
                revision,
                result,
            } => self.on_file_saved(&path, revision, result),
            edit => self.apply_edit(edit),
        }
    }

    pub(super) fn open_path(&mut self, raw: &str) -> DispatchResult {
        let target = path::normalize(raw);
        if self.state.explorer.tree.is_dir(&target) {
            return self.report(ShellError::ApplicationError(format!(
                "'{target}' is a directory"
            )));
        }
        self.begin_open(target, OpenOrigin::New)
    }

    /// Moves the history cursor and opens the entry it lands on.
    ///
    /// Entries are only recorded when a file is left, so the cursor sits on
    /// the file opened just before the current one. With `[a, b]` and `c`
    /// open, Back opens `a`, not `b`. Opening a new file after going Back
    /// records the file being left again, even if it is already an entry.
    pub(super) fn navigate_history(&mut self, forward: bool) -> DispatchResult {
        let previous_cursor = self.state.history.cursor();
        let entry = if forward {
            self.state.history.go_forward()
        } else {
            self.state.history.go_back()
        };
        match entry {
            Ok(entry) => self.begin_open(
                entry.file_path,
                OpenOrigin::History {
                    previous_cursor,
                    cursor_line: entry.cursor_line,
                },
            ),
            Err(err) => self.report(err),
        }
    }

    /// Explicit save: skip the idle window and write now.
    pub(super) fn save_now(&mut self) -> DispatchResult {
        if self.state.editor.switch.is_some() {
            return DispatchResult::unchanged();
        }
        let mut effects = Vec::new();
        if self.flush_open_file(&mut effects).is_none() {
            return DispatchResult::unchanged();
        }
        DispatchResult {
            effects,
            state_changed: false,
        }
    }

    /// Open → Empty. Pending edits are discarded, in-flight writes complete.
    pub(super) fn close_file(&mut self) -> DispatchResult {
        let mut state_changed = self.abort_switch();
        let effects: Vec<Effect> = self.state.editor.scheduler.cancel().into_iter().collect();
        if let Some(closed) = self.state.editor.release() {
            tracing::info!(
                path = %closed.path,
                discarded = closed.is_dirty(),
                "file closed"
            );
            state_changed = true;
        }
        DispatchResult {
            effects,
            state_changed,
        }
    }

    fn begin_open(&mut self, target: String, origin: OpenOrigin) -> DispatchResult {
        let mut aborted = false;
        if let Some(current) = self.state.editor.switch.as_ref().map(|s| s.origin) {
            let same_target = self
                .state
                .editor
                .switch
                .as_ref()
                .is_some_and(|s| s.target == target);
            if same_target {
                let merged = self.merge_origin(current, origin);
                if let Some(switch) = self.state.editor.switch.as_mut() {
                    switch.origin = merged;
                }
                return DispatchResult::changed(merged != current);
            }
            if self.state.editor.current_path() != Some(target.as_str()) {
                return self.retarget(target, current, origin);
            }
            // Back to the file that never left: drop the switch.
            aborted = self.abort_switch();
        }

        if self.state.editor.current_path() == Some(target.as_str()) {
            if let OpenOrigin::History { cursor_line, .. } = origin {
                if let Some(buffer) = self.state.editor.buffer_mut() {
                    buffer.set_cursor_line(cursor_line);
                }
                return DispatchResult::changed(true);
            }
            return DispatchResult::changed(aborted);
        }

        let mut effects = Vec::new();
        let stage = match self.flush_open_file(&mut effects) {
            Some(revision) => SwitchStage::Flushing { revision },
            None => {
                let request = self.state.editor.next_read_request();
                effects.push(Effect::ReadFile {
                    request,
                    path: target.clone(),
                });
                SwitchStage::Loading { request }
            }
        };
        tracing::debug!(path = %target, ?stage, "switch started");
        self.state.editor.switch = Some(Switch {
            target,
            stage,
            origin,
        });
        DispatchResult::with_effects(effects)
    }

    fn retarget(
        &mut self,
        target: String,
        current: OpenOrigin,
        incoming: OpenOrigin,
    ) -> DispatchResult {
        let origin = self.merge_origin(current, incoming);
        let request = self.state.editor.next_read_request();
        let Some(switch) = self.state.editor.switch.as_mut() else {
            return DispatchResult::unchanged();
        };
        tracing::debug!(from = %switch.target, to = %target, "switch retargeted");
        switch.target = target.clone();
        switch.origin = origin;
        match switch.stage {
            SwitchStage::Flushing { .. } => DispatchResult::changed(true),
            SwitchStage::Loading { .. } => {
                switch.stage = SwitchStage::Loading { request };
                DispatchResult::with_effects(vec![Effect::ReadFile {
                    request,
                    path: target,
                }])
            }
        }
    }

    fn merge_origin(&mut self, current: OpenOrigin, incoming: OpenOrigin) -> OpenOrigin {
        match (current, incoming) {
            (
                OpenOrigin::History {
                    previous_cursor, ..
                },
                OpenOrigin::History { cursor_line, .. },
            ) => OpenOrigin::History {
                previous_cursor,
                cursor_line,
            },
            (OpenOrigin::History { previous_cursor, .. }, OpenOrigin::New) => {
                self.state.history.restore_cursor(previous_cursor);
                OpenOrigin::New
            }
            (OpenOrigin::New, incoming) => incoming,
        }
    }

    /// Cancels an outstanding switch, leaving the session as it was.
    pub(super) fn abort_switch(&mut self) -> bool {
        let Some(switch) = self.state.editor.switch.take() else {
            return false;
        };
        if let OpenOrigin::History {
            previous_cursor, ..
        } = switch.origin
        {
            self.state.history.restore_cursor(previous_cursor);
        }
        tracing::debug!(path = %switch.target, "switch abandoned");
        true
    }

    /// Issues (or joins) a write of the open file's current revision.
    /// Returns the revision to wait for, or `None` when nothing is unsaved.
    fn flush_open_file(&mut self, effects: &mut Vec<Effect>) -> Option<u64> {
        let editor = &mut self.state.editor;
        let open = editor.open.as_ref().filter(|o| o.is_dirty())?;
        let (path, revision) = (open.path.clone(), open.revision);
        let content = editor.buffers.get(open.buffer)?.snapshot();

        effects.extend(editor.scheduler.cancel());
        if editor.scheduler.last_requested_revision(&path) != Some(revision) {
            effects.extend(editor.scheduler.request_write(&path, content, revision));
        }
        tracing::debug!(path = %path, revision, "flush");
        Some(revision)
    }

    fn apply_edit(&mut self, edit: EditorAction) -> DispatchResult {
        if self.state.editor.switch.is_some() {
            tracing::debug!("edit ignored while switching files");
            return DispatchResult::unchanged();
        }
        let Some(buffer) = self.state.editor.buffer_mut() else {
            return DispatchResult::unchanged();
        };
        match edit {
            EditorAction::SetContent(text) => buffer.set_text(&text),
            EditorAction::InsertText { char_idx, text } => buffer.insert(char_idx, &text),
            EditorAction::AppendText(text) => buffer.append(&text),
            EditorAction::DeleteRange { start, end } => buffer.delete(start, end),
            _ => return DispatchResult::unchanged(),
        }
        let revision = self.state.editor.next_revision();
        let Some(open) = self.state.editor.open.as_mut() else {
            return DispatchResult::unchanged();
        };
        open.revision = revision;
        let path = open.path.clone();
        DispatchResult::with_effects(self.state.editor.scheduler.reschedule(&path))
    }

    fn on_save_timer(&mut self, timer: crate::kernel::editor::SaveTimerId) -> DispatchResult {
        let editor = &mut self.state.editor;
        let Some(bound) = editor.scheduler.timer_fired(timer) else {
            tracing::debug!(?timer, "stale save timer");
            return DispatchResult::unchanged();
        };
        let Some(open) = editor
            .open
            .as_ref()
            .filter(|o| o.path == bound && o.is_dirty())
        else {
            return DispatchResult::unchanged();
        };
        let revision = open.revision;
        if editor.scheduler.last_requested_revision(&bound) == Some(revision) {
            return DispatchResult::unchanged();
        }
        let Some(content) = editor.buffers.get(open.buffer).map(|b| b.snapshot()) else {
            return DispatchResult::unchanged();
        };
        DispatchResult {
            effects: editor
                .scheduler
                .request_write(&bound, content, revision)
                .into_iter()
                .collect(),
            state_changed: false,
        }
    }

    fn on_file_saved(
        &mut self,
        saved_path: &str,
        revision: u64,
        result: Result<(), ShellError>,
    ) -> DispatchResult {
        let mut effects: Vec<Effect> = self
            .state
            .editor
            .scheduler
            .on_saved(saved_path)
            .into_iter()
            .collect();
        let mut state_changed = false;

        let is_open = self.state.editor.current_path() == Some(saved_path);
        match &result {
            Ok(()) => {
                tracing::debug!(path = saved_path, revision, "saved");
                if let Some(open) = self.state.editor.open.as_mut().filter(|_| is_open) {
                    if revision > open.saved_revision {
                        open.saved_revision = revision;
                        state_changed = true;
                    }
                }
            }
            Err(err) => {
                self.state.notifications.push(err);
                state_changed = true;
            }
        }

        let waiting = match self.state.editor.switch.as_ref() {
            Some(Switch {
                stage: SwitchStage::Flushing { revision: pending },
                ..
            }) if is_open => *pending,
            _ => {
                return DispatchResult {
                    effects,
                    state_changed,
                }
            }
        };

        match result {
            Ok(()) => {
                let flushed = self
                    .state
                    .editor
                    .open
                    .as_ref()
                    .is_some_and(|o| o.saved_revision >= waiting);
                if flushed {
                    let request = self.state.editor.next_read_request();
                    if let Some(switch) = self.state.editor.switch.as_mut() {
                        switch.stage = SwitchStage::Loading { request };
                        effects.push(Effect::ReadFile {
                            request,
                            path: switch.target.clone(),
                        });
                        state_changed = true;
                    }
                }
            }
            Err(_) if revision >= waiting => {
                tracing::warn!(path = saved_path, "flush failed, staying on file");
                state_changed |= self.abort_switch();
            }
            Err(_) => {}
        }

        DispatchResult {
            effects,
            state_changed,
        }
    }

    fn on_file_loaded(
        &mut self,
        request: crate::kernel::editor::ReadRequestId,
        loaded_path: &str,
        content: &str,
    ) -> DispatchResult {
        let matches = self
            .state
            .editor
            .switch
            .as_ref()
            .is_some_and(|s| s.stage == SwitchStage::Loading { request });
        if !matches {
            tracing::debug!(path = loaded_path, "dropping stale read");
            return DispatchResult::unchanged();
        }
        let Some(switch) = self.state.editor.switch.take() else {
            return DispatchResult::unchanged();
        };

        let departing = self
            .state
            .editor
            .open
            .as_ref()
            .map(|o| o.path.clone())
            .zip(self.state.editor.cursor_line());
        if let (OpenOrigin::New, Some((file_path, cursor_line))) = (switch.origin, departing) {
            self.state
                .history
                .push(NavigationEntry::new(file_path, cursor_line));
        }

        let effects: Vec<Effect> = self.state.editor.scheduler.cancel().into_iter().collect();
        self.state.editor.release();
        self.state.editor.bind(switch.target, content);
        if let OpenOrigin::History { cursor_line, .. } = switch.origin {
            if let Some(buffer) = self.state.editor.buffer_mut() {
                buffer.set_cursor_line(cursor_line);
            }
        }
        tracing::info!(path = self.state.editor.current_path().unwrap_or_default(), "file opened");

        DispatchResult {
            effects,
            state_changed: true,
        }
    }
}
