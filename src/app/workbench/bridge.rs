use super::Workbench;
use crate::kernel::services::adapters::AppMessage;
use crate::kernel::{Action as KernelAction, EditorAction, Effect as KernelEffect};

impl Workbench {
    pub(super) fn dispatch_kernel(&mut self, action: KernelAction) -> bool {
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.run_effect(effect);
        }
        result.state_changed
    }

    fn run_effect(&mut self, effect: KernelEffect) {
        match effect {
            KernelEffect::LoadDir(path) => self.runtime.load_dir(path),
            KernelEffect::ReadFile { request, path } => self.runtime.read_file(request, path),
            KernelEffect::WriteFile {
                path,
                content,
                revision,
            } => self.runtime.write_file(path, content, revision),
            KernelEffect::CreateFile(path) => self.runtime.create_file(path),
            KernelEffect::RenamePath { from, to } => self.runtime.rename_path(from, to),
            KernelEffect::DeletePath(path) => self.runtime.delete_path(path),
            KernelEffect::ScheduleSave { timer, path, delay } => {
                tracing::trace!(?timer, path = %path, delay_ms = delay.as_millis() as u64, "arm save timer");
                self.runtime.schedule_save(timer, delay)
            }
            KernelEffect::CancelSave { timer } => self.runtime.cancel_save(timer),
        }
    }
}

pub(super) fn message_to_action(msg: AppMessage) -> KernelAction {
    match msg {
        AppMessage::DirLoaded { path, entries } => KernelAction::DirLoaded { path, entries },
        AppMessage::DirLoadError { path, error } => KernelAction::DirLoadError { path, error },
        AppMessage::FileLoaded {
            request,
            path,
            content,
        } => KernelAction::Editor(EditorAction::FileLoaded {
            request,
            path,
            content,
        }),
        AppMessage::FileLoadError {
            request,
            path,
            error,
        } => KernelAction::Editor(EditorAction::FileLoadError {
            request,
            path,
            error,
        }),
        AppMessage::FileSaved {
            path,
            revision,
            result,
        } => KernelAction::Editor(EditorAction::FileSaved {
            path,
            revision,
            result,
        }),
        AppMessage::SaveTimerFired { timer } => {
            KernelAction::Editor(EditorAction::SaveTimerFired { timer })
        }
        AppMessage::PathCreated { path } => KernelAction::PathCreated { path },
        AppMessage::PathRenamed { from, to } => KernelAction::PathRenamed { from, to },
        AppMessage::PathDeleted { path } => KernelAction::PathDeleted { path },
        AppMessage::FsOpError { op, path, error } => KernelAction::FsOpError { op, path, error },
    }
}
