use std::time::Instant;

use crate::core::Command;
use crate::error::ShellError;
use crate::kernel::editor::EditorAction;
use crate::models::DirEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    Create,
    Rename,
    Delete,
}

impl FsOp {
    pub fn label(self) -> &'static str {
        match self {
            FsOp::Create => "create",
            FsOp::Rename => "rename",
            FsOp::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    RunCommand(Command),
    Editor(EditorAction),
    OpenPath(String),
    Tick {
        now: Instant,
    },
    DismissNotification(u64),
    ExplorerLoadRoot,
    ExplorerExpand(String),
    ExplorerCollapse(String),
    ExplorerToggle(String),
    ExplorerRefresh(String),
    ExplorerCreateFile {
        parent: String,
        name: String,
    },
    ExplorerRename {
        from: String,
        new_name: String,
    },
    ExplorerDelete(String),
    DirLoaded {
        path: String,
        entries: Vec<DirEntry>,
    },
    DirLoadError {
        path: String,
        error: ShellError,
    },
    PathCreated {
        path: String,
    },
    PathRenamed {
        from: String,
        to: String,
    },
    PathDeleted {
        path: String,
    },
    FsOpError {
        op: FsOp,
        path: String,
        error: ShellError,
    },
}
