use crate::error::ShellError;
use crate::kernel::editor::{ReadRequestId, SaveTimerId};
use crate::kernel::FsOp;
use crate::models::DirEntry;

/// Completions reported by the runtime, in the order they happened.
#[derive(Debug)]
pub enum AppMessage {
    DirLoaded {
        path: String,
        entries: Vec<DirEntry>,
    },
    DirLoadError {
        path: String,
        error: ShellError,
    },
    FileLoaded {
        request: ReadRequestId,
        path: String,
        content: String,
    },
    FileLoadError {
        request: ReadRequestId,
        path: String,
        error: ShellError,
    },
    FileSaved {
        path: String,
        revision: u64,
        result: Result<(), ShellError>,
    },
    SaveTimerFired {
        timer: SaveTimerId,
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
