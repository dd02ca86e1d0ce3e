use crate::error::ShellError;

use super::{ReadRequestId, SaveTimerId};

/// Editing-surface notifications and editor I/O completions.
#[derive(Debug, Clone)]
pub enum EditorAction {
    /// Surface replaced the whole content.
    SetContent(String),
    InsertText {
        char_idx: usize,
        text: String,
    },
    AppendText(String),
    DeleteRange {
        start: usize,
        end: usize,
    },
    SetCursorLine(usize),
    SaveTimerFired {
        timer: SaveTimerId,
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
}
