use ropey::Rope;
use std::time::Duration;

use super::editor::{ReadRequestId, SaveTimerId};

/// I/O requested by the store. Every effect that talks to the backend
/// eventually comes back as exactly one completion action.
#[derive(Debug, Clone)]
pub enum Effect {
    LoadDir(String),
    ReadFile {
        request: ReadRequestId,
        path: String,
    },
    WriteFile {
        path: String,
        content: Rope,
        revision: u64,
    },
    CreateFile(String),
    RenamePath {
        from: String,
        to: String,
    },
    DeletePath(String),
    ScheduleSave {
        timer: SaveTimerId,
        path: String,
        delay: Duration,
    },
    CancelSave {
        timer: SaveTimerId,
    },
}
