use slotmap::{new_key_type, SlotMap};
use std::time::Duration;

use super::scheduler::SaveScheduler;
use crate::models::{LanguageHint, TextBuffer};

new_key_type! { pub struct BufferId; }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReadRequestId(pub u64);

/// Content buffers handed to the editing surface.
#[derive(Debug, Default)]
pub struct BufferStore {
    buffers: SlotMap<BufferId, TextBuffer>,
}

impl BufferStore {
    pub fn create(&mut self, content: &str, language: LanguageHint) -> BufferId {
        self.buffers.insert(TextBuffer::new(content, language))
    }

    pub fn get(&self, id: BufferId) -> Option<&TextBuffer> {
        self.buffers.get(id)
    }

    pub fn get_mut(&mut self, id: BufferId) -> Option<&mut TextBuffer> {
        self.buffers.get_mut(id)
    }

    pub fn dispose(&mut self, id: BufferId) -> bool {
        self.buffers.remove(id).is_some()
    }

    pub fn live_count(&self) -> usize {
        self.buffers.len()
    }
}

/// The file bound to the editing surface.
#[derive(Debug, Clone)]
pub struct OpenFile {
    pub path: String,
    pub buffer: BufferId,
    /// Bumped on every content change. Drawn from a session-wide counter, so
    /// a reopened file never reuses a revision of an earlier buffer.
    pub revision: u64,
    /// Highest revision the backend confirmed.
    pub saved_revision: u64,
}

impl OpenFile {
    pub fn is_dirty(&self) -> bool {
        self.revision > self.saved_revision
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchStage {
    /// Waiting for the departing file's write to land.
    Flushing { revision: u64 },
    /// Waiting for the target's content.
    Loading { request: ReadRequestId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOrigin {
    /// A fresh navigation; the departing file is pushed onto the history.
    New,
    /// Back/forward. Nothing is pushed; the history cursor is put back to
    /// `previous_cursor` if the open fails.
    History {
        previous_cursor: Option<usize>,
        cursor_line: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    pub target: String,
    pub stage: SwitchStage,
    pub origin: OpenOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Empty,
    Open,
    Switching,
}

/// Owner of the single live buffer, the open file identity and the save
/// scheduler. Only the store mutates it.
#[derive(Debug)]
pub struct EditorSession {
    pub(crate) buffers: BufferStore,
    pub(crate) open: Option<OpenFile>,
    pub(crate) switch: Option<Switch>,
    pub(crate) scheduler: SaveScheduler,
    next_request: u64,
    last_revision: u64,
}

impl EditorSession {
    pub fn new(autosave_delay: Duration) -> Self {
        Self {
            buffers: BufferStore::default(),
            open: None,
            switch: None,
            scheduler: SaveScheduler::new(autosave_delay),
            next_request: 1,
            last_revision: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.switch, &self.open) {
            (Some(_), _) => SessionPhase::Switching,
            (None, Some(_)) => SessionPhase::Open,
            (None, None) => SessionPhase::Empty,
        }
    }

    pub fn current_path(&self) -> Option<&str> {
        self.open.as_ref().map(|o| o.path.as_str())
    }

    pub fn open_file(&self) -> Option<&OpenFile> {
        self.open.as_ref()
    }

    pub fn switch(&self) -> Option<&Switch> {
        self.switch.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.open.as_ref().is_some_and(OpenFile::is_dirty)
    }

    pub fn buffer(&self) -> Option<&TextBuffer> {
        self.open.as_ref().and_then(|o| self.buffers.get(o.buffer))
    }

    pub fn text(&self) -> Option<String> {
        self.buffer().map(TextBuffer::text)
    }

    pub fn cursor_line(&self) -> Option<usize> {
        self.buffer().map(TextBuffer::cursor_line)
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.live_count()
    }

    pub fn scheduler(&self) -> &SaveScheduler {
        &self.scheduler
    }

    pub(crate) fn buffer_mut(&mut self) -> Option<&mut TextBuffer> {
        let id = self.open.as_ref()?.buffer;
        self.buffers.get_mut(id)
    }

    pub(crate) fn next_read_request(&mut self) -> ReadRequestId {
        let id = ReadRequestId(self.next_request);
        self.next_request += 1;
        id
    }

    /// Next content revision for the open file.
    pub(crate) fn next_revision(&mut self) -> u64 {
        self.last_revision += 1;
        self.last_revision
    }

    /// Releases the bound buffer and clears the open file.
    pub(crate) fn release(&mut self) -> Option<OpenFile> {
        let open = self.open.take()?;
        self.buffers.dispose(open.buffer);
        Some(open)
    }

    /// Creates a buffer for `path` and binds it.
    pub(crate) fn bind(&mut self, path: String, content: &str) -> &OpenFile {
        let buffer = self
            .buffers
            .create(content, LanguageHint::from_path(&path));
        let baseline = self.last_revision;
        self.open.insert(OpenFile {
            path,
            buffer,
            revision: baseline,
            saved_revision: baseline,
        })
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/state.rs"]
mod tests;
