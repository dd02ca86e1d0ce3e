//! Back/forward history of visited file positions

use super::path;
use crate::error::{Result, ShellError};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    pub file_path: String,
    pub cursor_line: usize,
}

impl NavigationEntry {
    pub fn new(file_path: impl Into<String>, cursor_line: usize) -> Self {
        Self {
            file_path: file_path.into(),
            cursor_line,
        }
    }
}

/// Browser-style history: pushing while not at the tail discards the
/// forward entries; exceeding the capacity drops the oldest entry.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: VecDeque<NavigationEntry>,
    cursor: Option<usize>,
    capacity: usize,
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl NavigationHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&NavigationEntry> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn entries(&self) -> impl Iterator<Item = &NavigationEntry> {
        self.entries.iter()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    pub fn push(&mut self, entry: NavigationEntry) {
        if let Some(cursor) = self.cursor {
            self.entries.truncate(cursor + 1);
        }
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    pub fn go_back(&mut self) -> Result<NavigationEntry> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                self.entries.get(c - 1).cloned().ok_or(ShellError::NoHistory)
            }
            _ => Err(ShellError::NoHistory),
        }
    }

    pub fn go_forward(&mut self) -> Result<NavigationEntry> {
        match self.cursor {
            Some(c) if c + 1 < self.entries.len() => {
                self.cursor = Some(c + 1);
                self.entries.get(c + 1).cloned().ok_or(ShellError::NoHistory)
            }
            _ => Err(ShellError::NoHistory),
        }
    }

    /// Puts the cursor back after a history-driven open failed.
    pub fn restore_cursor(&mut self, cursor: Option<usize>) {
        self.cursor = match cursor {
            Some(c) if c < self.entries.len() => Some(c),
            Some(_) => self.entries.len().checked_sub(1),
            None if self.entries.is_empty() => None,
            None => Some(0),
        };
    }

    /// Drops entries for `removed` or anything beneath it. The cursor stays on
    /// the same entry when it survives, otherwise on the nearest older one.
    pub fn forget(&mut self, removed: &str) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let mut kept = VecDeque::with_capacity(self.entries.len());
        let mut kept_up_to_cursor = 0usize;
        for (idx, entry) in self.entries.drain(..).enumerate() {
            if path::is_within(&entry.file_path, removed) {
                continue;
            }
            if idx <= cursor {
                kept_up_to_cursor += 1;
            }
            kept.push_back(entry);
        }
        self.entries = kept;
        self.cursor = if self.entries.is_empty() {
            None
        } else {
            Some(kept_up_to_cursor.saturating_sub(1))
        };
    }

    /// Rewrites entries after a rename of `from` to `to`.
    pub fn rebase(&mut self, from: &str, to: &str) {
        for entry in self.entries.iter_mut() {
            if let Some(rebased) = path::rebase(&entry.file_path, from, to) {
                entry.file_path = rebased;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/nav_history.rs"]
mod tests;
