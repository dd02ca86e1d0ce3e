use rustc_hash::FxHashSet;
use std::time::{Duration, Instant};

use crate::error::{ErrorKind, ShellError};
use crate::kernel::editor::EditorSession;
use crate::kernel::services::ports::KernelConfig;
use crate::models::{path, FileTree, NavigationHistory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: ErrorKind,
    pub message: String,
    pub created_at: Instant,
}

/// Transient, dismissible failure reports.
#[derive(Debug)]
pub struct NotificationState {
    items: Vec<Notification>,
    next_id: u64,
    ttl: Duration,
}

impl NotificationState {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            ttl,
        }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, error: &ShellError) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        tracing::warn!(kind = ?error.kind(), %error, "notification");
        self.items.push(Notification {
            id,
            kind: error.kind(),
            message: error.to_string(),
            created_at: Instant::now(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        let ttl = self.ttl;
        self.items
            .retain(|n| now.saturating_duration_since(n.created_at) < ttl);
        self.items.len() != before
    }
}

pub struct ExplorerState {
    pub tree: FileTree,
    /// Directories whose expansion waits for their first listing.
    pending_expand: FxHashSet<String>,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self::new(FileTree::new())
    }
}

impl ExplorerState {
    pub fn new(tree: FileTree) -> Self {
        Self {
            tree,
            pending_expand: FxHashSet::default(),
        }
    }

    pub fn is_expand_pending(&self, path: &str) -> bool {
        self.pending_expand.contains(path)
    }

    pub(crate) fn mark_expand_pending(&mut self, path: &str) {
        self.pending_expand.insert(path.to_string());
    }

    pub(crate) fn take_expand_pending(&mut self, path: &str) -> bool {
        self.pending_expand.remove(path)
    }

    pub(crate) fn clear_expand_pending(&mut self) {
        self.pending_expand.clear();
    }

    pub(crate) fn drop_pending_within(&mut self, ancestor: &str) {
        self.pending_expand.retain(|p| !path::is_within(p, ancestor));
    }
}

pub struct AppState {
    pub explorer: ExplorerState,
    pub editor: EditorSession,
    pub history: NavigationHistory,
    pub notifications: NotificationState,
    pub config: KernelConfig,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(KernelConfig::default())
    }
}

impl AppState {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            explorer: ExplorerState::default(),
            editor: EditorSession::new(config.autosave_delay),
            history: NavigationHistory::new(config.history_capacity),
            notifications: NotificationState::new(config.notification_ttl),
            config,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
