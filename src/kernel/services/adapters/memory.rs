//! In-process file backend.
//!
//! Holds a flat map of canonical paths, records every request it serves and
//! can be told to fail or to answer slowly. Directories are implied by their
//! descendants or created explicitly with `with_dir`.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::kernel::services::ports::{BackendError, BackendFuture, FileBackend};
use crate::models::{path, DirEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendOp {
    List,
    Read,
    Write,
    Rename,
    Delete,
}

/// One served request, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendRequest {
    List(String),
    Read(String),
    Write { path: String, content: String },
    Rename { from: String, to: String },
    Delete(String),
}

#[derive(Debug, Clone)]
enum Entry {
    File(String),
    Dir,
}

#[derive(Default)]
struct Inner {
    entries: BTreeMap<String, Entry>,
    requests: Vec<BackendRequest>,
    failures: FxHashMap<(BackendOp, String), BackendError>,
    offline: bool,
}

impl Inner {
    fn check(&self, op: BackendOp, target: &str) -> Result<(), BackendError> {
        if self.offline {
            return Err(BackendError::Transport("backend unreachable".to_string()));
        }
        match self.failures.get(&(op, target.to_string())) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn is_dir(&self, target: &str) -> bool {
        path::is_root(target) || matches!(self.entries.get(target), Some(Entry::Dir))
    }

    fn ensure_parents(&mut self, target: &str) {
        let mut current = path::parent(target);
        while let Some(dir) = current.filter(|d| !path::is_root(d)) {
            self.entries.entry(dir.to_string()).or_insert(Entry::Dir);
            current = path::parent(dir);
        }
    }

    fn list(&self, dir: &str) -> Result<Vec<DirEntry>, BackendError> {
        if !self.is_dir(dir) {
            return Err(BackendError::Application(format!(
                "Error reading directory: {dir}"
            )));
        }
        Ok(self
            .entries
            .iter()
            .filter(|(p, _)| path::parent(p) == Some(dir))
            .map(|(p, entry)| DirEntry {
                name: path::file_name(p).to_string(),
                is_dir: matches!(entry, Entry::Dir),
            })
            .collect())
    }

    fn read(&self, file: &str) -> Result<String, BackendError> {
        match self.entries.get(file) {
            Some(Entry::File(content)) => Ok(content.clone()),
            Some(Entry::Dir) => Err(BackendError::Application(format!(
                "Error reading file: {file} is a directory"
            ))),
            None => Err(BackendError::Application(format!(
                "File does not exist: {file}"
            ))),
        }
    }

    fn write(&mut self, file: &str, content: String) -> Result<(), BackendError> {
        if self.is_dir(file) {
            return Err(BackendError::Application(format!(
                "Error writing file: {file} is a directory"
            )));
        }
        self.ensure_parents(file);
        self.entries.insert(file.to_string(), Entry::File(content));
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), BackendError> {
        if path::is_root(from) || !self.entries.contains_key(from) {
            return Err(BackendError::Application(format!(
                "Source file does not exist: {from}"
            )));
        }
        if self.entries.contains_key(to) {
            return Err(BackendError::Application(format!(
                "Destination already exists: {to}"
            )));
        }
        let moved: Vec<String> = self
            .entries
            .keys()
            .filter(|p| path::is_within(p, from))
            .cloned()
            .collect();
        for old in moved {
            if let (Some(entry), Some(new)) = (self.entries.remove(&old), path::rebase(&old, from, to)) {
                self.entries.insert(new, entry);
            }
        }
        self.ensure_parents(to);
        Ok(())
    }

    fn delete(&mut self, target: &str) -> Result<(), BackendError> {
        if path::is_root(target) || !self.entries.contains_key(target) {
            return Err(BackendError::Application(format!(
                "File does not exist: {target}"
            )));
        }
        let has_children = self
            .entries
            .keys()
            .any(|p| p != target && path::is_within(p, target));
        if has_children {
            return Err(BackendError::Application(format!(
                "Error deleting file: {target} is not empty"
            )));
        }
        self.entries.remove(target);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryFileBackend {
    inner: Mutex<Inner>,
    latency: Option<Duration>,
}

impl MemoryFileBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, file: &str, content: &str) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            let _ = inner.write(&path::normalize(file), content.to_string());
        }
        self
    }

    pub fn with_dir(self, dir: &str) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            let dir = path::normalize(dir);
            inner.ensure_parents(&dir);
            inner.entries.insert(dir, Entry::Dir);
        }
        self
    }

    /// Delays every answer, so tests can observe in-flight states.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes `op` on `target` fail with `error` until cleared.
    pub fn fail(&self, op: BackendOp, target: &str, error: BackendError) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failures.insert((op, path::normalize(target)), error);
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failures.clear();
        }
    }

    /// Every request fails with a transport error while offline.
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.offline = offline;
        }
    }

    pub fn requests(&self) -> Vec<BackendRequest> {
        self.inner
            .lock()
            .map(|inner| inner.requests.clone())
            .unwrap_or_default()
    }

    pub fn clear_requests(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.requests.clear();
        }
    }

    /// Stored content of a file, bypassing the request log.
    pub fn content(&self, file: &str) -> Option<String> {
        let inner = self.inner.lock().ok()?;
        match inner.entries.get(file) {
            Some(Entry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn exists(&self, target: &str) -> bool {
        self.inner
            .lock()
            .map(|inner| path::is_root(target) || inner.entries.contains_key(target))
            .unwrap_or(false)
    }

    async fn serve<T>(
        &self,
        op: BackendOp,
        target: &str,
        request: BackendRequest,
        apply: impl FnOnce(&mut Inner) -> Result<T, BackendError>,
    ) -> Result<T, BackendError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| BackendError::Transport("backend state poisoned".to_string()))?;
        inner.requests.push(request);
        inner.check(op, target)?;
        apply(&mut inner)
    }
}

impl FileBackend for MemoryFileBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn list_directory<'a>(&'a self, dir: &'a str) -> BackendFuture<'a, Vec<DirEntry>> {
        Box::pin(self.serve(
            BackendOp::List,
            dir,
            BackendRequest::List(dir.to_string()),
            move |inner| inner.list(dir),
        ))
    }

    fn read_file<'a>(&'a self, file: &'a str) -> BackendFuture<'a, String> {
        Box::pin(self.serve(
            BackendOp::Read,
            file,
            BackendRequest::Read(file.to_string()),
            move |inner| inner.read(file),
        ))
    }

    fn write_file<'a>(&'a self, file: &'a str, content: String) -> BackendFuture<'a, ()> {
        let request = BackendRequest::Write {
            path: file.to_string(),
            content: content.clone(),
        };
        Box::pin(self.serve(BackendOp::Write, file, request, move |inner| {
            inner.write(file, content)
        }))
    }

    fn rename_file<'a>(&'a self, from: &'a str, to: &'a str) -> BackendFuture<'a, ()> {
        let request = BackendRequest::Rename {
            from: from.to_string(),
            to: to.to_string(),
        };
        Box::pin(self.serve(BackendOp::Rename, from, request, move |inner| {
            inner.rename(from, to)
        }))
    }

    fn delete_file<'a>(&'a self, target: &'a str) -> BackendFuture<'a, ()> {
        Box::pin(self.serve(
            BackendOp::Delete,
            target,
            BackendRequest::Delete(target.to_string()),
            move |inner| inner.delete(target),
        ))
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/memory.rs"]
mod tests;
