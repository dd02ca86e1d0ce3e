use super::message::AppMessage;
use crate::error::ShellError;
use crate::kernel::editor::{ReadRequestId, SaveTimerId};
use crate::kernel::services::ports::FileBackend;
use crate::kernel::FsOp;
use ropey::Rope;
use rustc_hash::FxHashMap;
use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Runs backend requests and save timers off the host thread. Each finished
/// task sends exactly one `AppMessage`.
pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    tx: Sender<AppMessage>,
    backend: Arc<dyn FileBackend>,
    timers: Arc<Mutex<FxHashMap<SaveTimerId, JoinHandle<()>>>>,
    /// Requests and armed timers whose message has not been sent yet.
    outstanding: Arc<AtomicUsize>,
}

impl AsyncRuntime {
    pub fn new(tx: Sender<AppMessage>, backend: Arc<dyn FileBackend>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        tracing::info!(backend = backend.name(), "runtime started");
        Ok(Self {
            runtime,
            tx,
            backend,
            timers: Arc::new(Mutex::new(FxHashMap::default())),
            outstanding: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// True while some request or timer may still produce a message.
    pub fn is_busy(&self) -> bool {
        self.outstanding.load(Ordering::Acquire) > 0
    }

    pub fn armed_timers(&self) -> usize {
        self.timers.lock().map(|t| t.len()).unwrap_or(0)
    }

    /// Spawns one backend call that resolves to its completion message.
    fn request<F, Fut>(&self, task: F)
    where
        F: FnOnce(Arc<dyn FileBackend>) -> Fut,
        Fut: Future<Output = AppMessage> + Send + 'static,
    {
        let tx = self.tx.clone();
        let outstanding = Arc::clone(&self.outstanding);
        let fut = task(Arc::clone(&self.backend));
        outstanding.fetch_add(1, Ordering::AcqRel);
        self.runtime.spawn(async move {
            let msg = fut.await;
            let _ = tx.send(msg);
            outstanding.fetch_sub(1, Ordering::AcqRel);
        });
    }

    pub fn load_dir(&self, path: String) {
        self.request(move |backend| async move {
            match backend.list_directory(&path).await {
                Ok(entries) => AppMessage::DirLoaded { path, entries },
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "list failed");
                    AppMessage::DirLoadError {
                        path,
                        error: e.into(),
                    }
                }
            }
        });
    }

    pub fn read_file(&self, request: ReadRequestId, path: String) {
        self.request(move |backend| async move {
            match backend.read_file(&path).await {
                Ok(content) => AppMessage::FileLoaded {
                    request,
                    path,
                    content,
                },
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "read failed");
                    AppMessage::FileLoadError {
                        request,
                        path,
                        error: e.into(),
                    }
                }
            }
        });
    }

    pub fn write_file(&self, path: String, content: Rope, revision: u64) {
        self.request(move |backend| async move {
            let result = backend
                .write_file(&path, content.to_string())
                .await
                .map_err(ShellError::from);
            if let Err(e) = &result {
                tracing::warn!(path = %path, revision, error = %e, "write failed");
            }
            AppMessage::FileSaved {
                path,
                revision,
                result,
            }
        });
    }

    pub fn create_file(&self, path: String) {
        self.request(move |backend| async move {
            match backend.write_file(&path, String::new()).await {
                Ok(()) => AppMessage::PathCreated { path },
                Err(e) => AppMessage::FsOpError {
                    op: FsOp::Create,
                    path,
                    error: e.into(),
                },
            }
        });
    }

    pub fn rename_path(&self, from: String, to: String) {
        self.request(move |backend| async move {
            match backend.rename_file(&from, &to).await {
                Ok(()) => AppMessage::PathRenamed { from, to },
                Err(e) => AppMessage::FsOpError {
                    op: FsOp::Rename,
                    path: from,
                    error: e.into(),
                },
            }
        });
    }

    pub fn delete_path(&self, path: String) {
        self.request(move |backend| async move {
            match backend.delete_file(&path).await {
                Ok(()) => AppMessage::PathDeleted { path },
                Err(e) => AppMessage::FsOpError {
                    op: FsOp::Delete,
                    path,
                    error: e.into(),
                },
            }
        });
    }

    /// Arms a one-shot timer that reports `SaveTimerFired` after `delay`.
    pub fn schedule_save(&self, timer: SaveTimerId, delay: Duration) {
        let Ok(mut timers) = self.timers.lock() else {
            return;
        };
        let tx = self.tx.clone();
        let registry = Arc::clone(&self.timers);
        let outstanding = Arc::clone(&self.outstanding);
        outstanding.fetch_add(1, Ordering::AcqRel);
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(AppMessage::SaveTimerFired { timer });
            let armed = registry
                .lock()
                .map(|mut t| t.remove(&timer).is_some())
                .unwrap_or(false);
            if armed {
                outstanding.fetch_sub(1, Ordering::AcqRel);
            }
        });
        // A re-used id replaces the earlier timer.
        if let Some(previous) = timers.insert(timer, handle) {
            previous.abort();
            self.outstanding.fetch_sub(1, Ordering::AcqRel);
        }
    }

    pub fn cancel_save(&self, timer: SaveTimerId) {
        let removed = self.timers.lock().ok().and_then(|mut t| t.remove(&timer));
        if let Some(handle) = removed {
            handle.abort();
            self.outstanding.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime.rs"]
mod tests;
