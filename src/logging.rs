use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use codeshell::kernel::services::adapters::ensure_log_dir;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "codeshell.log";
const DEFAULT_FILTER: &str = "codeshell=info";

/// Last formatted lines, kept in memory for the `logs` command.
#[derive(Clone)]
pub struct LogTail {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogTail {
    fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Up to `n` most recent lines, oldest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.iter().skip(lines.len().saturating_sub(n)).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn push(&self, text: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            for line in text.lines().filter(|l| !l.is_empty()) {
                if lines.len() == self.capacity {
                    lines.pop_front();
                }
                lines.push_back(line.to_string());
            }
        }
    }
}

/// The fmt layer hands over one whole event per `write` call.
impl io::Write for LogTail {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.push(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogTail {
    type Writer = LogTail;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
    tail: LogTail,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn tail(&self) -> LogTail {
        self.tail.clone()
    }
}

/// Installs the global subscriber: a daily rolling `codeshell.log` plus an
/// in-memory tail of `tail_capacity` lines. Keep the guard alive until exit.
pub fn init(tail_capacity: usize) -> Option<LoggingGuard> {
    let log_dir = ensure_log_dir()
        .or_else(|_| {
            let dir = std::env::temp_dir().join("codeshell").join("logs");
            std::fs::create_dir_all(&dir).map(|_| dir)
        })
        .ok()?;

    let (file, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, LOG_FILE));
    let tail = LogTail::new(tail_capacity.max(1));

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(file.and(tail.clone()))
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    if tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_err()
    {
        return None;
    }

    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "panic");
    }));
    tracing::info!(log_dir = %log_dir.display(), "logging to file");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
        tail,
    })
}

#[cfg(test)]
#[path = "../tests/unit/logging.rs"]
mod tests;
