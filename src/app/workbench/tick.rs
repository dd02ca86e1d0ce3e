use super::Workbench;
use crate::kernel::Action as KernelAction;
use std::sync::mpsc;
use std::time::{Duration, Instant};

const SETTLE_POLL: Duration = Duration::from_millis(10);

impl Workbench {
    /// Called by the host loop: drains runtime messages and expires
    /// notifications.
    pub fn tick(&mut self) -> bool {
        let mut changed = self.poll_runtime();
        changed |= self.dispatch_kernel(KernelAction::Tick {
            now: Instant::now(),
        });
        changed
    }

    pub fn poll_runtime(&mut self) -> bool {
        let mut changed = false;
        let mut drained = 0usize;
        loop {
            if drained >= super::MAX_MESSAGE_DRAIN_PER_TICK {
                break;
            }
            match self.rx.try_recv() {
                Ok(msg) => {
                    drained += 1;
                    changed |= self.handle_message(msg);
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    /// Blocks up to `timeout` for the next message, then drains the rest.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => {
                let changed = self.handle_message(msg);
                self.poll_runtime() || changed
            }
            Err(_) => false,
        }
    }

    /// Pumps messages until no request or save timer is outstanding.
    /// Returns `false` if `timeout` elapsed first.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.poll_runtime();
            if !self.runtime.is_busy() {
                // Everything sent before the counter dropped is queued by now.
                let late = self.rx.try_recv();
                match late {
                    Ok(msg) => {
                        self.handle_message(msg);
                        continue;
                    }
                    Err(_) => return true,
                }
            }
            let now = Instant::now();
            if now >= deadline {
                tracing::debug!("settle timed out");
                return false;
            }
            self.wait(SETTLE_POLL.min(deadline - now));
        }
    }
}
