use std::time::Duration;

use super::settings::Settings;
use crate::models::DEFAULT_HISTORY_CAPACITY;

pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 2000;
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 5000;

/// Tunables the store reads while reducing.
#[derive(Clone, Debug)]
pub struct KernelConfig {
    pub autosave_delay: Duration,
    pub notification_ttl: Duration,
    pub history_capacity: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            autosave_delay: Duration::from_millis(DEFAULT_AUTOSAVE_DELAY_MS),
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_TTL_MS),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl KernelConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            autosave_delay: Duration::from_millis(settings.autosave_delay_ms),
            notification_ttl: Duration::from_millis(settings.notification_ttl_ms),
            history_capacity: settings.history_capacity.max(1),
        }
    }

    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave_delay = delay;
        self
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/config.rs"]
mod tests;
