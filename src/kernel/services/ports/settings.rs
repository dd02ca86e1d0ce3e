use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::config::{DEFAULT_AUTOSAVE_DELAY_MS, DEFAULT_NOTIFICATION_TTL_MS};
use crate::models::DEFAULT_HISTORY_CAPACITY;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default)]
    pub ai: AiSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            notification_ttl_ms: DEFAULT_NOTIFICATION_TTL_MS,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            ai: AiSettings::default(),
        }
    }
}

/// Chat collaborator selection. Read-only for the core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub api_keys: FxHashMap<String, String>,
}

impl AiSettings {
    /// Key stored for the selected model, if any.
    pub fn api_key(&self) -> Option<&str> {
        let model = self.model.as_deref()?;
        self.api_keys
            .get(model)
            .map(String::as_str)
            .filter(|k| !k.trim().is_empty())
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_autosave_delay_ms() -> u64 {
    DEFAULT_AUTOSAVE_DELAY_MS
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_notification_ttl_ms() -> u64 {
    DEFAULT_NOTIFICATION_TTL_MS
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
