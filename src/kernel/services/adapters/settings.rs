//! Settings file and the per-user directory it lives in
//!
//! The directory is `$CODESHELL_HOME` when set, otherwise `codeshell` under
//! the platform data dir (`%APPDATA%`, `~/Library/Application Support`,
//! `$XDG_DATA_HOME` or `~/.local/share`). Logs go to its `logs/` child.

use crate::kernel::services::ports::settings::Settings;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "codeshell";
const LOG_DIR: &str = "logs";
const SETTINGS_FILE: &str = "settings.json";
/// Relocates the whole per-user directory.
pub const HOME_ENV: &str = "CODESHELL_HOME";
/// Overrides `backend_url` without touching the settings file.
pub const BACKEND_URL_ENV: &str = "CODESHELL_BACKEND_URL";

fn env_path(var: &str) -> Option<PathBuf> {
    non_empty_path(std::env::var_os(var))
}

fn non_empty_path(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn platform_data_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        env_path("APPDATA")
    } else if cfg!(target_os = "macos") {
        env_path("HOME").map(|home| home.join("Library").join("Application Support"))
    } else {
        env_path("XDG_DATA_HOME").or_else(|| env_path("HOME").map(|h| h.join(".local").join("share")))
    }
}

fn resolve_config_dir(home: Option<PathBuf>, data_dir: Option<PathBuf>) -> Option<PathBuf> {
    home.or_else(|| data_dir.map(|base| base.join(APP_DIR)))
}

/// Directory holding `settings.json` and `logs/`.
pub fn get_config_dir() -> Option<PathBuf> {
    resolve_config_dir(env_path(HOME_ENV), platform_data_dir())
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(LOG_DIR))
}

pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let dir = get_log_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no per-user directory for logs")
    })?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn get_settings_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(SETTINGS_FILE))
}

pub fn ensure_settings_file() -> std::io::Result<PathBuf> {
    let path = get_settings_path().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no per-user directory for settings",
        )
    })?;
    write_default_settings(&path)?;
    Ok(path)
}

fn write_default_settings(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content =
            serde_json::to_string_pretty(&Settings::default()).unwrap_or_else(|_| "{}".to_string());
        std::fs::write(path, content)?;
    }
    Ok(())
}

/// Reads the user settings, falling back to defaults when the file is missing
/// or malformed. The backend URL environment override always wins.
pub fn load_settings() -> Settings {
    let mut settings = get_settings_path()
        .and_then(|path| load_settings_from(&path))
        .unwrap_or_default();
    if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
        apply_backend_override(&mut settings, &url);
    }
    settings
}

pub fn load_settings_from(path: &Path) -> Option<Settings> {
    let data = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings");
            None
        }
    }
}

fn apply_backend_override(settings: &mut Settings, url: &str) {
    let url = url.trim();
    if !url.is_empty() {
        settings.backend_url = url.to_string();
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/settings.rs"]
mod tests;
