//! Settings persistence.
//!
//! [`SettingsStore`] is the load/save capability the host provides; the
//! shipped implementation, [`JsonFileStore`], keeps one pretty-printed JSON
//! document per widget instance (conventionally `Settings.json` in the
//! plugin's configuration folder).
//!
//! [`spawn_autosave`] wires a store to a [`SettingsHandle`] so every change
//! notification is written back to disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::{RotationSettings, SettingsHandle};

// ── SettingsStore ─────────────────────────────────────────────────────────────

/// Load/save capability for structured settings documents.
pub trait SettingsStore: Send + Sync + 'static {
    /// Load the document at `path`.  A missing document yields `T::default()`.
    fn load<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T>;

    /// Persist `value` at `path`, replacing any previous document.
    fn save<T: Serialize>(&self, path: &Path, value: &T) -> Result<()>;
}

// ── JsonFileStore ─────────────────────────────────────────────────────────────

/// Stores documents as JSON files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileStore;

impl SettingsStore for JsonFileStore {
    fn load<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T> {
        if !path.exists() {
            info!(
                "Settings file {} not found, using defaults",
                path.display()
            );
            return Ok(T::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open settings file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON settings file: {}", path.display()))
    }

    /// Writes to a sibling `*.tmp` file first and renames it into place, so
    /// a crash mid-write never leaves a truncated document behind.
    fn save<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(value).context("Failed to serialise settings")?;

        let tmp = temp_path(path);
        std::fs::write(&tmp, json)
            .with_context(|| format!("Cannot write settings file: {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("Cannot replace settings file: {}", path.display()))?;

        debug!("Saved settings to {}", path.display());
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

// ── Settings helpers ──────────────────────────────────────────────────────────

/// Load [`RotationSettings`] from `path`.
///
/// Out-of-range weekday codes are dropped while parsing, and a `baseDate`
/// without an offset is read as local time.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings<S: SettingsStore>(store: &S, path: &Path) -> Result<RotationSettings> {
    let settings: RotationSettings = store.load(path)?;

    info!(
        students = settings.roster().len(),
        days = ?settings.participating_days(),
        base_day = %settings.base_day(),
        offset = settings.offset(),
        "Loaded duty roster settings"
    );
    Ok(settings)
}

/// Save the current settings after every change notification.
///
/// Each save runs on the blocking thread pool.  Save failures are logged and
/// the task keeps running; the next change retries with the newer value.  The task ends when every
/// [`SettingsHandle`] has been dropped, or when the returned handle is
/// aborted.
pub fn spawn_autosave<S: SettingsStore>(
    settings: &SettingsHandle,
    store: S,
    path: PathBuf,
) -> JoinHandle<()> {
    let mut changes = settings.subscribe();
    let store = Arc::new(store);

    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let snapshot = changes.borrow_and_update().clone();
            let store = Arc::clone(&store);
            let path = path.clone();

            match tokio::task::spawn_blocking(move || store.save(&path, &snapshot)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Failed to save settings: {:#}", e),
                Err(e) => error!("Settings save task failed: {}", e),
            }
        }
        debug!("Settings autosave stopped");
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
