/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Shared, observable settings.
//!
//! [`SettingsHandle`] owns the one live [`RotationSettings`] value of a
//! widget instance and notifies subscribers whenever it changes.
//!
//! ```text
//! settings page ──update()──►  SettingsHandle  ──changed()──►  autosave task
//!                                    │          ──changed()──►  DutyWidget
//!                                    └── snapshot() ──► RotationCalculator
//! ```
//!
//! The value sits inside a `tokio::sync::watch` channel.  Writers mutate it
//! under the channel's lock, so a roster import is a single step from the
//! point of view of any reader: `snapshot()` sees either the old roster or
//! the new one, never a partially filled list.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::info;

use super::weekdays::WeekdayPreset;
use super::{RotationSettings, SettingsError};

/// Cheaply clonable handle to the live settings.
#[derive(Debug, Clone)]
pub struct SettingsHandle {
    tx: Arc<watch::Sender<RotationSettings>>,
}

impl SettingsHandle {
    pub fn new(settings: RotationSettings) -> Self {
        let (tx, _rx) = watch::channel(settings);
        Self { tx: Arc::new(tx) }
    }

    /// A consistent copy of the current settings.
    pub fn snapshot(&self) -> RotationSettings {
        self.tx.borrow().clone()
    }

    /// Receiver that wakes on every notified change.  The current value is
    /// marked as already seen.
    pub fn subscribe(&self) -> watch::Receiver<RotationSettings> {
        self.tx.subscribe()
    }

    /// Mutate the settings in place.
    ///
    /// `f` returns whether it changed anything; subscribers are only woken
    /// when it returns `true`.  Returns the same flag.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut RotationSettings) -> bool,
    {
        self.tx.send_if_modified(f)
    }

    // ── Setters used by the settings page ─────────────────────────────────────

    pub fn set_participating_days<I, S>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.update(|s| s.set_participating_days(names))
    }

    pub fn set_participating_day_codes(
        &self,
        codes: impl IntoIterator<Item = u8>,
    ) -> Result<bool, SettingsError> {
        let mut outcome = Ok(false);
        self.update(|s| {
            outcome = s.set_participating_day_codes(codes);
            matches!(outcome, Ok(true))
        });
        outcome
    }

    pub fn apply_preset(&self, preset: WeekdayPreset) -> bool {
        self.update(|s| s.apply_preset(preset))
    }

    pub fn set_display_format(&self, format: impl Into<String>) -> bool {
        self.update(|s| s.set_display_format(format))
    }

    pub fn set_base_day(&self, day: NaiveDate) -> bool {
        self.update(|s| s.set_base_day(day))
    }

    pub fn set_offset(&self, offset: i32) -> bool {
        self.update(|s| s.set_offset(offset))
    }

    /// Import a roster from text.  Returns the number of students installed.
    ///
    /// Subscribers are notified once, and only if the roster differs from
    /// the current one.
    pub fn import_roster_from_text(&self, content: &str) -> usize {
        let mut count = 0;
        self.update(|s| {
            let previous = s.roster().to_vec();
            count = s.import_roster_from_text(content);
            s.roster() != previous.as_slice()
        });
        count
    }

    /// Import a roster from a text file.
    ///
    /// The file is read completely before anything is touched; on a read
    /// error (missing file, permission denied, invalid UTF-8) the current
    /// roster stays in place.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn import_roster_from_file(&self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read roster file: {}", path.display()))?;
        let count = self.import_roster_from_text(&content);
        info!(path = %path.display(), students = count, "Imported duty roster");
        Ok(count)
    }

    pub fn export_roster_to_text(&self) -> String {
        self.tx.borrow().export_roster_to_text()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
