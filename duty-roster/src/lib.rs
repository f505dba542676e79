/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Duty roster – classroom duty rotation
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── roster/         – Student value type, plain-text roster import/export
//! ├── settings/       – RotationSettings document, observable handle, JSON store
//! │   ├── weekdays    – weekday vocabulary, participation mask, presets
//! │   ├── handle      – SettingsHandle (watch-based change notification)
//! │   └── store       – SettingsStore / JsonFileStore / autosave task
//! ├── rotation/       – who is on duty for a date, display formatting
//! │   ├── count       – participating-day counting
//! │   └── error       – RotationError
//! └── widget/         – Clock capability + periodically refreshed DutyWidget
//! ```

pub mod roster;
pub mod rotation;
pub mod settings;
pub mod widget;
