/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Weekday codes, names and the participation mask.
//!
//! Codes follow the Sunday-first convention used by the settings document:
//! `0` = Sunday, `1` = Monday … `6` = Saturday.

use chrono::{Datelike, NaiveDate};

/// Highest valid weekday code (Saturday).
pub const MAX_WEEKDAY_CODE: u8 = 6;

/// Chinese short names, indexed by weekday code.
const CHINESE_NAMES: [&str; 7] = ["周日", "周一", "周二", "周三", "周四", "周五", "周六"];

/// English full names, indexed by weekday code.
const ENGLISH_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Weekday code of a calendar date.
pub fn weekday_code(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Map one weekday name to its code.
///
/// Accepts the Chinese short names (`周一`), English full names (`Monday`)
/// and three-letter English abbreviations (`Mon`).  English is matched
/// case-insensitively.
pub fn weekday_from_name(token: &str) -> Option<u8> {
    let token = token.trim();
    if let Some(code) = CHINESE_NAMES.iter().position(|n| *n == token) {
        return Some(code as u8);
    }

    let lower = token.to_ascii_lowercase();
    ENGLISH_NAMES
        .iter()
        .position(|n| *n == lower || (lower.len() == 3 && n.starts_with(lower.as_str())))
        .map(|code| code as u8)
}

/// Split free text such as `"周一，周三 Fri"` into name tokens.
///
/// Separators are spaces, ASCII commas and full-width commas.
pub fn split_weekday_list(text: &str) -> Vec<&str> {
    text.split([' ', ',', '，'])
        .filter(|t| !t.is_empty())
        .collect()
}

// ── WeekdayPreset ─────────────────────────────────────────────────────────────

/// Common participation patterns offered by the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekdayPreset {
    /// Monday through Saturday.
    MonToSat,
    /// Monday through Friday.
    MonToFri,
    /// All seven days.
    EveryDay,
}

impl WeekdayPreset {
    pub fn codes(self) -> &'static [u8] {
        match self {
            WeekdayPreset::MonToSat => &[1, 2, 3, 4, 5, 6],
            WeekdayPreset::MonToFri => &[1, 2, 3, 4, 5],
            WeekdayPreset::EveryDay => &[0, 1, 2, 3, 4, 5, 6],
        }
    }
}

// ── WeekdayMask ───────────────────────────────────────────────────────────────

/// Seven-bit set of participating weekdays; bit N set means code N
/// participates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdayMask(u8);

impl WeekdayMask {
    pub const EMPTY: WeekdayMask = WeekdayMask(0);
    pub const ALL: WeekdayMask = WeekdayMask(0b0111_1111);

    /// Build a mask from weekday codes.  Codes above
    /// [`MAX_WEEKDAY_CODE`] are ignored.
    pub fn from_codes<'a>(codes: impl IntoIterator<Item = &'a u8>) -> Self {
        let bits = codes
            .into_iter()
            .filter(|&&c| c <= MAX_WEEKDAY_CODE)
            .fold(0u8, |acc, &c| acc | (1 << c));
        WeekdayMask(bits)
    }

    pub fn contains(self, code: u8) -> bool {
        code <= MAX_WEEKDAY_CODE && (self.0 >> code) & 1 == 1
    }

    /// Number of participating weekdays (0–7).
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
