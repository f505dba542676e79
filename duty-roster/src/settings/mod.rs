//! Duty roster settings: the persisted document and its validated mutations.
//!
//! [`RotationSettings`] maps directly onto the JSON document written by the
//! host for each widget instance:
//!
//! ```json
//! {
//!   "participatingDays": [1, 2, 3, 4, 5, 6],
//!   "dutyStudents": [ { "number": 1, "name": "Alice" } ],
//!   "displayFormat": "Duty: {n}{s}",
//!   "baseDate": "2024-01-01T00:00:00+08:00",
//!   "currentOffset": 0
//! }
//! ```
//!
//! The struct is plain data.  Sharing and change notification live in
//! [`handle::SettingsHandle`]; file persistence in [`store`].

pub mod handle;
pub mod store;
pub mod weekdays;

pub use handle::SettingsHandle;

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::roster::{format_roster, parse_roster, Student};
use weekdays::{weekday_from_name, WeekdayMask, WeekdayPreset, MAX_WEEKDAY_CODE};

/// Display template used when none has been configured.
pub const DEFAULT_DISPLAY_FORMAT: &str = "Duty: {n}{s}";

// ── Error type ────────────────────────────────────────────────────────────────

/// Rejected settings mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// A weekday code outside `0..=6` was supplied to a code-based setter.
    #[error("weekday code {0} is out of range (expected 0 = Sunday … 6 = Saturday)")]
    InvalidWeekdayCode(u8),
}

// ── RotationSettings ──────────────────────────────────────────────────────────

/// Duty roster configuration for one widget instance.
///
/// Every setter returns `true` when the value actually changed, so the
/// caller (usually [`SettingsHandle::update`]) knows whether to notify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RotationSettings {
    /// Weekdays that advance the rotation counter (0 = Sunday … 6 = Saturday).
    #[serde(deserialize_with = "deserialize_weekday_codes")]
    participating_days: BTreeSet<u8>,

    /// Roster in rotation order.
    #[serde(rename = "dutyStudents")]
    roster: Vec<Student>,

    /// Template with `{n}` (number) and `{s}` (name) placeholders.
    display_format: String,

    /// Rotation epoch.  Only the calendar date is significant.
    #[serde(deserialize_with = "deserialize_base_date")]
    base_date: DateTime<FixedOffset>,

    /// Shift applied to the rotation count before indexing the roster.
    #[serde(rename = "currentOffset")]
    offset: i32,
}

impl Default for RotationSettings {
    /// Mon–Sat rotation over a three-student sample roster, starting today.
    fn default() -> Self {
        Self {
            participating_days: WeekdayPreset::MonToSat.codes().iter().copied().collect(),
            roster: vec![
                Student::new(1, "Alice"),
                Student::new(2, "Bob"),
                Student::new(3, "Carol"),
            ],
            display_format: DEFAULT_DISPLAY_FORMAT.to_string(),
            base_date: local_midnight(Local::now().date_naive()),
            offset: 0,
        }
    }
}

impl RotationSettings {
    /// Settings with an empty roster, no participating days, offset zero and
    /// the default display format, based at `base_day`.
    pub fn empty(base_day: NaiveDate) -> Self {
        Self {
            participating_days: BTreeSet::new(),
            roster: Vec::new(),
            display_format: DEFAULT_DISPLAY_FORMAT.to_string(),
            base_date: local_midnight(base_day),
            offset: 0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn roster(&self) -> &[Student] {
        &self.roster
    }

    pub fn participating_days(&self) -> &BTreeSet<u8> {
        &self.participating_days
    }

    pub fn weekday_mask(&self) -> WeekdayMask {
        WeekdayMask::from_codes(&self.participating_days)
    }

    pub fn display_format(&self) -> &str {
        &self.display_format
    }

    pub fn base_date(&self) -> DateTime<FixedOffset> {
        self.base_date
    }

    /// The base date floored to its calendar day.
    pub fn base_day(&self) -> NaiveDate {
        self.base_date.date_naive()
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    // ── Participating days ────────────────────────────────────────────────────

    /// Replace the participating days from weekday-name tokens.
    ///
    /// Unrecognised tokens are dropped silently; the result is de-duplicated
    /// and sorted.  See [`weekdays::weekday_from_name`] for the vocabulary.
    pub fn set_participating_days<I, S>(&mut self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let days: BTreeSet<u8> = names
            .into_iter()
            .filter_map(|name| {
                let code = weekday_from_name(name.as_ref());
                if code.is_none() {
                    debug!(token = name.as_ref(), "Ignoring unrecognised weekday name");
                }
                code
            })
            .collect();
        self.replace_days(days)
    }

    /// Replace the participating days from numeric codes.
    ///
    /// # Errors
    /// [`SettingsError::InvalidWeekdayCode`] for the first code above 6; the
    /// settings are left untouched in that case.
    pub fn set_participating_day_codes(
        &mut self,
        codes: impl IntoIterator<Item = u8>,
    ) -> Result<bool, SettingsError> {
        let mut days = BTreeSet::new();
        for code in codes {
            if code > MAX_WEEKDAY_CODE {
                return Err(SettingsError::InvalidWeekdayCode(code));
            }
            days.insert(code);
        }
        Ok(self.replace_days(days))
    }

    pub fn apply_preset(&mut self, preset: WeekdayPreset) -> bool {
        self.replace_days(preset.codes().iter().copied().collect())
    }

    fn replace_days(&mut self, days: BTreeSet<u8>) -> bool {
        if self.participating_days == days {
            return false;
        }
        self.participating_days = days;
        true
    }

    // ── Roster ────────────────────────────────────────────────────────────────

    /// Replace the whole roster.
    pub fn set_roster(&mut self, roster: Vec<Student>) -> bool {
        if self.roster == roster {
            return false;
        }
        self.roster = roster;
        true
    }

    /// Parse `content` in the roster text format and install the result.
    ///
    /// Returns the number of students installed.  The roster is replaced in
    /// one assignment; an input with no valid lines leaves an empty roster.
    pub fn import_roster_from_text(&mut self, content: &str) -> usize {
        let students = parse_roster(content);
        let count = students.len();
        self.set_roster(students);
        count
    }

    /// The roster in text format, in current roster order.
    pub fn export_roster_to_text(&self) -> String {
        format_roster(&self.roster)
    }

    // ── Scalars ───────────────────────────────────────────────────────────────

    pub fn set_display_format(&mut self, format: impl Into<String>) -> bool {
        let format = format.into();
        if self.display_format == format {
            return false;
        }
        self.display_format = format;
        true
    }

    /// Set the base date, normalised to midnight in its own offset.
    pub fn set_base_date(&mut self, date: DateTime<FixedOffset>) -> bool {
        let midnight = date
            .timezone()
            .from_local_datetime(&date.date_naive().and_time(NaiveTime::MIN))
            .single()
            .unwrap_or(date);
        if self.base_date == midnight {
            return false;
        }
        self.base_date = midnight;
        true
    }

    /// Set the base date to local midnight of `day`.
    pub fn set_base_day(&mut self, day: NaiveDate) -> bool {
        self.set_base_date(local_midnight(day))
    }

    pub fn set_offset(&mut self, offset: i32) -> bool {
        if self.offset == offset {
            return false;
        }
        self.offset = offset;
        true
    }
}

// ── Lenient deserialisation ───────────────────────────────────────────────────

/// Reads `participatingDays` as plain integers and keeps only `0..=6`.
///
/// Out-of-range codes (negative, 7, 300, ...) are dropped with a warning and
/// the rest of the document still loads.
fn deserialize_weekday_codes<'de, D>(deserializer: D) -> Result<BTreeSet<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<i64>::deserialize(deserializer)?;
    let mut days = BTreeSet::new();
    let mut invalid = Vec::new();
    for code in raw {
        match u8::try_from(code) {
            Ok(c) if c <= MAX_WEEKDAY_CODE => {
                days.insert(c);
            }
            _ => invalid.push(code),
        }
    }
    if !invalid.is_empty() {
        warn!(?invalid, "Dropping out-of-range weekday codes from settings");
    }
    Ok(days)
}

/// Reads `baseDate` as an RFC 3339 date-time.  A date-time without an offset
/// (`2024-01-01T08:00:00`) or a bare date (`2024-01-01`) is taken as local
/// time.
fn deserialize_base_date<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_base_date(&text).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid baseDate {text:?}, expected an ISO-8601 date-time"))
    })
}

fn parse_base_date(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(dt) = text.parse::<DateTime<FixedOffset>>() {
        return Some(dt);
    }
    if let Ok(naive) = text.parse::<NaiveDateTime>() {
        debug!(base_date = text, "baseDate has no offset, reading it as local time");
        return Some(local_datetime(naive));
    }
    text.parse::<NaiveDate>().ok().map(local_midnight)
}

/// Local midnight of `day` as a fixed-offset date-time.
///
/// Falls back to UTC midnight on the rare day where local midnight does not
/// exist (DST gap at 00:00).
pub fn local_midnight(day: NaiveDate) -> DateTime<FixedOffset> {
    local_datetime(day.and_time(NaiveTime::MIN))
}

fn local_datetime(naive: NaiveDateTime) -> DateTime<FixedOffset> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
        .unwrap_or_else(|| naive.and_utc().fixed_offset())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
