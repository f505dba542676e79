//! Rotation calculator: who is on duty for a given date.
//!
//! All functions here are pure.  They take a settings snapshot and a target
//! date as explicit input and hold no state, so identical inputs always give
//! identical output and they are safe to call from any thread.
//!
//! # Rotation rule
//!
//! ```text
//! days_diff      = max(0, target_day - base_day)
//! rotation_count = #{ d in [base_day, base_day + days_diff) : weekday(d) participates }
//! index          = (rotation_count + offset) mod roster_len     (floored, always >= 0)
//! ```
//!
//! Target dates before the base date are clamped to the base date: the
//! rotation never runs backwards.  The target day itself is not counted, so
//! the student on duty changes at the start of the day *after* each
//! participating day.
//!
//! # Example
//! ```rust
//! use chrono::NaiveDate;
//! use duty_roster::roster::Student;
//! use duty_roster::rotation::render_duty_text;
//! use duty_roster::settings::RotationSettings;
//!
//! let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(); // a Monday
//! let mut settings = RotationSettings::empty(base);
//! settings.set_participating_days(["Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
//! settings.set_roster(vec![
//!     Student::new(1, "A"),
//!     Student::new(2, "B"),
//!     Student::new(3, "C"),
//! ]);
//!
//! let target = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
//! assert_eq!(render_duty_text(&settings, target), "Duty: 3C");
//! ```

pub mod count;
pub mod error;

pub use error::RotationError;

use chrono::NaiveDate;
use tracing::debug;

use crate::roster::Student;
use crate::settings::RotationSettings;
use count::count_participating_days;

/// Text shown in place of a student when the roster is empty.
pub const EMPTY_ROSTER_TEXT: &str = "No duty roster configured";

/// Number of participating days from the base day up to, but not including,
/// `target`.  Targets before the base day yield `0`.
pub fn compute_rotation_count(settings: &RotationSettings, target: NaiveDate) -> i64 {
    let base = settings.base_day();
    let days_diff = target.signed_duration_since(base).num_days().max(0);
    count_participating_days(base, days_diff, settings.weekday_mask())
}

/// Roster index on duty for `target`.
///
/// # Errors
/// [`RotationError::EmptyRoster`] when the roster has no students.
pub fn compute_current_index(
    settings: &RotationSettings,
    target: NaiveDate,
) -> Result<usize, RotationError> {
    let len = settings.roster().len();
    if len == 0 {
        return Err(RotationError::EmptyRoster);
    }

    let rotation_count = compute_rotation_count(settings, target);
    let index = (rotation_count + i64::from(settings.offset())).rem_euclid(len as i64) as usize;

    debug!(
        %target,
        base_day = %settings.base_day(),
        rotation_count,
        offset = settings.offset(),
        roster_len = len,
        index,
        "Computed duty index"
    );
    Ok(index)
}

/// The student on duty for `target`.
///
/// # Errors
/// [`RotationError::EmptyRoster`] when the roster has no students.
pub fn compute_current_student(
    settings: &RotationSettings,
    target: NaiveDate,
) -> Result<&Student, RotationError> {
    let index = compute_current_index(settings, target)?;
    Ok(&settings.roster()[index])
}

/// Fill the display template: every `{n}` becomes the student's number and
/// every `{s}` the student's name.  Everything else is copied verbatim.
pub fn format_display(settings: &RotationSettings, student: &Student) -> String {
    settings
        .display_format()
        .replace("{n}", &student.number.to_string())
        .replace("{s}", &student.name)
}

/// Display text for `target`: the formatted student on duty, or
/// [`EMPTY_ROSTER_TEXT`] when the roster is empty.  Never fails.
pub fn render_duty_text(settings: &RotationSettings, target: NaiveDate) -> String {
    match compute_current_student(settings, target) {
        Ok(student) => format_display(settings, student),
        Err(RotationError::EmptyRoster) => EMPTY_ROSTER_TEXT.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::weekdays::WeekdayPreset;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn abc() -> Vec<Student> {
        vec![
            Student::new(1, "A"),
            Student::new(2, "B"),
            Student::new(3, "C"),
        ]
    }

    /// Mon–Sat rotation over A, B, C from Monday 2024-01-01.
    fn scenario() -> RotationSettings {
        let mut s = RotationSettings::empty(day(2024, 1, 1));
        s.apply_preset(WeekdayPreset::MonToSat);
        s.set_roster(abc());
        s.set_display_format("Duty: {n}{s}");
        s
    }

    // ── Concrete scenario ─────────────────────────────────────────────────────

    #[test]
    fn base_day_is_first_student() {
        let s = scenario();
        assert_eq!(compute_rotation_count(&s, day(2024, 1, 1)), 0);
        assert_eq!(render_duty_text(&s, day(2024, 1, 1)), "Duty: 1A");
    }

    #[test]
    fn one_week_later_skips_sunday() {
        let s = scenario();
        assert_eq!(compute_rotation_count(&s, day(2024, 1, 8)), 6);
        assert_eq!(render_duty_text(&s, day(2024, 1, 8)), "Duty: 1A");
    }

    #[test]
    fn two_days_later_is_third_student() {
        let s = scenario();
        assert_eq!(compute_rotation_count(&s, day(2024, 1, 3)), 2);
        assert_eq!(render_duty_text(&s, day(2024, 1, 3)), "Duty: 3C");
    }

    #[test]
    fn non_participating_day_repeats_previous_assignment() {
        let s = scenario();
        // Sunday Jan 7 adds nothing, so Monday Jan 8 matches Sunday Jan 7
        let sunday = compute_current_index(&s, day(2024, 1, 7)).unwrap();
        let monday = compute_current_index(&s, day(2024, 1, 8)).unwrap();
        assert_eq!(sunday, monday);
    }

    // ── Properties ────────────────────────────────────────────────────────────

    #[test]
    fn rendering_is_deterministic() {
        let s = scenario();
        let target = day(2025, 6, 17);
        let first = render_duty_text(&s, target);
        for _ in 0..10 {
            assert_eq!(render_duty_text(&s, target), first);
        }
    }

    #[test]
    fn every_day_rotation_advances_one_index_per_day() {
        let mut s = scenario();
        s.apply_preset(WeekdayPreset::EveryDay);
        let base = s.base_day();
        for i in 0..30u64 {
            let target = base.checked_add_days(chrono::Days::new(i)).unwrap();
            assert_eq!(compute_current_index(&s, target).unwrap(), (i % 3) as usize);
        }
    }

    #[test]
    fn empty_day_set_freezes_rotation_at_offset() {
        let mut s = scenario();
        s.set_participating_day_codes([0u8; 0]).unwrap();
        s.set_offset(4);
        for target in [day(2024, 1, 1), day(2024, 1, 9), day(2031, 12, 31)] {
            assert_eq!(compute_rotation_count(&s, target), 0);
            assert_eq!(compute_current_index(&s, target).unwrap(), 1); // 4 mod 3
        }
    }

    #[test]
    fn past_dates_clamp_to_base_date() {
        let mut s = scenario();
        s.set_offset(2);
        let at_base = render_duty_text(&s, day(2024, 1, 1));
        for target in [day(2023, 12, 31), day(2023, 6, 1), day(1999, 1, 1)] {
            assert_eq!(compute_rotation_count(&s, target), 0);
            assert_eq!(render_duty_text(&s, target), at_base);
        }
    }

    #[test]
    fn negative_offset_wraps_to_last_student() {
        let mut s = scenario();
        s.set_offset(-1);
        assert_eq!(compute_current_index(&s, day(2024, 1, 1)).unwrap(), 2);
        assert_eq!(compute_current_student(&s, day(2024, 1, 1)).unwrap().name, "C");
    }

    #[test]
    fn large_offsets_are_normalised() {
        let mut s = scenario();
        s.set_offset(i32::MIN);
        let idx = compute_current_index(&s, day(2024, 1, 1)).unwrap();
        assert_eq!(idx, (i32::MIN as i64).rem_euclid(3) as usize);

        s.set_offset(i32::MAX);
        let idx = compute_current_index(&s, day(2030, 1, 1)).unwrap();
        assert!(idx < 3);
    }

    #[test]
    fn base_time_of_day_is_ignored() {
        let mut s = scenario();
        s.set_base_date(chrono::DateTime::parse_from_rfc3339("2024-01-01T23:59:00+08:00").unwrap());
        assert_eq!(compute_rotation_count(&s, day(2024, 1, 3)), 2);
    }

    #[test]
    fn duplicate_numbers_rotate_in_roster_order() {
        let mut s = scenario();
        s.apply_preset(WeekdayPreset::EveryDay);
        s.set_roster(vec![Student::new(1, "X"), Student::new(1, "Y")]);
        assert_eq!(compute_current_student(&s, day(2024, 1, 2)).unwrap().name, "Y");
    }

    // ── Empty roster ──────────────────────────────────────────────────────────

    #[test]
    fn empty_roster_is_an_error_for_current_student() {
        let s = RotationSettings::empty(day(2024, 1, 1));
        assert_eq!(
            compute_current_student(&s, day(2024, 2, 1)),
            Err(RotationError::EmptyRoster)
        );
    }

    #[test]
    fn empty_roster_renders_sentinel() {
        let s = RotationSettings::empty(day(2024, 1, 1));
        assert_eq!(render_duty_text(&s, day(2024, 2, 1)), EMPTY_ROSTER_TEXT);
    }

    // ── format_display ────────────────────────────────────────────────────────

    #[test]
    fn format_replaces_every_token_occurrence() {
        let mut s = scenario();
        s.set_display_format("{n}-{s}/{n}-{s}");
        assert_eq!(format_display(&s, &Student::new(12, "Li")), "12-Li/12-Li");
    }

    #[test]
    fn format_leaves_other_text_untouched() {
        let mut s = scenario();
        s.set_display_format("值日：{n}号 {s} {x} {{n}} $1 .*");
        assert_eq!(
            format_display(&s, &Student::new(7, "王五")),
            "值日：7号 王五 {x} {7} $1 .*"
        );
    }

    #[test]
    fn format_without_tokens_is_verbatim() {
        let mut s = scenario();
        s.set_display_format("Clean the board");
        assert_eq!(format_display(&s, &Student::new(1, "A")), "Clean the board");
    }

    #[test]
    fn format_renders_negative_numbers_in_decimal() {
        let s = scenario();
        assert_eq!(format_display(&s, &Student::new(-4, "Neg")), "Duty: -4Neg");
    }
}
