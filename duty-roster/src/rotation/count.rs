/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Counting participating days in a run of calendar days.
//!
//! These are free functions rather than methods so they can be used and tested
//! independently of the settings type.

use chrono::NaiveDate;

use crate::settings::weekdays::{weekday_code, WeekdayMask};

/// Number of days in `[start, start + days)` whose weekday is in `mask`.
///
/// Whole weeks contribute `mask.len()` each; only the trailing partial week
/// (fewer than seven days) is walked day by day.  `days <= 0` counts nothing.
pub fn count_participating_days(start: NaiveDate, days: i64, mask: WeekdayMask) -> i64 {
    if days <= 0 || mask.is_empty() {
        return 0;
    }

    let full_weeks = days / 7;
    let remainder = days % 7;
    let first = weekday_code(start) as i64;

    let tail = (0..remainder)
        .filter(|i| mask.contains(((first + i) % 7) as u8))
        .count() as i64;

    full_weeks * mask.len() as i64 + tail
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::weekdays::WeekdayPreset;
    use chrono::Days;

    /// Visits every day in the range.  O(`days`).
    fn scan_participating_days(start: NaiveDate, days: i64, mask: WeekdayMask) -> i64 {
        let mut count = 0;
        for i in 0..days.max(0) {
            let Some(date) = start.checked_add_days(Days::new(i as u64)) else {
                break;
            };
            if mask.contains(weekday_code(date)) {
                count += 1;
            }
        }
        count
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn mask(codes: &[u8]) -> WeekdayMask {
        WeekdayMask::from_codes(codes)
    }

    #[test]
    fn zero_or_negative_span_counts_nothing() {
        let all = WeekdayMask::ALL;
        assert_eq!(count_participating_days(day(2024, 1, 1), 0, all), 0);
        assert_eq!(count_participating_days(day(2024, 1, 1), -5, all), 0);
        assert_eq!(scan_participating_days(day(2024, 1, 1), -5, all), 0);
    }

    #[test]
    fn empty_mask_counts_nothing() {
        assert_eq!(count_participating_days(day(2024, 1, 1), 1_000, WeekdayMask::EMPTY), 0);
    }

    #[test]
    fn full_mask_counts_every_day() {
        for days in [1, 6, 7, 8, 365, 10_000] {
            assert_eq!(count_participating_days(day(2024, 1, 1), days, WeekdayMask::ALL), days);
        }
    }

    #[test]
    fn mon_to_sat_first_week_of_2024() {
        // Jan 1–7 2024: Mon..Sun, Sunday does not participate
        let m = WeekdayMask::from_codes(WeekdayPreset::MonToSat.codes());
        assert_eq!(count_participating_days(day(2024, 1, 1), 7, m), 6);
        assert_eq!(count_participating_days(day(2024, 1, 1), 2, m), 2);
    }

    #[test]
    fn weekend_only_across_partial_weeks() {
        // Starting Thursday 2024-01-04: Thu Fri [Sat Sun] Mon Tue Wed Thu Fri [Sat]
        let m = mask(&[0, 6]);
        assert_eq!(count_participating_days(day(2024, 1, 4), 10, m), 3);
    }

    #[test]
    fn range_crossing_year_and_leap_day() {
        let m = mask(&[3]); // Wednesdays
        let start = day(2023, 12, 25);
        assert_eq!(
            count_participating_days(start, 100, m),
            scan_participating_days(start, 100, m)
        );
    }

    #[test]
    fn closed_form_matches_scan_for_every_mask_and_start_weekday() {
        let starts: Vec<NaiveDate> = (0..7).map(|i| day(2024, 1, 1 + i)).collect();
        for bits in 0u8..128 {
            let codes: Vec<u8> = (0..7).filter(|c| (bits >> c) & 1 == 1).collect();
            let m = mask(&codes);
            for &start in &starts {
                for days in [0, 1, 3, 6, 7, 8, 13, 14, 15, 30] {
                    assert_eq!(
                        count_participating_days(start, days, m),
                        scan_participating_days(start, days, m),
                        "mask={bits:07b} start={start} days={days}"
                    );
                }
            }
        }
    }
}
