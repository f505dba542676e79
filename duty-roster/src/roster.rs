/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Students and the plain-text roster format.
//!
//! One student per line, number first, name after:
//!
//! ```text
//! 1 Alice
//! 2 Bob Smith
//! 10	Carol
//! ```
//!
//! Fields are separated by any run of spaces or tabs.  The name keeps its
//! inner words, re-joined with a single space.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

// ── Student ───────────────────────────────────────────────────────────────────

/// A single roster entry.
///
/// `number` is not required to be unique.  Rotation order is roster order,
/// never numeric order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub number: i32,
    pub name: String,
}

impl Student {
    pub fn new(number: i32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
        }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.name)
    }
}

// ── Import ────────────────────────────────────────────────────────────────────

/// Parse one roster line.
///
/// Returns `None` for blank lines, lines whose first token is not an integer,
/// and lines that carry a number but no name.
pub fn parse_line(line: &str) -> Option<Student> {
    let mut tokens = line.split([' ', '\t']).filter(|t| !t.is_empty());

    let number: i32 = tokens.next()?.parse().ok()?;
    let name = tokens.collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return None;
    }

    Some(Student { number, name })
}

/// Parse a whole roster text.
///
/// Malformed lines are dropped one at a time and never abort the parse.  The
/// result is sorted by `number`; the sort is stable so students sharing a
/// number keep their order from the text.
pub fn parse_roster(content: &str) -> Vec<Student> {
    let mut students: Vec<Student> = content
        .split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = parse_line(line);
            if parsed.is_none() {
                debug!(line, "Skipping malformed roster line");
            }
            parsed
        })
        .collect();

    students.sort_by_key(|s| s.number);
    students
}

// ── Export ────────────────────────────────────────────────────────────────────

/// Format a roster as text, one `"{number} {name}"` line per student, in
/// roster order.  Trailing whitespace is trimmed.
pub fn format_roster(students: &[Student]) -> String {
    students
        .iter()
        .map(Student::to_string)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── parse_line ────────────────────────────────────────────────────────────

    #[test]
    fn parse_line_splits_number_and_name() {
        assert_eq!(parse_line("7 Alice"), Some(Student::new(7, "Alice")));
    }

    #[test]
    fn parse_line_rejoins_name_with_single_spaces() {
        assert_eq!(
            parse_line("  2 \t Bob   van\tSmith  "),
            Some(Student::new(2, "Bob van Smith"))
        );
    }

    #[test]
    fn parse_line_accepts_negative_numbers() {
        assert_eq!(parse_line("-3 Dana"), Some(Student::new(-3, "Dana")));
    }

    #[test]
    fn parse_line_rejects_non_integer_first_token() {
        assert_eq!(parse_line("bad line"), None);
        assert_eq!(parse_line("1.5 Half"), None);
        assert_eq!(parse_line("No. Name"), None);
    }

    #[test]
    fn parse_line_rejects_number_without_name() {
        assert_eq!(parse_line("12"), None);
        assert_eq!(parse_line("12   \t"), None);
    }

    #[test]
    fn parse_line_rejects_blank_input() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line(" \t "), None);
    }

    // ── parse_roster ──────────────────────────────────────────────────────────

    #[test]
    fn lenient_import_discards_malformed_middle_line() {
        let roster = parse_roster("1 Alice\nbad line\n2 Bob Smith\n");
        assert_eq!(
            roster,
            vec![Student::new(1, "Alice"), Student::new(2, "Bob Smith")]
        );
    }

    #[test]
    fn parse_roster_sorts_by_number() {
        let roster = parse_roster("3 C\n1 A\n2 B");
        let numbers: Vec<i32> = roster.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn parse_roster_sort_is_stable_on_duplicate_numbers() {
        let roster = parse_roster("2 Second\n1 First\n2 Third");
        assert_eq!(
            roster,
            vec![
                Student::new(1, "First"),
                Student::new(2, "Second"),
                Student::new(2, "Third"),
            ]
        );
    }

    #[test]
    fn parse_roster_handles_crlf_and_blank_lines() {
        let roster = parse_roster("\r\n1 A\r\n\r\n   \r\n2 B\r\n");
        assert_eq!(roster, vec![Student::new(1, "A"), Student::new(2, "B")]);
    }

    #[test]
    fn parse_roster_of_header_only_text_is_empty() {
        assert!(parse_roster("Number Name\n").is_empty());
    }

    // ── format_roster ─────────────────────────────────────────────────────────

    #[test]
    fn format_roster_keeps_roster_order() {
        let students = vec![Student::new(2, "B"), Student::new(1, "A")];
        assert_eq!(format_roster(&students), "2 B\n1 A");
    }

    #[test]
    fn format_roster_of_empty_roster_is_empty_string() {
        assert_eq!(format_roster(&[]), "");
    }

    #[test]
    fn export_then_import_yields_identical_roster() {
        let students = vec![
            Student::new(1, "Alice"),
            Student::new(2, "Bob Smith"),
            Student::new(5, "Eve"),
        ];
        assert_eq!(parse_roster(&format_roster(&students)), students);
    }
}
