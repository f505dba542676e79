/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Error type for the rotation calculator.
//!
//! The display path never propagates [`RotationError`]: it renders the
//! empty-roster sentinel instead.  Callers that need the student itself
//! (e.g. the CLI's `show` command) can match on the variant.

use thiserror::Error;

/// Failure to determine the student on duty.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RotationError {
    /// The roster has no students, so there is nobody to rotate through.
    #[error("duty roster is empty, no student can be on duty")]
    EmptyRoster,
}
