//! Completion status classification.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::constants::labels::{
    NOT_APPLICABLE, STATUS_ERROR, STATUS_FINISHED, STATUS_IN_PROGRESS,
};
use crate::data::ClosureDate;
use crate::temporal::parse_display_date;

/// Label used when a closure has no date.
///
/// The two closure columns differ: the approximate column falls
/// back to `Error`, the official column to `not applicable`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fallback {
    /// `Error`.
    Error,
    /// `not applicable`.
    NotApplicable,
}

impl Fallback {
    /// Fallback for the approximate-closure column.
    pub const APPROX: Self = Fallback::Error;
    /// Fallback for the official-closure column.
    pub const OFFICIAL: Self = Fallback::NotApplicable;

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Fallback::Error => STATUS_ERROR,
            Fallback::NotApplicable => NOT_APPLICABLE,
        }
    }
}

/// Completion state of one closure column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionStatus {
    /// Closure date is strictly before today.
    Finished,
    /// Closure date is today or later.
    InProgress,
    /// No closure date.
    Unavailable(Fallback),
}

impl CompletionStatus {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            CompletionStatus::Finished => STATUS_FINISHED,
            CompletionStatus::InProgress => STATUS_IN_PROGRESS,
            CompletionStatus::Unavailable(fallback) => fallback.label(),
        }
    }

    /// True for [`CompletionStatus::Finished`].
    pub fn is_finished(self) -> bool {
        matches!(self, CompletionStatus::Finished)
    }
}

impl Serialize for CompletionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Classify a closure date against `today`.
pub fn classify(closure: ClosureDate, today: NaiveDate, fallback: Fallback) -> CompletionStatus {
    match closure.date() {
        Some(date) => classify_date(date, today),
        None => CompletionStatus::Unavailable(fallback),
    }
}

/// Classify rendered closure text (`DD-MM-YYYY`); any other text falls back.
pub fn classify_text(closure: &str, today: NaiveDate, fallback: Fallback) -> CompletionStatus {
    match parse_display_date(closure) {
        Some(date) => classify_date(date, today),
        None => CompletionStatus::Unavailable(fallback),
    }
}

fn classify_date(date: NaiveDate, today: NaiveDate) -> CompletionStatus {
    if date < today {
        CompletionStatus::Finished
    } else {
        CompletionStatus::InProgress
    }
}
