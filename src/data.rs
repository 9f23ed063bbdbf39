use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::labels::{COURSE_UNNAMED, NOT_APPLICABLE, PROGRAM_LOAD_FAILED};
use crate::ordinal::derive_ordinal;
use crate::temporal::{Timestamp, normalize_timestamp, render_date};

pub use crate::types::{AccountId, CourseId, Ordinal, ProgramName};

/// Account reference as returned by the LMS (numeric in practice, text tolerated).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountRef {
    /// Numeric account id.
    Number(u64),
    /// Account id sent as a string.
    Text(String),
}

impl AccountRef {
    /// Account id to look up, or `None` for falsy references (`0`, `""`).
    pub fn lookup_id(&self) -> Option<AccountId> {
        match self {
            AccountRef::Number(0) => None,
            AccountRef::Number(value) => Some(value.to_string()),
            AccountRef::Text(value) if value.trim().is_empty() => None,
            AccountRef::Text(value) => Some(value.trim().to_string()),
        }
    }
}

/// Subset of `GET /courses/{id}` used by the review.
///
/// Every field may be absent or `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseAttributes {
    /// Course display name.
    #[serde(default)]
    pub name: Option<String>,
    /// SIS course id, e.g. `DIP-C1-2024`.
    #[serde(default)]
    pub sis_course_id: Option<String>,
    /// Course code, e.g. `Curso 2`.
    #[serde(default)]
    pub course_code: Option<String>,
    /// Owning program account.
    #[serde(default)]
    pub account_id: Option<AccountRef>,
    /// ISO-8601 start timestamp.
    #[serde(default)]
    pub start_at: Option<String>,
    /// ISO-8601 end timestamp.
    #[serde(default)]
    pub end_at: Option<String>,
}

impl CourseAttributes {
    /// Account id that owns this course, when present and truthy.
    pub fn program_account(&self) -> Option<AccountId> {
        self.account_id.as_ref().and_then(AccountRef::lookup_id)
    }
}

/// Subset of `GET /accounts/{id}` used by the review.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramAttributes {
    /// Program display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Closure date derived from a program's Course 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClosureDate {
    /// Derived calendar date.
    On(NaiveDate),
    /// No anchor, or the anchor lacks the source timestamp.
    NotApplicable,
}

impl ClosureDate {
    /// Calendar date, when one was derived.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ClosureDate::On(date) => Some(*date),
            ClosureDate::NotApplicable => None,
        }
    }

    /// Render as `DD-MM-YYYY` or `not applicable`.
    pub fn display(&self) -> String {
        match self {
            ClosureDate::On(date) => render_date(*date),
            ClosureDate::NotApplicable => NOT_APPLICABLE.to_string(),
        }
    }
}

/// One row per requested course id.
#[derive(Clone, Debug, PartialEq)]
pub struct CourseRecord {
    /// Id exactly as requested.
    pub course_id: CourseId,
    /// Owning program name or a placeholder label; the grouping key.
    pub program_name: ProgramName,
    /// SIS course id (may be empty).
    pub external_id: String,
    /// Course code (may be empty).
    pub code: String,
    /// Course display name.
    pub display_name: String,
    /// Start instant in the display timezone.
    pub start: Timestamp,
    /// End instant in the display timezone.
    pub end: Timestamp,
    /// Position inside the program, read from `external_id` then `code`.
    pub ordinal: Option<Ordinal>,
    /// Program-wide approximate closure.
    pub approx_closure: ClosureDate,
    /// Program-wide official closure.
    pub official_closure: ClosureDate,
}

impl CourseRecord {
    /// Build a record from a successful course lookup.
    pub fn from_attributes(
        course_id: impl Into<CourseId>,
        program_name: impl Into<ProgramName>,
        course: &CourseAttributes,
        tz: Tz,
    ) -> Self {
        let external_id = course.sis_course_id.clone().unwrap_or_default();
        let code = course.course_code.clone().unwrap_or_default();
        let ordinal = derive_ordinal(&external_id, &code);
        Self {
            course_id: course_id.into(),
            program_name: program_name.into(),
            display_name: course
                .name
                .clone()
                .unwrap_or_else(|| COURSE_UNNAMED.to_string()),
            start: normalize_timestamp(course.start_at.as_deref(), tz),
            end: normalize_timestamp(course.end_at.as_deref(), tz),
            external_id,
            code,
            ordinal,
            approx_closure: ClosureDate::NotApplicable,
            official_closure: ClosureDate::NotApplicable,
        }
    }

    /// Placeholder record for a course whose lookup failed.
    pub fn unavailable(course_id: impl Into<CourseId>) -> Self {
        let course_id = course_id.into();
        Self {
            program_name: PROGRAM_LOAD_FAILED.to_string(),
            external_id: String::new(),
            code: String::new(),
            display_name: format!("ID {course_id}"),
            start: Timestamp::Unavailable,
            end: Timestamp::Unavailable,
            ordinal: None,
            approx_closure: ClosureDate::NotApplicable,
            official_closure: ClosureDate::NotApplicable,
            course_id,
        }
    }

    /// True when this row is its program's Course 1 candidate.
    pub fn is_anchor_candidate(&self) -> bool {
        self.ordinal == Some(crate::constants::closure::ANCHOR_ORDINAL)
    }
}
