//! Course lookups and the per-id fetch loop.
//!
//! Ownership model:
//! - `CourseSource` is the pipeline-facing interface for the two LMS lookups.
//! - `fetch_records` owns failure recovery: every requested id yields exactly
//!   one `CourseRecord`, with placeholders standing in for failed lookups.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::constants::labels::{PROGRAM_LOAD_FAILED, PROGRAM_NOT_AVAILABLE, PROGRAM_UNNAMED};
use crate::data::{CourseAttributes, CourseRecord, ProgramAttributes};
use crate::errors::ReviewError;
use crate::types::{AccountId, CourseId, ProgramName};

/// Canvas REST backend.
pub mod canvas;

pub use canvas::CanvasClient;

/// Pipeline-facing LMS interface.
///
/// Implementations perform exactly one attempt per call; callers decide how
/// to degrade on error.
pub trait CourseSource {
    /// Look up a course by id (`GET /courses/{id}`).
    fn fetch_course(&self, course_id: &str) -> Result<CourseAttributes, ReviewError>;
    /// Look up the program account that owns a course (`GET /accounts/{id}`).
    fn fetch_program(&self, account_id: &str) -> Result<ProgramAttributes, ReviewError>;
}

/// Fetch one record per id, in input order.
///
/// Ids are not deduplicated and lookups are not memoized.
pub fn fetch_records(source: &dyn CourseSource, course_ids: &[CourseId], tz: Tz) -> Vec<CourseRecord> {
    course_ids
        .iter()
        .map(|course_id| fetch_record(source, course_id, tz))
        .collect()
}

/// Fetch a single record, substituting placeholders on failure.
pub fn fetch_record(source: &dyn CourseSource, course_id: &str, tz: Tz) -> CourseRecord {
    let course = match source.fetch_course(course_id) {
        Ok(course) => course,
        Err(err) => {
            warn!("[closure_review:fetch] {err}");
            return CourseRecord::unavailable(course_id);
        }
    };
    let program_name = resolve_program_name(source, &course);
    debug!(
        "[closure_review:fetch] course '{}' belongs to '{}'",
        course_id, program_name
    );
    CourseRecord::from_attributes(course_id, program_name, &course, tz)
}

fn resolve_program_name(source: &dyn CourseSource, course: &CourseAttributes) -> ProgramName {
    let Some(account_id) = course.program_account() else {
        return PROGRAM_NOT_AVAILABLE.to_string();
    };
    match source.fetch_program(&account_id) {
        Ok(program) => program
            .name
            .unwrap_or_else(|| PROGRAM_UNNAMED.to_string()),
        Err(err) => {
            warn!("[closure_review:fetch] {err}");
            // Same label as a failed course lookup: both rows land in one group.
            PROGRAM_LOAD_FAILED.to_string()
        }
    }
}

/// In-memory course source for tests and offline runs.
///
/// Unknown ids behave like failed lookups. Every call is appended to a
/// request log so callers can inspect lookup counts.
#[derive(Debug, Default)]
pub struct InMemorySource {
    courses: HashMap<CourseId, CourseAttributes>,
    programs: HashMap<AccountId, ProgramAttributes>,
    requests: RefCell<Vec<String>>,
}

impl InMemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a course payload.
    pub fn with_course(mut self, course_id: impl Into<CourseId>, course: CourseAttributes) -> Self {
        self.courses.insert(course_id.into(), course);
        self
    }

    /// Register a program account payload.
    pub fn with_program(mut self, account_id: impl Into<AccountId>, name: Option<&str>) -> Self {
        self.programs.insert(
            account_id.into(),
            ProgramAttributes {
                name: name.map(str::to_string),
            },
        );
        self
    }

    /// Request paths seen so far, e.g. `/courses/101`, `/accounts/7`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl CourseSource for InMemorySource {
    fn fetch_course(&self, course_id: &str) -> Result<CourseAttributes, ReviewError> {
        self.requests
            .borrow_mut()
            .push(format!("/courses/{course_id}"));
        self.courses
            .get(course_id)
            .cloned()
            .ok_or_else(|| ReviewError::CourseUnavailable {
                course_id: course_id.to_string(),
                reason: "not found".into(),
            })
    }

    fn fetch_program(&self, account_id: &str) -> Result<ProgramAttributes, ReviewError> {
        self.requests
            .borrow_mut()
            .push(format!("/accounts/{account_id}"));
        self.programs
            .get(account_id)
            .cloned()
            .ok_or_else(|| ReviewError::ProgramUnavailable {
                account_id: account_id.to_string(),
                reason: "not found".into(),
            })
    }
}
