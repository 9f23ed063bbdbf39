//! The review pipeline: tokenize ids, fetch, aggregate, classify, order.

use chrono::NaiveDate;
use tracing::info;

use crate::aggregate::{AnchorDiagnostics, assign_closures, sort_for_display};
use crate::config::ReviewConfig;
use crate::data::CourseRecord;
use crate::errors::ReviewError;
use crate::source::{CourseSource, fetch_records};
use crate::status::{CompletionStatus, Fallback, classify};
use crate::types::CourseId;

/// Split free text into course ids on runs of commas and whitespace.
pub fn parse_course_ids(text: &str) -> Vec<CourseId> {
    text.split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// A fully derived row ready for display.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewRow {
    /// Fetched record with closures assigned.
    pub record: CourseRecord,
    /// Status of the approximate closure.
    pub approx_status: CompletionStatus,
    /// Status of the official closure.
    pub official_status: CompletionStatus,
}

impl ReviewRow {
    /// Classify a record whose closures are already assigned.
    pub fn classify(record: CourseRecord, today: NaiveDate) -> Self {
        Self {
            approx_status: classify(record.approx_closure, today, Fallback::APPROX),
            official_status: classify(record.official_closure, today, Fallback::OFFICIAL),
            record,
        }
    }

    /// The ten display cells, in column order.
    pub fn columns(&self) -> [String; 10] {
        let record = &self.record;
        [
            record.program_name.clone(),
            record.external_id.clone(),
            record.code.clone(),
            record.display_name.clone(),
            record.start.display(),
            record.end.display(),
            record.approx_closure.display(),
            self.approx_status.label().to_string(),
            record.official_closure.display(),
            self.official_status.label().to_string(),
        ]
    }
}

/// One consistent snapshot of a review.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewReport {
    /// Date the statuses were computed against (display timezone).
    pub today: NaiveDate,
    /// Rows in presentation order; one per requested id.
    pub rows: Vec<ReviewRow>,
    /// Program-level warnings.
    pub diagnostics: AnchorDiagnostics,
}

/// Derive closures and statuses for fetched records.
///
/// Closures are assigned in input order, then rows are sorted for display.
pub fn build_report(
    mut records: Vec<CourseRecord>,
    config: &ReviewConfig,
    today: NaiveDate,
) -> ReviewReport {
    let diagnostics = assign_closures(&mut records, config.closure);
    sort_for_display(&mut records);
    let rows = records
        .into_iter()
        .map(|record| ReviewRow::classify(record, today))
        .collect();
    ReviewReport {
        today,
        rows,
        diagnostics,
    }
}

/// Run a review for already-tokenized ids.
///
/// An empty id list is rejected before any lookup.
pub fn review(
    source: &dyn CourseSource,
    course_ids: &[CourseId],
    config: &ReviewConfig,
    today: NaiveDate,
) -> Result<ReviewReport, ReviewError> {
    if course_ids.is_empty() {
        return Err(ReviewError::EmptyInput);
    }
    info!(
        "[closure_review:review] reviewing {} course id(s) as of {}",
        course_ids.len(),
        today
    );
    let records = fetch_records(source, course_ids, config.display_timezone);
    Ok(build_report(records, config, today))
}

/// Tokenize `input` and run a review.
pub fn review_text(
    source: &dyn CourseSource,
    input: &str,
    config: &ReviewConfig,
    today: NaiveDate,
) -> Result<ReviewReport, ReviewError> {
    review(source, &parse_course_ids(input), config, today)
}
