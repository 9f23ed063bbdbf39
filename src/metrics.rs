use std::collections::BTreeMap;

use crate::review::ReviewRow;
use crate::status::CompletionStatus;
use crate::types::ProgramName;

/// Per-column status counts for one review.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusTally {
    /// Rows classified `Finished`.
    pub finished: usize,
    /// Rows classified `In progress`.
    pub in_progress: usize,
    /// Rows with no closure date.
    pub unavailable: usize,
}

impl StatusTally {
    fn record(&mut self, status: CompletionStatus) {
        match status {
            CompletionStatus::Finished => self.finished += 1,
            CompletionStatus::InProgress => self.in_progress += 1,
            CompletionStatus::Unavailable(_) => self.unavailable += 1,
        }
    }
}

/// Aggregate counts printed after the table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReviewSummary {
    /// Total rows.
    pub rows: usize,
    /// Approximate-closure column.
    pub approx: StatusTally,
    /// Official-closure column.
    pub official: StatusTally,
    /// Row count per program, ordered by program name.
    pub per_program: BTreeMap<ProgramName, usize>,
}

/// Compute summary counts over displayed rows.
pub fn review_summary(rows: &[ReviewRow]) -> ReviewSummary {
    let mut summary = ReviewSummary {
        rows: rows.len(),
        ..ReviewSummary::default()
    };
    for row in rows {
        summary.approx.record(row.approx_status);
        summary.official.record(row.official_status);
        *summary
            .per_program
            .entry(row.record.program_name.clone())
            .or_insert(0) += 1;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ClosureDate, CourseRecord};
    use chrono::NaiveDate;

    #[test]
    fn summary_counts_each_column_independently() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut finished = CourseRecord::unavailable("1");
        finished.program_name = "A".into();
        finished.approx_closure = ClosureDate::On(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let rows = vec![
            ReviewRow::classify(finished, today),
            ReviewRow::classify(CourseRecord::unavailable("2"), today),
        ];
        let summary = review_summary(&rows);
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.approx.finished, 1);
        assert_eq!(summary.approx.unavailable, 1);
        assert_eq!(summary.official.unavailable, 2);
        assert_eq!(summary.per_program.get("A"), Some(&1));
        assert_eq!(summary.per_program.get("Failed to load"), Some(&1));
    }
}
