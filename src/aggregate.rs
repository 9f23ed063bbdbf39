//! Program-level closure derivation.
//!
//! Rows are grouped by exact program name (placeholder names form their own
//! groups). Each group's Course 1 row is its anchor; the anchor's start and
//! end dates drive both closure dates, which are then copied to every row of
//! the group. Presentation order is separate and never affects the anchor.

use std::cmp::Ordering;

use chrono::Days;
use indexmap::IndexMap;
use tracing::warn;

use crate::config::ClosurePolicy;
use crate::data::{ClosureDate, CourseRecord};
use crate::temporal::Timestamp;
use crate::types::ProgramName;

/// Program-level findings surfaced to the caller before the table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnchorDiagnostics {
    /// Programs with no `ordinal == 1` row, sorted by name.
    pub missing_anchor: Vec<ProgramName>,
    /// Programs with more than one `ordinal == 1` row, sorted by name.
    ///
    /// The first such row in input order is still used as the anchor.
    pub duplicate_anchor: Vec<ProgramName>,
}

/// Closure dates derived from one anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramClosures {
    /// Anchor start plus the approximate offset.
    pub approx: ClosureDate,
    /// Anchor end plus the grace offset.
    pub official: ClosureDate,
}

impl ProgramClosures {
    /// Closures for a program without a usable anchor.
    pub const NOT_APPLICABLE: Self = Self {
        approx: ClosureDate::NotApplicable,
        official: ClosureDate::NotApplicable,
    };

    /// Derive both closures from an anchor row.
    ///
    /// Offsets are applied to the calendar date in the display timezone, so a
    /// DST transition inside the window never shifts the result by a day.
    pub fn from_anchor(anchor: &CourseRecord, policy: ClosurePolicy) -> Self {
        Self {
            approx: offset_closure(&anchor.start, policy.approx_offset_days),
            official: offset_closure(&anchor.end, policy.official_offset_days),
        }
    }
}

fn offset_closure(timestamp: &Timestamp, days: u64) -> ClosureDate {
    timestamp
        .instant()
        .and_then(|instant| instant.date_naive().checked_add_days(Days::new(days)))
        .map(ClosureDate::On)
        .unwrap_or(ClosureDate::NotApplicable)
}

/// Group `records` by program and write closure dates into every row.
///
/// Input order is not changed; it decides which Course 1 row anchors a
/// program when there are several.
pub fn assign_closures(records: &mut [CourseRecord], policy: ClosurePolicy) -> AnchorDiagnostics {
    let mut groups: IndexMap<ProgramName, Vec<usize>> = IndexMap::new();
    for (idx, record) in records.iter().enumerate() {
        groups
            .entry(record.program_name.clone())
            .or_default()
            .push(idx);
    }

    let mut diagnostics = AnchorDiagnostics::default();
    for (program, members) in &groups {
        let mut anchors = members
            .iter()
            .copied()
            .filter(|&idx| records[idx].is_anchor_candidate());
        let closures = match anchors.next() {
            Some(anchor_idx) => {
                if anchors.next().is_some() {
                    diagnostics.duplicate_anchor.push(program.clone());
                }
                ProgramClosures::from_anchor(&records[anchor_idx], policy)
            }
            None => {
                diagnostics.missing_anchor.push(program.clone());
                ProgramClosures::NOT_APPLICABLE
            }
        };
        for &idx in members {
            records[idx].approx_closure = closures.approx;
            records[idx].official_closure = closures.official;
        }
    }

    diagnostics.missing_anchor.sort();
    diagnostics.duplicate_anchor.sort();
    if !diagnostics.missing_anchor.is_empty() {
        warn!(
            "[closure_review:aggregate] missing Course 1 for: {}",
            diagnostics.missing_anchor.join(", ")
        );
    }
    if !diagnostics.duplicate_anchor.is_empty() {
        warn!(
            "[closure_review:aggregate] several Course 1 rows for: {} (first one wins)",
            diagnostics.duplicate_anchor.join(", ")
        );
    }
    diagnostics
}

/// Presentation order: program name, then ordinal, unknown ordinals last.
pub fn presentation_order(a: &CourseRecord, b: &CourseRecord) -> Ordering {
    a.program_name
        .cmp(&b.program_name)
        .then_with(|| match (a.ordinal, b.ordinal) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Stable sort into presentation order.
pub fn sort_for_display(records: &mut [CourseRecord]) {
    records.sort_by(presentation_order);
}
