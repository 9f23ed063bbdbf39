//! Terminal and JSON rendering of a review.
//!
//! Styling is decided on the typed row values and applied only here; cell
//! text is padded before coloring so escape codes never skew alignment.

use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::aggregate::AnchorDiagnostics;
use crate::config::ClosurePolicy;
use crate::constants::labels::COLUMNS;
use crate::metrics::ReviewSummary;
use crate::review::{ReviewReport, ReviewRow};
use crate::status::CompletionStatus;

const END_COLUMN: usize = 5;
const APPROX_STATUS_COLUMN: usize = 7;
const OFFICIAL_STATUS_COLUMN: usize = 9;

/// Background applied to a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellStyle {
    /// Finished.
    Green,
    /// Not finished.
    Red,
    /// Missing end date.
    Yellow,
}

fn status_style(status: CompletionStatus) -> CellStyle {
    if status.is_finished() {
        CellStyle::Green
    } else {
        CellStyle::Red
    }
}

/// Style for cell `column` of `row`, if any.
///
/// Status cells are green when finished and red otherwise; the End cell is
/// yellow when the course has no end date configured.
pub fn cell_style(row: &ReviewRow, column: usize) -> Option<CellStyle> {
    match column {
        END_COLUMN if row.record.end.is_not_configured() => Some(CellStyle::Yellow),
        APPROX_STATUS_COLUMN => Some(status_style(row.approx_status)),
        OFFICIAL_STATUS_COLUMN => Some(status_style(row.official_status)),
        _ => None,
    }
}

fn paint(text: &str, style: CellStyle) -> ColoredString {
    match style {
        CellStyle::Green => text.black().on_green(),
        CellStyle::Red => text.white().on_red(),
        CellStyle::Yellow => text.black().on_yellow(),
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

/// Render rows as an aligned table. `color` enables cell backgrounds.
pub fn render_table(rows: &[ReviewRow], color: bool) -> String {
    let cells: Vec<[String; 10]> = rows.iter().map(ReviewRow::columns).collect();
    let mut widths = COLUMNS.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let header: Vec<String> = COLUMNS
        .iter()
        .zip(widths.iter())
        .map(|(name, width)| pad(name, *width))
        .collect();
    let header = header.join(" | ");
    if color {
        output.push_str(&header.bold().to_string());
    } else {
        output.push_str(&header);
    }
    output.push('\n');
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    output.push_str(&rule.join("-+-"));
    output.push('\n');

    for (row, row_cells) in rows.iter().zip(cells.iter()) {
        let rendered: Vec<String> = row_cells
            .iter()
            .enumerate()
            .map(|(column, cell)| {
                let padded = pad(cell, widths[column]);
                match cell_style(row, column) {
                    Some(style) if color => paint(&padded, style).to_string(),
                    _ => padded,
                }
            })
            .collect();
        output.push_str(rendered.join(" | ").trim_end());
        output.push('\n');
    }
    output
}

/// Warning lines for program-level diagnostics (empty when all is well).
pub fn render_warnings(diagnostics: &AnchorDiagnostics) -> String {
    let mut output = String::new();
    if !diagnostics.missing_anchor.is_empty() {
        output.push_str(&format!(
            "Missing Course 1 for: {}\n",
            diagnostics.missing_anchor.join(", ")
        ));
    }
    if !diagnostics.duplicate_anchor.is_empty() {
        output.push_str(&format!(
            "Several Course 1 rows (first one used) for: {}\n",
            diagnostics.duplicate_anchor.join(", ")
        ));
    }
    output
}

/// Explanation of how both closures are derived.
pub fn render_banner(policy: ClosurePolicy) -> String {
    format!(
        "Approx. closure = start of Course 1 in each program + {} days.\n\
         Official closure = end of Course 1 in each program + {} days of grace.\n",
        policy.approx_offset_days, policy.official_offset_days
    )
}

/// Summary lines printed after the table.
pub fn render_summary(summary: &ReviewSummary) -> String {
    let mut output = format!(
        "rows: {} across {} program(s)\n",
        summary.rows,
        summary.per_program.len()
    );
    for (label, tally) in [("approx.", &summary.approx), ("official", &summary.official)] {
        output.push_str(&format!(
            "{label:<8} finished={} in_progress={} unavailable={}\n",
            tally.finished, tally.in_progress, tally.unavailable
        ));
    }
    output
}

#[derive(Serialize)]
struct RowView<'a> {
    course_id: &'a str,
    program: &'a str,
    sis_id: &'a str,
    course_code: &'a str,
    course_name: &'a str,
    ordinal: Option<u64>,
    start: String,
    end: String,
    approx_closure: String,
    approx_status: CompletionStatus,
    official_closure: String,
    official_status: CompletionStatus,
}

impl<'a> From<&'a ReviewRow> for RowView<'a> {
    fn from(row: &'a ReviewRow) -> Self {
        let record = &row.record;
        Self {
            course_id: &record.course_id,
            program: &record.program_name,
            sis_id: &record.external_id,
            course_code: &record.code,
            course_name: &record.display_name,
            ordinal: record.ordinal,
            start: record.start.display(),
            end: record.end.display(),
            approx_closure: record.approx_closure.display(),
            approx_status: row.approx_status,
            official_closure: record.official_closure.display(),
            official_status: row.official_status,
        }
    }
}

#[derive(Serialize)]
struct ReportView<'a> {
    today: String,
    missing_course_1: &'a [String],
    duplicate_course_1: &'a [String],
    rows: Vec<RowView<'a>>,
}

/// Serialize the report as pretty JSON using the display strings.
pub fn render_json(report: &ReviewReport) -> Result<String, serde_json::Error> {
    let view = ReportView {
        today: report.today.format("%Y-%m-%d").to_string(),
        missing_course_1: &report.diagnostics.missing_anchor,
        duplicate_course_1: &report.diagnostics.duplicate_anchor,
        rows: report.rows.iter().map(RowView::from).collect(),
    };
    serde_json::to_string_pretty(&view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ClosureDate, CourseAttributes, CourseRecord};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn sample_row() -> ReviewRow {
        let course = CourseAttributes {
            name: Some("Estadística".into()),
            sis_course_id: Some("DIP-C1-2024".into()),
            course_code: Some("EST-1".into()),
            start_at: Some("2024-01-10T12:00:00Z".into()),
            ..CourseAttributes::default()
        };
        let mut record = CourseRecord::from_attributes("11", "Diplomado A", &course, chrono_tz::UTC);
        record.approx_closure = ClosureDate::On(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        ReviewRow::classify(record, today())
    }

    #[test]
    fn styles_follow_status_and_missing_end_date() {
        let row = sample_row();
        assert_eq!(cell_style(&row, END_COLUMN), Some(CellStyle::Yellow));
        assert_eq!(cell_style(&row, APPROX_STATUS_COLUMN), Some(CellStyle::Green));
        assert_eq!(cell_style(&row, OFFICIAL_STATUS_COLUMN), Some(CellStyle::Red));
        assert_eq!(cell_style(&row, 0), None);

        let failed = ReviewRow::classify(CourseRecord::unavailable("9"), today());
        assert_eq!(cell_style(&failed, END_COLUMN), None);
    }

    #[test]
    fn plain_table_is_aligned() {
        let rows = vec![sample_row()];
        let table = render_table(&rows, false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Program     | SIS ID"));
        assert!(lines[2].starts_with("Diplomado A | DIP-C1-2024 | EST-1"));
        assert!(lines[2].contains("| 31-01-2024      | Finished"));
        assert!(lines[2].ends_with("not applicable"));
        assert!(!table.contains('\u{1b}'));
    }

    #[test]
    fn warnings_list_programs() {
        assert_eq!(render_warnings(&AnchorDiagnostics::default()), "");
        let diagnostics = AnchorDiagnostics {
            missing_anchor: vec!["A".into(), "B".into()],
            duplicate_anchor: vec![],
        };
        assert_eq!(render_warnings(&diagnostics), "Missing Course 1 for: A, B\n");
    }

    #[test]
    fn banner_mentions_offsets() {
        let banner = render_banner(ClosurePolicy::default());
        assert!(banner.contains("+ 171 days"));
        assert!(banner.contains("+ 21 days of grace"));
    }

    #[test]
    fn json_uses_display_strings() {
        let report = ReviewReport {
            today: today(),
            rows: vec![sample_row()],
            diagnostics: AnchorDiagnostics::default(),
        };
        let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        assert_eq!(json["today"], "2024-06-01");
        assert_eq!(json["rows"][0]["approx_status"], "Finished");
        assert_eq!(json["rows"][0]["end"], "not configured");
        assert_eq!(json["rows"][0]["ordinal"], 1);
        assert_eq!(json["rows"][0]["official_status"], "not applicable");
    }
}
