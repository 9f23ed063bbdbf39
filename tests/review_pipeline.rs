use chrono::NaiveDate;

use closure_review::data::AccountRef;
use closure_review::render::{render_table, render_warnings};
use closure_review::{
    ClosureDate, CourseAttributes, Fallback, InMemorySource, ReviewConfig, classify_text,
    extract_ordinal, review_text,
};

fn course(
    sis: Option<&str>,
    code: &str,
    account: u64,
    start: Option<&str>,
    end: Option<&str>,
) -> CourseAttributes {
    CourseAttributes {
        name: Some(format!("{code} name")),
        sis_course_id: sis.map(str::to_string),
        course_code: Some(code.to_string()),
        account_id: Some(AccountRef::Number(account)),
        start_at: start.map(str::to_string),
        end_at: end.map(str::to_string),
    }
}

fn utc_config() -> ReviewConfig {
    ReviewConfig {
        display_timezone: chrono_tz::UTC,
        ..ReviewConfig::default()
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Two programs: A has a Course 1, B does not.
fn two_programs() -> InMemorySource {
    InMemorySource::new()
        .with_program("1", Some("Program A"))
        .with_program("2", Some("Program B"))
        .with_course(
            "10",
            course(Some("A-C1-2024"), "A1", 1, Some("2024-01-10T00:00:00Z"), Some("2024-02-20T00:00:00Z")),
        )
        .with_course(
            "11",
            course(None, "Curso 3", 1, Some("2024-05-01T00:00:00Z"), None),
        )
        .with_course("12", course(None, "Electivo", 1, None, None))
        .with_course(
            "13",
            course(Some("A-C2-2024"), "Curso 9", 1, Some("2024-03-01T00:00:00Z"), None),
        )
        .with_course(
            "20",
            course(None, "Curso 2", 2, Some("2024-01-01T00:00:00Z"), None),
        )
}

#[test]
fn one_row_per_token_even_with_failures_and_duplicates() {
    let source = two_programs();
    let report = review_text(&source, "10, 11 404\n10,,missing", &utc_config(), ymd(2024, 7, 1))
        .expect("review");
    assert_eq!(report.rows.len(), 5);
}

#[test]
fn ordinal_patterns_apply_in_priority_order() {
    assert_eq!(extract_ordinal("DIP-C3-2024"), Some(3));
    assert_eq!(extract_ordinal("Curso 2"), Some(2));
    assert_eq!(extract_ordinal("Electivo"), None);

    let source = two_programs();
    let report = review_text(&source, "13", &utc_config(), ymd(2024, 7, 1)).expect("review");
    assert_eq!(report.rows[0].record.ordinal, Some(2));
}

#[test]
fn anchor_dates_drive_every_row_of_the_program() {
    let source = two_programs();
    let report = review_text(&source, "11 12 10 13", &utc_config(), ymd(2024, 7, 1)).expect("review");
    for row in &report.rows {
        assert_eq!(row.record.program_name, "Program A");
        assert_eq!(row.record.approx_closure, ClosureDate::On(ymd(2024, 6, 29)));
        assert_eq!(row.record.official_closure, ClosureDate::On(ymd(2024, 3, 12)));
        assert_eq!(row.approx_status.label(), "Finished");
    }
    assert!(report.diagnostics.missing_anchor.is_empty());
}

#[test]
fn program_without_course_one_is_not_applicable_and_warned() {
    let source = two_programs();
    let report = review_text(&source, "20 10", &utc_config(), ymd(2024, 7, 1)).expect("review");
    let row_b = report
        .rows
        .iter()
        .find(|row| row.record.program_name == "Program B")
        .expect("program B row");
    assert_eq!(row_b.record.approx_closure.display(), "not applicable");
    assert_eq!(row_b.record.official_closure.display(), "not applicable");
    assert_eq!(row_b.approx_status.label(), "Error");
    assert_eq!(row_b.official_status.label(), "not applicable");
    assert_eq!(report.diagnostics.missing_anchor, vec!["Program B"]);
    assert_eq!(
        render_warnings(&report.diagnostics),
        "Missing Course 1 for: Program B\n"
    );
}

#[test]
fn classification_fallbacks_differ_per_column() {
    let today = ymd(2024, 7, 1);
    assert_eq!(classify_text("01-01-2000", today, Fallback::APPROX).label(), "Finished");
    assert_eq!(
        classify_text("not applicable", today, Fallback::OFFICIAL).label(),
        "not applicable"
    );
    assert_eq!(classify_text("not applicable", today, Fallback::APPROX).label(), "Error");
}

#[test]
fn failed_lookup_row_renders_placeholders() {
    let source = two_programs();
    let report = review_text(&source, "404", &utc_config(), ymd(2024, 7, 1)).expect("review");
    let cells = report.rows[0].columns();
    assert_eq!(cells[3], "ID 404");
    assert_eq!(cells[4], "Error");
    assert_eq!(cells[5], "Error");
    assert_eq!(cells[6], "not applicable");
    assert_eq!(cells[8], "not applicable");
}

#[test]
fn rows_sort_by_program_then_ordinal_with_unknown_last() {
    let source = two_programs();
    let report = review_text(&source, "12 20 11 13 10", &utc_config(), ymd(2024, 7, 1))
        .expect("review");
    let order: Vec<&str> = report
        .rows
        .iter()
        .map(|row| row.record.course_id.as_str())
        .collect();
    assert_eq!(order, vec!["10", "13", "11", "12", "20"]);

    let table = render_table(&report.rows, false);
    assert_eq!(table.lines().count(), 2 + report.rows.len());
}

#[test]
fn display_timezone_shifts_calendar_dates() {
    let source = InMemorySource::new()
        .with_program("1", Some("Program A"))
        .with_course(
            "10",
            course(Some("A-C1-2024"), "A1", 1, Some("2024-03-01T02:00:00Z"), None),
        );
    let report = review_text(&source, "10", &ReviewConfig::default(), ymd(2024, 7, 1))
        .expect("review");
    // America/Santiago is UTC-3 on that date.
    assert_eq!(report.rows[0].record.start.display(), "29-02-2024");
}

#[test]
fn malformed_timestamp_degrades_to_error_cell() {
    let source = InMemorySource::new()
        .with_program("1", Some("Program A"))
        .with_course("10", course(Some("A-C1-2024"), "A1", 1, Some("next monday"), None));
    let report = review_text(&source, "10", &utc_config(), ymd(2024, 7, 1)).expect("review");
    let row = &report.rows[0];
    assert_eq!(row.record.start.display(), "Error");
    assert_eq!(row.approx_status.label(), "Error");
    assert_eq!(row.official_status.label(), "not applicable");
}
