use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{Parser, ValueEnum, error::ErrorKind};

use crate::config::{ReviewConfig, parse_timezone};
use crate::metrics::review_summary;
use crate::render::{render_banner, render_json, render_summary, render_table, render_warnings};
use crate::review::{parse_course_ids, review};
use crate::source::{CanvasClient, CourseSource};
use crate::temporal::today_in;
use crate::types::CourseId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "review_courses",
    disable_help_subcommand = true,
    about = "Review which programs are finished and closed",
    long_about = "Fetch courses from the LMS, derive each program's approximate and official closure dates from its Course 1, and classify every course as finished or in progress.",
    after_help = "The API base URL and token are resolved in order by explicit arg, then CLOSURE_REVIEW_URL/URL and CLOSURE_REVIEW_TOKEN/TOKEN."
)]
/// CLI for `review_courses`.
///
/// Common usage:
/// - Review ids inline: `review_courses 101 102,103`
/// - Read ids from a file (commas or whitespace): `--ids-file ids.txt`
/// - Pin the comparison date: `--today 2024-07-01`
struct ReviewCoursesCli {
    #[arg(
        value_name = "COURSE_ID",
        help = "Course ids; commas and whitespace both separate ids"
    )]
    course_ids: Vec<String>,
    #[arg(
        long = "ids-file",
        value_name = "PATH",
        help = "Optional file with more course ids, appended after inline ids"
    )]
    ids_file: Option<PathBuf>,
    #[arg(
        long = "base-url",
        value_name = "URL",
        help = "LMS API base URL, e.g. https://lms.example.edu/api/v1"
    )]
    base_url: Option<String>,
    #[arg(
        long,
        value_name = "IANA_NAME",
        value_parser = parse_timezone_arg,
        help = "Display timezone (default America/Santiago)"
    )]
    timezone: Option<Tz>,
    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        value_parser = parse_date_arg,
        help = "Compare closures against this date instead of today"
    )]
    today: Option<NaiveDate>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, help = "Output format")]
    format: OutputFormat,
    #[arg(long = "no-color", help = "Disable cell colors")]
    no_color: bool,
}

/// Entry point for the `review_courses` binary.
///
/// Configuration comes from the environment, output goes to stdout.
pub fn run_review_courses<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let config = ReviewConfig::from_env()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_review_courses_with(args_iter, config, &mut out)
}

/// Same as [`run_review_courses`] with explicit configuration and output.
pub fn run_review_courses_with<I, W>(
    args_iter: I,
    mut config: ReviewConfig,
    out: &mut W,
) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
    W: Write,
{
    let Some(cli) = parse_cli::<ReviewCoursesCli, _>(
        std::iter::once("review_courses".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    if let Some(base_url) = cli.base_url {
        config.base_url = Some(base_url);
    }
    if let Some(timezone) = cli.timezone {
        config.display_timezone = timezone;
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    // A missing base URL is fatal before any id is even read.
    let client = CanvasClient::new(&config)?;
    let course_ids = collect_course_ids(cli.course_ids, cli.ids_file.as_deref())?;
    let today = cli
        .today
        .unwrap_or_else(|| today_in(config.display_timezone));

    write_review(
        &client,
        &course_ids,
        &config,
        today,
        cli.format,
        !cli.no_color,
        out,
    )
}

fn collect_course_ids(
    inline: Vec<String>,
    ids_file: Option<&Path>,
) -> Result<Vec<CourseId>, Box<dyn Error>> {
    let mut course_ids: Vec<CourseId> = inline
        .iter()
        .flat_map(|value| parse_course_ids(value))
        .collect();
    if let Some(path) = ids_file {
        let text = fs::read_to_string(path)
            .map_err(|err| format!("could not read ids file {}: {err}", path.display()))?;
        course_ids.extend(parse_course_ids(&text));
    }
    Ok(course_ids)
}

fn write_review<W: Write>(
    source: &dyn CourseSource,
    course_ids: &[CourseId],
    config: &ReviewConfig,
    today: NaiveDate,
    format: OutputFormat,
    color: bool,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let report = review(source, course_ids, config, today)?;

    if format == OutputFormat::Json {
        writeln!(out, "{}", render_json(&report)?)?;
        return Ok(());
    }

    write!(out, "{}", render_banner(config.closure))?;
    writeln!(out)?;
    let warnings = render_warnings(&report.diagnostics);
    for line in warnings.lines() {
        writeln!(out, "WARNING: {line}")?;
    }
    write!(out, "{}", render_table(&report.rows, color))?;
    writeln!(out)?;
    write!(out, "{}", render_summary(&review_summary(&report.rows)))?;
    Ok(())
}

fn parse_timezone_arg(raw: &str) -> Result<Tz, String> {
    parse_timezone(raw).map_err(|err| err.to_string())
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}': expected YYYY-MM-DD", raw.trim()))
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CourseAttributes;
    use crate::errors::ReviewError;
    use crate::source::InMemorySource;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn cli_parses_flags() {
        let cli = parse_cli::<ReviewCoursesCli, _>([
            "review_courses",
            "101,102",
            "103",
            "--timezone",
            "UTC",
            "--today",
            "2024-07-01",
            "--format",
            "json",
        ])
        .unwrap()
        .unwrap();
        assert_eq!(cli.course_ids, vec!["101,102", "103"]);
        assert_eq!(cli.timezone, Some(chrono_tz::UTC));
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 7, 1));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.no_color);
    }

    #[test]
    fn cli_rejects_bad_date_and_timezone() {
        assert!(parse_cli::<ReviewCoursesCli, _>(["review_courses", "--today", "01-07-2024"]).is_err());
        assert!(parse_cli::<ReviewCoursesCli, _>(["review_courses", "--timezone", "Nowhere"]).is_err());
    }

    #[test]
    fn missing_base_url_fails_before_reading_ids() {
        let mut out = Vec::new();
        let err = run_review_courses_with(
            args(&["101", "--ids-file", "/definitely/not/here.txt"]),
            ReviewConfig::default(),
            &mut out,
        )
        .unwrap_err();
        assert!(err.to_string().contains("base URL is not configured"));
        assert!(out.is_empty());
    }

    #[test]
    fn ids_are_collected_from_args_and_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "201, 202\n\n203").unwrap();
        let ids = collect_course_ids(
            vec!["101,102".into(), "103".into()],
            Some(file.path()),
        )
        .unwrap();
        assert_eq!(ids, vec!["101", "102", "103", "201", "202", "203"]);
    }

    #[test]
    fn write_review_rejects_empty_ids() {
        let mut out = Vec::new();
        let err = write_review(
            &InMemorySource::new(),
            &[],
            &ReviewConfig::default(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            OutputFormat::Table,
            false,
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReviewError>(),
            Some(ReviewError::EmptyInput)
        ));
    }

    #[test]
    fn write_review_prints_warning_before_table() {
        let source = InMemorySource::new().with_course(
            "5",
            CourseAttributes {
                name: Some("Orphan".into()),
                course_code: Some("Curso 2".into()),
                ..CourseAttributes::default()
            },
        );
        let mut out = Vec::new();
        write_review(
            &source,
            &["5".to_string()],
            &ReviewConfig::default(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            OutputFormat::Table,
            false,
            &mut out,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        let warning = text
            .find("WARNING: Missing Course 1 for: Not available")
            .expect("warning line");
        let header = text.find("Program ").expect("table header");
        assert!(warning < header);
        assert!(text.contains("rows: 1 across 1 program(s)"));
    }
}
