#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Closure derivation per program anchor.
pub mod aggregate;
/// Reusable CLI runners.
pub mod apps;
/// Review configuration and environment resolution.
pub mod config;
/// Centralized constants: offsets, labels, env var names.
pub mod constants;
/// Course attributes and derived record types.
pub mod data;
/// Summary counts over a review.
pub mod metrics;
/// Course ordinal extraction.
pub mod ordinal;
/// Table, warning and JSON rendering.
pub mod render;
/// The end-to-end review pipeline.
pub mod review;
/// Course sources: the LMS client and an in-memory source.
pub mod source;
/// Completion status classification.
pub mod status;
/// Timestamp parsing and display.
pub mod temporal;
/// Shared type aliases.
pub mod types;

mod errors;

pub use aggregate::{AnchorDiagnostics, ProgramClosures, assign_closures, presentation_order};
pub use config::{ClosurePolicy, ReviewConfig};
pub use data::{AccountRef, ClosureDate, CourseAttributes, CourseRecord, ProgramAttributes};
pub use errors::ReviewError;
pub use metrics::{ReviewSummary, StatusTally, review_summary};
pub use ordinal::{OrdinalPattern, derive_ordinal, extract_ordinal};
pub use review::{ReviewReport, ReviewRow, build_report, parse_course_ids, review, review_text};
pub use source::{CanvasClient, CourseSource, InMemorySource, fetch_records};
pub use status::{CompletionStatus, Fallback, classify, classify_text};
pub use temporal::{Timestamp, normalize_timestamp, parse_instant};
pub use types::{AccountId, CourseId, Ordinal, ProgramName};
