use std::io;

use thiserror::Error;

use crate::types::{AccountId, CourseId};

/// Error type for configuration, input, and remote lookup failures.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("course '{course_id}' is unavailable: {reason}")]
    CourseUnavailable { course_id: CourseId, reason: String },
    #[error("program account '{account_id}' is unavailable: {reason}")]
    ProgramUnavailable {
        account_id: AccountId,
        reason: String,
    },
    #[error("timestamp '{raw}' is not ISO-8601")]
    MalformedTimestamp { raw: String },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("no course ids were provided")]
    EmptyInput,
    #[error(transparent)]
    Io(#[from] io::Error),
}
