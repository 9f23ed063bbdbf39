/// Constants used when deriving closure dates from Course 1.
pub mod closure {
    /// Days added to the Course 1 start date for the approximate closure.
    pub const APPROX_OFFSET_DAYS: u64 = 171;
    /// Grace days added to the Course 1 end date for the official closure.
    pub const OFFICIAL_OFFSET_DAYS: u64 = 21;
    /// Ordinal that marks the anchor course of a program.
    pub const ANCHOR_ORDINAL: u64 = 1;
}

/// Display labels and formats used at the render boundary.
pub mod labels {
    /// `chrono` format used for every rendered date (e.g. `29-06-2024`).
    pub const DATE_FORMAT: &str = "%d-%m-%Y";
    /// Shown when a course has no start/end timestamp.
    pub const NOT_CONFIGURED: &str = "not configured";
    /// Shown in date cells when the course lookup failed.
    pub const FETCH_ERROR: &str = "Error";
    /// Shown for closures that cannot be derived.
    pub const NOT_APPLICABLE: &str = "not applicable";
    /// Approximate-status fallback when no closure date exists.
    pub const STATUS_ERROR: &str = "Error";
    /// Closure date strictly before today.
    pub const STATUS_FINISHED: &str = "Finished";
    /// Closure date today or later.
    pub const STATUS_IN_PROGRESS: &str = "In progress";
    /// Program name used when a course or program lookup failed.
    pub const PROGRAM_LOAD_FAILED: &str = "Failed to load";
    /// Program name used when the course has no account reference.
    pub const PROGRAM_NOT_AVAILABLE: &str = "Not available";
    /// Program name used when the account has no name.
    pub const PROGRAM_UNNAMED: &str = "No program";
    /// Course name used when the course has no name.
    pub const COURSE_UNNAMED: &str = "Unnamed";
    /// Column headers for the ten display columns, in order.
    pub const COLUMNS: [&str; 10] = [
        "Program",
        "SIS ID",
        "Course Code",
        "Course Name",
        "Start",
        "End",
        "Approx. Closure",
        "Approx. Status",
        "Official Closure",
        "Official Status",
    ];
}

/// Constants used by configuration resolution.
pub mod config {
    /// Preferred environment variable for the LMS API base URL.
    pub const ENV_BASE_URL: &str = "CLOSURE_REVIEW_URL";
    /// Legacy environment variable for the LMS API base URL.
    pub const ENV_BASE_URL_LEGACY: &str = "URL";
    /// Preferred environment variable for the bearer token.
    pub const ENV_TOKEN: &str = "CLOSURE_REVIEW_TOKEN";
    /// Legacy environment variable for the bearer token.
    pub const ENV_TOKEN_LEGACY: &str = "TOKEN";
    /// Environment variable overriding the display timezone.
    pub const ENV_TIMEZONE: &str = "CLOSURE_REVIEW_TIMEZONE";
    /// Default display timezone.
    pub const DEFAULT_TIMEZONE: chrono_tz::Tz = chrono_tz::America::Santiago;
}
