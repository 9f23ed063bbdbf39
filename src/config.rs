use chrono_tz::Tz;

use crate::constants::closure::{APPROX_OFFSET_DAYS, OFFICIAL_OFFSET_DAYS};
use crate::constants::config::{
    DEFAULT_TIMEZONE, ENV_BASE_URL, ENV_BASE_URL_LEGACY, ENV_TIMEZONE, ENV_TOKEN,
    ENV_TOKEN_LEGACY,
};
use crate::errors::ReviewError;

/// Closure derivation settings.
#[derive(Clone, Copy, Debug)]
pub struct ClosurePolicy {
    /// Days added to the Course 1 start date for the approximate closure.
    pub approx_offset_days: u64,
    /// Grace days added to the Course 1 end date for the official closure.
    pub official_offset_days: u64,
}

impl Default for ClosurePolicy {
    fn default() -> Self {
        Self {
            approx_offset_days: APPROX_OFFSET_DAYS,
            official_offset_days: OFFICIAL_OFFSET_DAYS,
        }
    }
}

/// Top-level review configuration.
///
/// Built once at startup and passed by reference into the client and the
/// pipeline. `base_url` is optional here so that flag overrides can be
/// applied before [`ReviewConfig::require_base_url`] enforces it.
#[derive(Clone, Debug)]
pub struct ReviewConfig {
    /// LMS API base URL, e.g. `https://lms.example.edu/api/v1`.
    pub base_url: Option<String>,
    /// Bearer credential sent with every request.
    pub token: Option<String>,
    /// Timezone all instants are converted to before rendering or comparing.
    pub display_timezone: Tz,
    /// Closure offsets.
    pub closure: ClosurePolicy,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            display_timezone: DEFAULT_TIMEZONE,
            closure: ClosurePolicy::default(),
        }
    }
}

impl ReviewConfig {
    /// Resolve configuration from the process environment.
    ///
    /// Variables are read in priority order (prefixed name, then legacy name);
    /// blank values count as unset. An unparseable timezone is an error.
    pub fn from_env() -> Result<Self, ReviewError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ReviewError> {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(*key))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };
        let mut config = Self {
            base_url: first(&[ENV_BASE_URL, ENV_BASE_URL_LEGACY]),
            token: first(&[ENV_TOKEN, ENV_TOKEN_LEGACY]),
            ..Self::default()
        };
        if let Some(raw) = first(&[ENV_TIMEZONE]) {
            config.display_timezone = parse_timezone(&raw)?;
        }
        Ok(config)
    }

    /// Return the base URL without a trailing slash, or a configuration error.
    pub fn require_base_url(&self) -> Result<String, ReviewError> {
        self.base_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ReviewError::Configuration(format!(
                    "LMS base URL is not configured; set {ENV_BASE_URL} (or {ENV_BASE_URL_LEGACY})"
                ))
            })
    }
}

/// Parse an IANA timezone name such as `America/Santiago`.
pub fn parse_timezone(raw: &str) -> Result<Tz, ReviewError> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|_| ReviewError::Configuration(format!("unknown timezone '{}'", raw.trim())))
}
