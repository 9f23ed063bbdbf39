use serde::de::DeserializeOwned;
use tracing::info;
use ureq::Agent;

use crate::config::ReviewConfig;
use crate::data::{CourseAttributes, ProgramAttributes};
use crate::errors::ReviewError;
use crate::source::CourseSource;

const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// Blocking Canvas REST client.
///
/// Holds one reusable agent and the bearer credential for the whole batch.
/// There are no retries: one failed attempt is final for that lookup.
pub struct CanvasClient {
    agent: Agent,
    base_url: String,
    authorization: Option<String>,
}

impl CanvasClient {
    /// Build a client from configuration.
    ///
    /// Fails with [`ReviewError::Configuration`] when no base URL is set, so
    /// nothing is fetched without one.
    pub fn new(config: &ReviewConfig) -> Result<Self, ReviewError> {
        let base_url = config.require_base_url()?;
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        let authorization = config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| format!("Bearer {token}"));
        info!("[closure_review:canvas] using API base {}", base_url);
        Ok(Self {
            agent,
            base_url,
            authorization,
        })
    }

    /// API base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base}{endpoint}` and decode the JSON body.
    ///
    /// Errors are returned as a human-readable reason; callers wrap them in
    /// the matching [`ReviewError`] variant.
    fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.agent.get(&url);
        if let Some(authorization) = &self.authorization {
            request = request.header("Authorization", authorization.as_str());
        }
        let response = request
            .call()
            .map_err(|err| format!("request to {url} failed: {err}"))?;
        let status = response.status();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|err| format!("failed reading response body from {url}: {err}"))?;
        if !status.is_success() {
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
            return Err(format!(
                "status {} from {url}: {}",
                status.as_u16(),
                preview.trim()
            ));
        }
        serde_json::from_str(&body).map_err(|err| format!("failed parsing response from {url}: {err}"))
    }
}

impl CourseSource for CanvasClient {
    fn fetch_course(&self, course_id: &str) -> Result<CourseAttributes, ReviewError> {
        self.get_json(&format!("/courses/{course_id}"))
            .map_err(|reason| ReviewError::CourseUnavailable {
                course_id: course_id.to_string(),
                reason,
            })
    }

    fn fetch_program(&self, account_id: &str) -> Result<ProgramAttributes, ReviewError> {
        self.get_json(&format!("/accounts/{account_id}"))
            .map_err(|reason| ReviewError::ProgramUnavailable {
                account_id: account_id.to_string(),
                reason,
            })
    }
}
