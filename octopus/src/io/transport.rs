//! Authenticated HTTP transport for the Octopus REST API.
//!
//! The [`Transport`] trait decouples the resource clients from the HTTP stack.
//! Tests use a scripted transport that returns canned responses without opening
//! sockets.

use std::fmt;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::io::config::OctopusConfig;
use crate::io::error::ApiError;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "X-Octopus-ApiKey";

/// Raw HTTP outcome: status code plus body text.
///
/// Error status codes are reported here rather than as `Err`, so each caller
/// decides whether a failed response is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebResponse {
    pub code: u16,
    pub body: String,
}

impl WebResponse {
    pub fn new(code: u16, body: impl Into<String>) -> Self {
        Self {
            code,
            body: body.into(),
        }
    }

    /// True for any outcome outside the 2xx/3xx range.
    pub fn is_error(&self) -> bool {
        !(200..400).contains(&self.code)
    }
}

/// Abstraction over the HTTP backend. Paths are relative to `{host}/api/`.
pub trait Transport {
    fn get(&self, path: &str) -> Result<WebResponse, ApiError>;

    fn post(&self, path: &str, json_body: &str) -> Result<WebResponse, ApiError>;
}

/// Blocking [`Transport`] backed by a `ureq` agent.
pub struct HttpTransport {
    agent: ureq::Agent,
    host: String,
    api_key: String,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(host: &str, api_key: &str, timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            // Status codes are surfaced through `WebResponse::is_error`.
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            host: host.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &OctopusConfig) -> Self {
        Self::new(
            &config.host,
            &config.api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Build the absolute URL for an API path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/api/{}", self.host, path.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    #[instrument(skip_all, fields(path = %path))]
    fn get(&self, path: &str) -> Result<WebResponse, ApiError> {
        let url = self.url_for(path);
        debug!(url = %url, "GET");
        let result = self
            .agent
            .get(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .call();
        into_web_response(&url, result)
    }

    #[instrument(skip_all, fields(path = %path))]
    fn post(&self, path: &str, json_body: &str) -> Result<WebResponse, ApiError> {
        let url = self.url_for(path);
        debug!(url = %url, body_bytes = json_body.len(), "POST");
        let result = self
            .agent
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header("Content-Type", "application/json")
            .send(json_body);
        into_web_response(&url, result)
    }
}

fn into_web_response(
    url: &str,
    result: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
) -> Result<WebResponse, ApiError> {
    let mut response = result.map_err(|err| transport_error(url, err))?;
    let code = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|err| transport_error(url, err))?;
    let response = WebResponse { code, body };
    if response.is_error() {
        warn!(code, url, "error status from server");
    } else {
        debug!(code, body_bytes = response.body.len(), "response received");
    }
    Ok(response)
}

fn transport_error(url: &str, err: ureq::Error) -> ApiError {
    let message = match err {
        ureq::Error::Timeout(_) => "timed out".to_string(),
        ureq::Error::HostNotFound => "host not found".to_string(),
        ureq::Error::Io(e) => e.to_string(),
        other => other.to_string(),
    };
    warn!(url, message = %message, "transport failure");
    ApiError::Transport {
        url: url.to_string(),
        message,
    }
}
