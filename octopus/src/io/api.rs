//! Entry point for the Octopus REST API.
//!
//! [`OctopusApi`] owns a [`Transport`] and hands out borrowed resource clients
//! (`releases()`, `projects()`, ...). All of them share the request helpers
//! below, which turn error-flagged responses into [`ApiError::Status`] and
//! deserialize bodies into typed records.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::matching::{NameMatch, Named, find_by_name};
use crate::io::config::OctopusConfig;
use crate::io::deployments::DeploymentsApi;
use crate::io::environments::EnvironmentsApi;
use crate::io::error::ApiError;
use crate::io::projects::ProjectsApi;
use crate::io::releases::ReleasesApi;
use crate::io::transport::{HttpTransport, Transport, WebResponse};

/// Client for one Octopus server.
#[derive(Debug)]
pub struct OctopusApi<T: Transport> {
    transport: T,
    host: String,
}

impl OctopusApi<HttpTransport> {
    /// Build an HTTP-backed client from validated configuration.
    pub fn connect(config: &OctopusConfig) -> Self {
        Self::new(HttpTransport::from_config(config), &config.host)
    }
}

impl<T: Transport> OctopusApi<T> {
    pub fn new(transport: T, host: &str) -> Self {
        Self {
            transport,
            host: host.trim_end_matches('/').to_string(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn releases(&self) -> ReleasesApi<'_, T> {
        ReleasesApi::new(self)
    }

    pub fn projects(&self) -> ProjectsApi<'_, T> {
        ProjectsApi::new(self)
    }

    pub fn environments(&self) -> EnvironmentsApi<'_, T> {
        EnvironmentsApi::new(self)
    }

    pub fn deployments(&self) -> DeploymentsApi<'_, T> {
        DeploymentsApi::new(self)
    }

    /// Turn a host-relative portal link (`Links.Web`) into an absolute URL.
    pub fn portal_link(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            return link.to_string();
        }
        format!("{}/{}", self.host, link.trim_start_matches('/'))
    }

    /// GET `path` and return the body, failing on an error-flagged response.
    pub(crate) fn get_body(&self, path: &str) -> Result<String, ApiError> {
        let response = self.transport.get(path)?;
        ensure_success(response)
    }

    /// GET `path` and deserialize the body as `D`.
    pub(crate) fn get_json<D: DeserializeOwned>(&self, path: &str) -> Result<D, ApiError> {
        let body = self.get_body(path)?;
        parse_body(path, &body)
    }

    /// Load a named collection from `path` and pick the record matching `name`.
    pub(crate) fn find_named<R>(
        &self,
        path: &str,
        name: &str,
        mode: NameMatch,
    ) -> Result<Option<R>, ApiError>
    where
        R: DeserializeOwned + Named + Clone,
    {
        require(name, "name")?;
        let records: Vec<R> = self.get_json(path)?;
        let found = find_by_name(&records, name, mode).cloned();
        debug!(path, candidates = records.len(), found = found.is_some(), "name lookup");
        Ok(found)
    }

    /// POST `payload` as JSON to `path` and return the raw body.
    pub(crate) fn post_body<B: Serialize>(&self, path: &str, payload: &B) -> Result<String, ApiError> {
        let json = serde_json::to_string(payload).map_err(|source| ApiError::Encode {
            path: path.to_string(),
            source,
        })?;
        let response = self.transport.post(path, &json)?;
        ensure_success(response)
    }

    /// POST `payload` as JSON to `path` and deserialize the reply as `D`.
    pub(crate) fn post_json<B, D>(&self, path: &str, payload: &B) -> Result<D, ApiError>
    where
        B: Serialize,
        D: DeserializeOwned,
    {
        let body = self.post_body(path, payload)?;
        parse_body(path, &body)
    }
}

/// Reject blank path segments before they reach the server.
pub(crate) fn require(value: &str, what: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidArgument(format!("{what} must not be empty")));
    }
    Ok(())
}

fn ensure_success(response: WebResponse) -> Result<String, ApiError> {
    if response.is_error() {
        return Err(ApiError::Status {
            code: response.code,
            body: response.body,
        });
    }
    Ok(response.body)
}

fn parse_body<D: DeserializeOwned>(path: &str, body: &str) -> Result<D, ApiError> {
    serde_json::from_str(body).map_err(|source| {
        debug!(path, err = %source, "response did not match expected shape");
        ApiError::Malformed {
            path: path.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedTransport, TEST_HOST};

    #[test]
    fn portal_link_joins_relative_links_onto_host() {
        let api = OctopusApi::new(ScriptedTransport::new(), "http://octopus.test/");
        assert_eq!(
            api.portal_link("/app#/releases/Releases-1"),
            "http://octopus.test/app#/releases/Releases-1"
        );
        assert_eq!(
            api.portal_link("https://elsewhere/app"),
            "https://elsewhere/app"
        );
    }

    #[test]
    fn error_status_becomes_status_error() {
        let transport = ScriptedTransport::new().on_get("projects/all", 401, "unauthorized");
        let api = OctopusApi::new(transport, TEST_HOST);
        let err = api.get_body("projects/all").unwrap_err();
        assert!(matches!(err, ApiError::Status { code: 401, ref body } if body == "unauthorized"));
    }

    #[test]
    fn invalid_json_becomes_malformed_error() {
        let transport = ScriptedTransport::new().on_get("projects/all", 200, "<html>");
        let api = OctopusApi::new(transport, TEST_HOST);
        let err = api
            .get_json::<Vec<crate::core::types::Project>>("projects/all")
            .unwrap_err();
        assert!(matches!(err, ApiError::Malformed { .. }));
    }

    #[test]
    fn post_json_parses_reply() {
        let transport =
            ScriptedTransport::new().on_post("projects", 201, r#"{"Id":"P-3","Name":"New"}"#);
        let api = OctopusApi::new(transport, TEST_HOST);
        let project: crate::core::types::Project = api
            .post_json("projects", &serde_json::json!({"Name": "New"}))
            .expect("post");
        assert_eq!(project.id(), "P-3");
    }

    #[test]
    fn post_json_rejects_unexpected_reply() {
        let transport = ScriptedTransport::new().on_post("projects", 201, "created");
        let api = OctopusApi::new(transport, TEST_HOST);
        let err = api
            .post_json::<_, crate::core::types::Project>("projects", &serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, ApiError::Malformed { ref path, .. } if path == "projects"));
    }

    #[test]
    fn unserializable_payload_is_encode_error_and_not_sent() {
        let api = OctopusApi::new(ScriptedTransport::new(), TEST_HOST);
        // JSON object keys must be strings.
        let payload = std::collections::BTreeMap::from([(vec![1u8], 1u8)]);
        let err = api.post_body("deployments", &payload).unwrap_err();
        assert!(matches!(err, ApiError::Encode { ref path, .. } if path == "deployments"));
        assert!(api.transport().requests().is_empty());
    }

    #[test]
    fn require_rejects_blank_values() {
        assert!(require("  ", "project id").is_err());
        assert!(require("Projects-1", "project id").is_ok());
    }
}
