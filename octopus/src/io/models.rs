//! Wire shapes of the Octopus REST API.
//!
//! Responses are deserialized straight into these structs; anything that does
//! not fit surfaces as [`ApiError::Malformed`](crate::io::error::ApiError::Malformed).
//! Unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::core::types::{Release, SelectedPackage};

/// Paged collection envelope (`{"Items": [...]}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Page<T> {
    pub items: Vec<T>,
}

/// Link block attached to most resources.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Links {
    /// Host-relative portal URL.
    pub web: String,
}

/// Resource carrying only its links (used for portal URL lookups).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Linked {
    pub links: Links,
}

/// A release as returned by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReleaseResource {
    pub id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub version: String,
    pub channel_id: String,
    #[serde(default)]
    pub release_notes: Option<String>,
}

impl ReleaseResource {
    /// Convert into a [`Release`], using `project_id` when the payload omits it.
    pub fn into_release(self, project_id: &str) -> Release {
        let owner = self.project_id.unwrap_or_else(|| project_id.to_string());
        Release::new(self.id, owner, self.channel_id, self.release_notes, self.version)
    }
}

/// Body of `POST releases`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateReleaseRequest<'a> {
    pub project_id: &'a str,
    pub version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<&'a str>,
    pub selected_packages: &'a [SelectedPackage],
}

/// Body of `POST deployments`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDeploymentRequest<'a> {
    pub release_id: &'a str,
    pub environment_id: &'a str,
}
