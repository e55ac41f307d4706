//! Project resource client.

use crate::core::matching::NameMatch;
use crate::core::types::Project;
use crate::io::api::{OctopusApi, require};
use crate::io::error::ApiError;
use crate::io::transport::Transport;

const ALL_PROJECTS: &str = "projects/all";

/// Lookups over the server's projects.
pub struct ProjectsApi<'c, T: Transport> {
    client: &'c OctopusApi<T>,
}

impl<'c, T: Transport> ProjectsApi<'c, T> {
    pub(crate) fn new(client: &'c OctopusApi<T>) -> Self {
        Self { client }
    }

    /// Every project on the server.
    pub fn all(&self) -> Result<Vec<Project>, ApiError> {
        self.client.get_json(ALL_PROJECTS)
    }

    /// Case-insensitive lookup; the returned record carries the server's casing.
    pub fn by_name(&self, name: &str) -> Result<Option<Project>, ApiError> {
        self.client.find_named(ALL_PROJECTS, name, NameMatch::IgnoreCase)
    }

    /// Exact, case-sensitive lookup.
    pub fn by_name_exact(&self, name: &str) -> Result<Option<Project>, ApiError> {
        self.client.find_named(ALL_PROJECTS, name, NameMatch::Exact)
    }

    pub fn by_id(&self, id: &str) -> Result<Project, ApiError> {
        require(id, "project id")?;
        self.client.get_json(&format!("projects/{id}"))
    }
}
