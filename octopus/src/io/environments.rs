//! Environment resource client.

use crate::core::matching::NameMatch;
use crate::core::types::Environment;
use crate::io::api::{OctopusApi, require};
use crate::io::error::ApiError;
use crate::io::transport::Transport;

const ALL_ENVIRONMENTS: &str = "environments/all";

/// Lookups over the server's deployment environments.
pub struct EnvironmentsApi<'c, T: Transport> {
    client: &'c OctopusApi<T>,
}

impl<'c, T: Transport> EnvironmentsApi<'c, T> {
    pub(crate) fn new(client: &'c OctopusApi<T>) -> Self {
        Self { client }
    }

    pub fn all(&self) -> Result<Vec<Environment>, ApiError> {
        self.client.get_json(ALL_ENVIRONMENTS)
    }

    /// Case-insensitive lookup; the returned record carries the server's casing.
    pub fn by_name(&self, name: &str) -> Result<Option<Environment>, ApiError> {
        self.client
            .find_named(ALL_ENVIRONMENTS, name, NameMatch::IgnoreCase)
    }

    /// Exact, case-sensitive lookup.
    pub fn by_name_exact(&self, name: &str) -> Result<Option<Environment>, ApiError> {
        self.client.find_named(ALL_ENVIRONMENTS, name, NameMatch::Exact)
    }

    pub fn by_id(&self, id: &str) -> Result<Environment, ApiError> {
        require(id, "environment id")?;
        self.client.get_json(&format!("environments/{id}"))
    }
}
