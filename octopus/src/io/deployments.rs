//! Deployment resource client.

use tracing::{info, instrument};

use crate::io::api::{OctopusApi, require};
use crate::io::error::ApiError;
use crate::io::models::CreateDeploymentRequest;
use crate::io::transport::Transport;

/// Dispatches deployments of releases to environments.
pub struct DeploymentsApi<'c, T: Transport> {
    client: &'c OctopusApi<T>,
}

impl<'c, T: Transport> DeploymentsApi<'c, T> {
    pub(crate) fn new(client: &'c OctopusApi<T>) -> Self {
        Self { client }
    }

    /// Deploy `release_id` to `environment_id`; returns the server's response body verbatim.
    #[instrument(skip_all, fields(release_id = %release_id, environment_id = %environment_id))]
    pub fn create(&self, release_id: &str, environment_id: &str) -> Result<String, ApiError> {
        require(release_id, "release id")?;
        require(environment_id, "environment id")?;
        let request = CreateDeploymentRequest {
            release_id,
            environment_id,
        };
        let body = self.client.post_body("deployments", &request)?;
        info!("deployment dispatched");
        Ok(body)
    }
}
