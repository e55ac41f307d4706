//! Orchestration for `octopus deploy`.
//!
//! Resolves the project and environment, finds the requested release among the
//! project's releases and dispatches the deployment. Every failure is logged as
//! a fatal build log line and ends the run; nothing is retried.

use tracing::{info, instrument, warn};

use crate::core::matching::{case_mismatch, find_release};
use crate::core::types::{Environment, Project};
use crate::io::api::OctopusApi;
use crate::io::build_log::BuildLog;
use crate::io::error::ApiError;
use crate::io::transport::Transport;

const SEPARATOR: &str = "======================";

/// What to deploy where. Inputs are trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    pub project: String,
    pub release_version: String,
    pub environment: String,
}

impl DeployRequest {
    pub fn new(project: &str, release_version: &str, environment: &str) -> Self {
        Self {
            project: project.trim().to_string(),
            release_version: release_version.trim().to_string(),
            environment: environment.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeployOptions {
    /// Require project and environment names to match the server's casing exactly.
    pub strict_names: bool,
}

/// Run one deployment. Returns `true` only when the deployment was dispatched.
#[instrument(skip_all, fields(project = %request.project, version = %request.release_version, environment = %request.environment))]
pub fn run_deployment<T, L>(
    api: &OctopusApi<T>,
    request: &DeployRequest,
    options: &DeployOptions,
    log: &L,
) -> bool
where
    T: Transport,
    L: BuildLog + ?Sized,
{
    log.info("Started Octopus Deploy");
    log.info(SEPARATOR);
    log.info(&format!("Project: {}", request.project));
    log.info(&format!("Version: {}", request.release_version));
    log.info(&format!("Environment: {}", request.environment));
    log.info(SEPARATOR);

    let mut success = true;

    let project = match lookup_project(api, &request.project, options) {
        Ok(project) => project,
        Err(err) => {
            log.fatal(&format!(
                "Retrieving project name '{}' failed with message '{}'",
                request.project, err
            ));
            success = false;
            None
        }
    };
    let environment = match lookup_environment(api, &request.environment, options) {
        Ok(environment) => environment,
        Err(err) => {
            log.fatal(&format!(
                "Retrieving environment name '{}' failed with message '{}'",
                request.environment, err
            ));
            success = false;
            None
        }
    };
    if project.is_none() {
        log.fatal("Project was not found.");
        success = false;
    }
    if environment.is_none() {
        log.fatal("Environment was not found.");
        success = false;
    }
    let (Some(project), Some(environment), true) = (project, environment, success) else {
        warn!("project or environment could not be resolved");
        return false;
    };

    if case_mismatch(&request.project, project.name()) {
        log.warn(&format!(
            "Project name '{}' matched '{}' ignoring case.",
            request.project,
            project.name()
        ));
    }
    if case_mismatch(&request.environment, environment.name()) {
        log.warn(&format!(
            "Environment name '{}' matched '{}' ignoring case.",
            request.environment,
            environment.name()
        ));
    }

    let releases = match api.releases().releases_for_project(project.id()) {
        Ok(releases) => releases,
        Err(err) => {
            log.fatal(&format!(
                "Retrieving releases for project '{}' failed with message '{}'",
                request.project, err
            ));
            log.fatal("Releases was not found.");
            return false;
        }
    };
    if releases.is_empty() {
        log.fatal(&format!("No releases exist for project {}", request.project));
        return false;
    }

    let Some(release) = find_release(&releases, &request.release_version) else {
        log.fatal(&format!(
            "Unable to find release version {} for project {}",
            request.release_version, request.project
        ));
        return false;
    };

    info!(release_id = release.id(), environment_id = environment.id(), "dispatching deployment");
    match api.deployments().create(release.id(), environment.id()) {
        Ok(body) => {
            log.info(&body);
            true
        }
        Err(err) => {
            log.fatal(&format!("Failed to deploy: {err}"));
            false
        }
    }
}

fn lookup_project<T: Transport>(
    api: &OctopusApi<T>,
    name: &str,
    options: &DeployOptions,
) -> Result<Option<Project>, ApiError> {
    if options.strict_names {
        api.projects().by_name_exact(name)
    } else {
        api.projects().by_name(name)
    }
}

fn lookup_environment<T: Transport>(
    api: &OctopusApi<T>,
    name: &str,
    options: &DeployOptions,
) -> Result<Option<Environment>, ApiError> {
    if options.strict_names {
        api.environments().by_name_exact(name)
    } else {
        api.environments().by_name(name)
    }
}
