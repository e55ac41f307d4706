//! Settings checks for `octopus check`.
//!
//! Each check returns a [`Validation`] (ok, warning or error) instead of
//! failing, so callers can show the outcome next to the offending input.

use tracing::debug;

use crate::core::matching::{case_mismatch, find_release};
use crate::core::types::{Project, Validation};
use crate::deploy::DeployRequest;
use crate::io::api::OctopusApi;
use crate::io::transport::Transport;

/// Check that `project` names an existing project, warning on a casing difference.
pub fn check_project<T: Transport>(api: &OctopusApi<T>, project: &str) -> Validation {
    resolve_project(api, project).0
}

/// Look up `project`, returning the check outcome and the record when one was found.
fn resolve_project<T: Transport>(api: &OctopusApi<T>, project: &str) -> (Validation, Option<Project>) {
    let project = project.trim();
    if project.is_empty() {
        return (Validation::error("Please provide a project name."), None);
    }
    match api.projects().by_name(project) {
        Ok(None) => (Validation::error("Project not found."), None),
        Ok(Some(found)) if case_mismatch(project, found.name()) => (
            Validation::warning(format!(
                "Project name case does not match. Did you mean '{}'?",
                found.name()
            )),
            Some(found),
        ),
        Ok(Some(found)) => (Validation::ok(), Some(found)),
        Err(err) => (Validation::error(err.to_string()), None),
    }
}

/// Check that `environment` names an existing environment, warning on a casing difference.
pub fn check_environment<T: Transport>(api: &OctopusApi<T>, environment: &str) -> Validation {
    let environment = environment.trim();
    if environment.is_empty() {
        return Validation::error("Please provide an environment name.");
    }
    match api.environments().by_name(environment) {
        Ok(None) => Validation::error("Environment not found."),
        Ok(Some(found)) if case_mismatch(environment, found.name()) => {
            Validation::warning(format!(
                "Environment name case does not match. Did you mean '{}'?",
                found.name()
            ))
        }
        Ok(Some(_)) => Validation::ok(),
        Err(err) => Validation::error(err.to_string()),
    }
}

pub fn check_release_version(release_version: &str) -> Validation {
    if release_version.trim().is_empty() {
        return Validation::error("Please provide a release version.");
    }
    Validation::ok()
}

/// Check a full deployment request, including that the release version exists.
///
/// Returns the most severe individual result; the first one wins on a tie.
pub fn check_deployment<T: Transport>(api: &OctopusApi<T>, request: &DeployRequest) -> Validation {
    let (project_result, project) = resolve_project(api, &request.project);
    let version_result = check_release_version(&request.release_version);
    let version_given = version_result.is_ok();
    let mut results = vec![
        project_result,
        check_environment(api, &request.environment),
        version_result,
    ];
    if let (Some(project), true) = (project, version_given) {
        results.push(check_release_exists(api, &project, &request.release_version));
    }

    let worst = results
        .into_iter()
        .reduce(|worst, next| if next.severity > worst.severity { next } else { worst })
        .unwrap_or_else(Validation::ok);
    debug!(severity = ?worst.severity, "deployment check finished");
    if worst.is_ok() {
        return Validation::ok_with("Deployment settings are valid.");
    }
    worst
}

fn check_release_exists<T: Transport>(
    api: &OctopusApi<T>,
    project: &Project,
    release_version: &str,
) -> Validation {
    match api.releases().releases_for_project(project.id()) {
        Ok(releases) if find_release(&releases, release_version).is_some() => Validation::ok(),
        Ok(_) => Validation::error(format!(
            "Release version {} not found for project {}.",
            release_version,
            project.name()
        )),
        Err(err) => Validation::error(err.to_string()),
    }
}
