//! Release resource client.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use crate::core::types::{Release, SelectedPackage};
use crate::io::api::{OctopusApi, require};
use crate::io::error::ApiError;
use crate::io::models::{CreateReleaseRequest, Linked, Page, ReleaseResource};
use crate::io::transport::Transport;

/// Operations on the releases of a project.
pub struct ReleasesApi<'c, T: Transport> {
    client: &'c OctopusApi<T>,
}

impl<'c, T: Transport> ReleasesApi<'c, T> {
    pub(crate) fn new(client: &'c OctopusApi<T>) -> Self {
        Self { client }
    }

    /// All releases of a project, in server order (latest first).
    ///
    /// Release ids are unique server-side; a repeated id is dropped so the
    /// result never holds two records for one release.
    #[instrument(skip_all, fields(project_id = %project_id))]
    pub fn releases_for_project(&self, project_id: &str) -> Result<Vec<Release>, ApiError> {
        require(project_id, "project id")?;
        let path = format!("projects/{project_id}/releases");
        let page: Page<ReleaseResource> = self.client.get_json(&path)?;

        let mut seen = HashSet::new();
        let mut releases = Vec::with_capacity(page.items.len());
        for item in page.items {
            if !seen.insert(item.id.clone()) {
                warn!(release_id = %item.id, "duplicate release id in response, skipping");
                continue;
            }
            releases.push(item.into_release(project_id));
        }
        debug!(count = releases.len(), "releases loaded");
        Ok(releases)
    }

    /// A single release looked up by its version string.
    pub fn release_for_version(&self, project_id: &str, version: &str) -> Result<Release, ApiError> {
        require(project_id, "project id")?;
        require(version, "release version")?;
        let path = format!("projects/{project_id}/releases/{version}");
        let resource: ReleaseResource = self.client.get_json(&path)?;
        Ok(resource.into_release(project_id))
    }

    /// Host-relative portal URL of a specific release version.
    pub fn portal_url_for_release(&self, project_id: &str, version: &str) -> Result<String, ApiError> {
        require(project_id, "project id")?;
        require(version, "release version")?;
        let path = format!("projects/{project_id}/releases/{version}");
        let linked: Linked = self.client.get_json(&path)?;
        Ok(linked.links.web)
    }

    /// Host-relative portal URL of the first release the server lists.
    ///
    /// Returns `None` when the project has no releases. The server lists
    /// releases latest first; that order is trusted, not checked.
    pub fn portal_url_for_latest_release(&self, project_id: &str) -> Result<Option<String>, ApiError> {
        require(project_id, "project id")?;
        let path = format!("projects/{project_id}/releases");
        let page: Page<Linked> = self.client.get_json(&path)?;
        Ok(page.items.into_iter().next().map(|item| item.links.web))
    }

    /// Create a release of `version`, pinning the given step packages.
    #[instrument(skip_all, fields(project_id = %project_id, version = %version))]
    pub fn create_release(
        &self,
        project_id: &str,
        version: &str,
        release_notes: Option<&str>,
        packages: &[SelectedPackage],
    ) -> Result<Release, ApiError> {
        require(project_id, "project id")?;
        require(version, "release version")?;
        let request = CreateReleaseRequest {
            project_id,
            version,
            release_notes,
            selected_packages: packages,
        };
        let resource: ReleaseResource = self.client.post_json("releases", &request)?;
        debug!(release_id = %resource.id, "release created");
        Ok(resource.into_release(project_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedTransport, TEST_HOST, release_json, releases_page};

    fn api(transport: ScriptedTransport) -> OctopusApi<ScriptedTransport> {
        OctopusApi::new(transport, TEST_HOST)
    }

    #[test]
    fn releases_for_project_parses_every_item() {
        let body = releases_page(&[
            release_json("Releases-3", "1.2.0"),
            release_json("Releases-2", "1.1.0"),
            release_json("Releases-1", "1.0.0"),
        ]);
        let api = api(ScriptedTransport::new().on_get("projects/Projects-1/releases", 200, &body));

        let releases = api.releases().releases_for_project("Projects-1").expect("releases");
        assert_eq!(releases.len(), 3);
        assert_eq!(
            releases[0],
            Release::new(
                "Releases-3",
                "Projects-1",
                "Channels-1",
                Some("Notes for 1.2.0".to_string()),
                "1.2.0"
            )
        );
        let versions: Vec<&str> = releases.iter().map(Release::version).collect();
        assert_eq!(versions, vec!["1.2.0", "1.1.0", "1.0.0"]);
    }

    #[test]
    fn releases_for_project_drops_repeated_ids() {
        let body = releases_page(&[
            release_json("Releases-1", "1.0.0"),
            release_json("Releases-1", "1.0.0"),
        ]);
        let api = api(ScriptedTransport::new().on_get("projects/Projects-1/releases", 200, &body));
        let releases = api.releases().releases_for_project("Projects-1").expect("releases");
        assert_eq!(releases.len(), 1);
    }

    #[test]
    fn releases_for_project_reports_status_and_body() {
        let api = api(ScriptedTransport::new().on_get(
            "projects/Projects-1/releases",
            500,
            "server exploded",
        ));
        let err = api.releases().releases_for_project("Projects-1").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("server exploded"));
    }

    #[test]
    fn releases_for_project_rejects_missing_items() {
        let api = api(ScriptedTransport::new().on_get(
            "projects/Projects-1/releases",
            200,
            r#"{"TotalResults":0}"#,
        ));
        let err = api.releases().releases_for_project("Projects-1").unwrap_err();
        assert!(matches!(err, ApiError::Malformed { .. }));
    }

    #[test]
    fn releases_for_project_rejects_blank_id_without_request() {
        let transport = ScriptedTransport::new();
        let api = api(transport);
        let err = api.releases().releases_for_project(" ").unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert!(api.transport().requests().is_empty());
    }

    #[test]
    fn portal_url_for_release_reads_web_link() {
        let api = api(ScriptedTransport::new().on_get(
            "projects/Projects-1/releases/2.3.1",
            200,
            &release_json("Releases-9", "2.3.1"),
        ));
        let url = api
            .releases()
            .portal_url_for_release("Projects-1", "2.3.1")
            .expect("url");
        assert_eq!(url, "/app#/releases/Releases-9");
    }

    #[test]
    fn portal_url_for_release_fails_on_missing_version() {
        let api = api(ScriptedTransport::new().on_get(
            "projects/Projects-1/releases/9.9.9",
            404,
            "not found",
        ));
        let err = api
            .releases()
            .portal_url_for_release("Projects-1", "9.9.9")
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { code: 404, .. }));
    }

    #[test]
    fn latest_release_url_is_first_item() {
        let body = releases_page(&[
            release_json("Releases-5", "2.0.0"),
            release_json("Releases-4", "1.9.0"),
        ]);
        let api = api(ScriptedTransport::new().on_get("projects/Projects-1/releases", 200, &body));
        let url = api
            .releases()
            .portal_url_for_latest_release("Projects-1")
            .expect("url");
        assert_eq!(url.as_deref(), Some("/app#/releases/Releases-5"));
    }

    #[test]
    fn latest_release_url_is_none_for_empty_items() {
        let api = api(ScriptedTransport::new().on_get(
            "projects/Projects-1/releases",
            200,
            &releases_page(&[]),
        ));
        let url = api
            .releases()
            .portal_url_for_latest_release("Projects-1")
            .expect("url");
        assert_eq!(url, None);
    }

    #[test]
    fn release_for_version_returns_record() {
        let api = api(ScriptedTransport::new().on_get(
            "projects/Projects-1/releases/1.0.0",
            200,
            &release_json("Releases-1", "1.0.0"),
        ));
        let release = api
            .releases()
            .release_for_version("Projects-1", "1.0.0")
            .expect("release");
        assert_eq!(release.id(), "Releases-1");
        assert_eq!(release.channel_id(), "Channels-1");
    }

    #[test]
    fn create_release_posts_selected_packages() {
        let api = api(ScriptedTransport::new().on_post(
            "releases",
            201,
            &release_json("Releases-10", "3.0.0"),
        ));
        let packages = vec![SelectedPackage::new("Deploy web", "3.0.0-pkg")];
        let release = api
            .releases()
            .create_release("Projects-1", "3.0.0", Some("Big one"), &packages)
            .expect("create");
        assert_eq!(release.id(), "Releases-10");

        let posts = api.transport().posts();
        assert_eq!(posts.len(), 1);
        let sent: serde_json::Value =
            serde_json::from_str(posts[0].body.as_deref().expect("body")).expect("json");
        assert_eq!(sent["ProjectId"], "Projects-1");
        assert_eq!(sent["ReleaseNotes"], "Big one");
        assert_eq!(sent["SelectedPackages"][0]["StepName"], "Deploy web");
        assert_eq!(sent["SelectedPackages"][0]["Version"], "3.0.0-pkg");
    }

    #[test]
    fn create_release_rejects_unexpected_reply() {
        let api = api(ScriptedTransport::new().on_post("releases", 201, "{}"));
        let err = api
            .releases()
            .create_release("Projects-1", "3.0.0", None, &[])
            .unwrap_err();
        assert!(matches!(err, ApiError::Malformed { ref path, .. } if path == "releases"));
    }
}
