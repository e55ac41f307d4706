//! Domain records shared by the API clients, orchestrator and checks.
//!
//! Records are built once from a server response and never mutated: fields are
//! private and exposed through accessors only.

use serde::{Deserialize, Serialize};

/// A release of a project, identified by `id` and looked up by `version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    id: String,
    project_id: String,
    channel_id: String,
    release_notes: Option<String>,
    version: String,
}

impl Release {
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        channel_id: impl Into<String>,
        release_notes: Option<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            channel_id: channel_id.into(),
            release_notes,
            version: version.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Release notes as stored on the server; `None` when the server sent `null`.
    pub fn release_notes(&self) -> Option<&str> {
        self.release_notes.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// A project as held by the server (canonical name casing).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    id: String,
    name: String,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A deployment environment as held by the server (canonical name casing).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Environment {
    id: String,
    name: String,
}

impl Environment {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Package version pinned for one deployment step when creating a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SelectedPackage {
    step_name: String,
    version: String,
}

impl SelectedPackage {
    pub fn new(step_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            version: version.into(),
        }
    }

    pub fn step_name(&self) -> &str {
        &self.step_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Three-level outcome of a settings check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

/// Result of a settings check: a severity plus an optional human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub severity: Severity,
    pub message: Option<String>,
}

impl Validation {
    pub fn ok() -> Self {
        Self {
            severity: Severity::Ok,
            message: None,
        }
    }

    pub fn ok_with(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Ok,
            message: Some(message.into()),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.severity == Severity::Ok
    }
}
