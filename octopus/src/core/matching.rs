//! Deterministic lookup logic for releases and named records.

use crate::core::types::{Environment, Project, Release};

/// Records that the server identifies by a human-facing name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Project {
    fn name(&self) -> &str {
        Project::name(self)
    }
}

impl Named for Environment {
    fn name(&self) -> &str {
        Environment::name(self)
    }
}

/// How a user-supplied name is compared against server names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    /// Case-insensitive; an exact-case match wins when several records qualify.
    IgnoreCase,
    /// Byte-for-byte equality.
    Exact,
}

/// Find the record matching `name`, returning the server's canonical record.
pub fn find_by_name<'a, R: Named>(records: &'a [R], name: &str, mode: NameMatch) -> Option<&'a R> {
    if let Some(exact) = records.iter().find(|record| record.name() == name) {
        return Some(exact);
    }
    match mode {
        NameMatch::Exact => None,
        NameMatch::IgnoreCase => {
            let wanted = name.to_lowercase();
            records
                .iter()
                .find(|record| record.name().to_lowercase() == wanted)
        }
    }
}

/// Returns true when `input` only matched `canonical` by ignoring case.
pub fn case_mismatch(input: &str, canonical: &str) -> bool {
    input != canonical
}

/// Find the first release whose version equals `version` exactly (case-sensitive, no trimming).
pub fn find_release<'a>(releases: &'a [Release], version: &str) -> Option<&'a Release> {
    releases.iter().find(|release| release.version() == version)
}
