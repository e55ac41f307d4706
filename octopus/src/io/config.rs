//! Server connection settings stored under `.octopus/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".octopus/config.toml";

/// Environment variable overriding [`OctopusConfig::host`].
pub const HOST_ENV: &str = "OCTOPUS_HOST";

/// Environment variable overriding [`OctopusConfig::api_key`].
pub const API_KEY_ENV: &str = "OCTOPUS_API_KEY";

/// Connection settings for the release-management server (TOML).
///
/// Loaded once at startup and handed to the API client by value; nothing
/// reads it lazily afterwards.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OctopusConfig {
    /// Base URL of the server, e.g. `https://octopus.example.com`.
    pub host: String,

    /// API key sent in the `X-Octopus-ApiKey` header.
    pub api_key: String,

    /// Global per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OctopusConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for OctopusConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OctopusConfig")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl OctopusConfig {
    pub fn validate(&self) -> Result<()> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(anyhow!(
                "host must be set (config file or {HOST_ENV})"
            ));
        }
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(anyhow!("host must start with http:// or https://"));
        }
        if self.api_key.trim().is_empty() {
            return Err(anyhow!(
                "api_key must be set (config file or {API_KEY_ENV})"
            ));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be > 0"));
        }
        Ok(())
    }

    /// Apply `OCTOPUS_HOST` / `OCTOPUS_API_KEY` overrides using `lookup` to read variables.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup(HOST_ENV).filter(|value| !value.trim().is_empty()) {
            debug!(var = HOST_ENV, "host overridden from environment");
            self.host = host.trim().to_string();
        }
        if let Some(key) = lookup(API_KEY_ENV).filter(|value| !value.trim().is_empty()) {
            debug!(var = API_KEY_ENV, "api key overridden from environment");
            self.api_key = key.trim().to_string();
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `OctopusConfig::default()` (not yet valid).
pub fn load_config(path: &Path) -> Result<OctopusConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config file missing, using defaults");
        return Ok(OctopusConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: OctopusConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

/// Load config from `path`, apply process environment overrides, then validate.
pub fn resolve_config(path: &Path) -> Result<OctopusConfig> {
    let mut cfg = load_config(path)?;
    cfg.apply_env_overrides(|name| std::env::var(name).ok());
    cfg.validate()
        .with_context(|| format!("invalid configuration ({})", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &OctopusConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> OctopusConfig {
        OctopusConfig {
            host: "https://octopus.example.com".to_string(),
            api_key: "API-TEST".to_string(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, OctopusConfig::default());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(".octopus").join("config.toml");
        let cfg = valid();
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_keeps_default_timeout() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "host = \"http://localhost:8080\"\napi_key = \"API-1\"\n")
            .expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.timeout_secs, 30);
        cfg.validate().expect("valid");
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut cfg = valid();
        cfg.apply_env_overrides(|name| match name {
            HOST_ENV => Some("http://other:8080".to_string()),
            API_KEY_ENV => Some("  API-ENV ".to_string()),
            _ => None,
        });
        assert_eq!(cfg.host, "http://other:8080");
        assert_eq!(cfg.api_key, "API-ENV");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut cfg = valid();
        cfg.apply_env_overrides(|_| Some("   ".to_string()));
        assert_eq!(cfg, valid());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = valid();
        cfg.host = "octopus.example.com".to_string();
        assert!(cfg.validate().unwrap_err().to_string().contains("http://"));

        let mut cfg = valid();
        cfg.api_key = String::new();
        assert!(cfg.validate().unwrap_err().to_string().contains("api_key"));

        let mut cfg = valid();
        cfg.timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("API-TEST"));
        assert!(rendered.contains("<redacted>"));
    }
}
