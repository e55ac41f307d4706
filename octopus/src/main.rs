//! Octopus Deploy client for build jobs.
//!
//! Reads server settings from `.octopus/config.toml` (or `OCTOPUS_HOST` /
//! `OCTOPUS_API_KEY`), then deploys releases, checks deployment settings and
//! looks up release information.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use octopus::core::types::{Project, SelectedPackage, Severity, Validation};
use octopus::deploy::{DeployOptions, DeployRequest, run_deployment};
use octopus::exit_codes;
use octopus::io::api::OctopusApi;
use octopus::io::build_log::ConsoleLog;
use octopus::io::config::{DEFAULT_CONFIG_PATH, OctopusConfig, resolve_config, write_config};
use octopus::io::transport::HttpTransport;
use octopus::logging;
use octopus::validate::{check_deployment, check_environment, check_project, check_release_version};

#[derive(Parser)]
#[command(
    name = "octopus",
    version,
    about = "Trigger Octopus Deploy deployments from a build job"
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the server host and API key to the config file.
    Init {
        #[arg(long)]
        host: String,
        #[arg(long)]
        api_key: String,
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
        /// Overwrite an existing config file.
        #[arg(short, long)]
        force: bool,
    },
    /// Deploy an existing release of a project to an environment.
    Deploy {
        #[command(flatten)]
        target: TargetArgs,
        /// Fail instead of warning when a name differs from the server's casing.
        #[arg(long)]
        strict_names: bool,
    },
    /// Check deployment settings without deploying.
    Check {
        #[command(subcommand)]
        check: CheckCommand,
    },
    /// List the releases of a project (latest first).
    Releases {
        #[arg(long)]
        project: String,
    },
    /// Print the portal URL of a release (the latest one when no version is given).
    PortalUrl {
        #[arg(long)]
        project: String,
        #[arg(long)]
        release_version: Option<String>,
    },
    /// Create a release of a project.
    CreateRelease {
        #[arg(long)]
        project: String,
        #[arg(long)]
        release_version: String,
        #[arg(long)]
        release_notes: Option<String>,
        /// Package version for a step, as `STEP=VERSION`. Repeatable.
        #[arg(long = "package", value_parser = parse_package)]
        packages: Vec<SelectedPackage>,
    },
}

#[derive(Args, Debug, Clone)]
struct TargetArgs {
    #[arg(long)]
    project: String,
    #[arg(long)]
    release_version: String,
    #[arg(long)]
    environment: String,
}

impl TargetArgs {
    fn request(&self) -> DeployRequest {
        DeployRequest::new(&self.project, &self.release_version, &self.environment)
    }
}

#[derive(Subcommand)]
enum CheckCommand {
    /// Check that a project exists.
    Project { name: String },
    /// Check that an environment exists.
    Environment { name: String },
    /// Check that a release version was provided.
    Release { version: String },
    /// Check a full deployment, including that the release exists.
    Deployment(TargetArgs),
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let Cli { config, command } = Cli::parse();
    match command {
        Command::Init {
            host,
            api_key,
            timeout_secs,
            force,
        } => cmd_init(&config, host, api_key, timeout_secs, force),
        Command::Deploy {
            target,
            strict_names,
        } => {
            let api = connect(&config)?;
            let options = DeployOptions { strict_names };
            let deployed = run_deployment(&api, &target.request(), &options, &ConsoleLog);
            Ok(if deployed {
                exit_codes::OK
            } else {
                exit_codes::FAILED
            })
        }
        Command::Check { check } => cmd_check(&config, check),
        Command::Releases { project } => cmd_releases(&connect(&config)?, &project),
        Command::PortalUrl {
            project,
            release_version,
        } => cmd_portal_url(&connect(&config)?, &project, release_version.as_deref()),
        Command::CreateRelease {
            project,
            release_version,
            release_notes,
            packages,
        } => cmd_create_release(
            &connect(&config)?,
            &project,
            &release_version,
            release_notes.as_deref(),
            &packages,
        ),
    }
}

fn connect(config_path: &Path) -> Result<OctopusApi<HttpTransport>> {
    let cfg = resolve_config(config_path)?;
    debug!(host = %cfg.host, "connecting");
    Ok(OctopusApi::connect(&cfg))
}

fn cmd_check(config_path: &Path, check: CheckCommand) -> Result<i32> {
    let result = match check {
        CheckCommand::Release { version } => check_release_version(&version),
        CheckCommand::Project { name } => check_project(&connect(config_path)?, &name),
        CheckCommand::Environment { name } => check_environment(&connect(config_path)?, &name),
        CheckCommand::Deployment(target) => {
            check_deployment(&connect(config_path)?, &target.request())
        }
    };
    Ok(report(&result))
}

fn cmd_init(
    path: &Path,
    host: String,
    api_key: String,
    timeout_secs: u64,
    force: bool,
) -> Result<i32> {
    if !force && path.exists() {
        bail!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    let cfg = OctopusConfig {
        host: host.trim().trim_end_matches('/').to_string(),
        api_key: api_key.trim().to_string(),
        timeout_secs,
    };
    write_config(path, &cfg).with_context(|| format!("write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(exit_codes::OK)
}

fn cmd_releases(api: &OctopusApi<HttpTransport>, project: &str) -> Result<i32> {
    let Some(project) = find_project(api, project)? else {
        return Ok(exit_codes::FAILED);
    };
    let releases = api
        .releases()
        .releases_for_project(project.id())
        .with_context(|| format!("list releases of {}", project.name()))?;
    for release in &releases {
        println!(
            "{}\t{}\t{}",
            release.id(),
            release.version(),
            release.channel_id()
        );
    }
    Ok(exit_codes::OK)
}

fn cmd_portal_url(
    api: &OctopusApi<HttpTransport>,
    project: &str,
    release_version: Option<&str>,
) -> Result<i32> {
    let Some(project) = find_project(api, project)? else {
        return Ok(exit_codes::FAILED);
    };
    let link = match release_version {
        Some(version) => api
            .releases()
            .portal_url_for_release(project.id(), version.trim())
            .with_context(|| format!("look up release {} of {}", version, project.name()))?,
        None => match api
            .releases()
            .portal_url_for_latest_release(project.id())
            .with_context(|| format!("look up latest release of {}", project.name()))?
        {
            Some(link) => link,
            None => {
                eprintln!("project {} has no releases", project.name());
                return Ok(exit_codes::FAILED);
            }
        },
    };
    println!("{}", api.portal_link(&link));
    Ok(exit_codes::OK)
}

fn cmd_create_release(
    api: &OctopusApi<HttpTransport>,
    project: &str,
    release_version: &str,
    release_notes: Option<&str>,
    packages: &[SelectedPackage],
) -> Result<i32> {
    let Some(project) = find_project(api, project)? else {
        return Ok(exit_codes::FAILED);
    };
    let release = api
        .releases()
        .create_release(project.id(), release_version.trim(), release_notes, packages)
        .with_context(|| format!("create release {} of {}", release_version, project.name()))?;
    println!(
        "created release {} ({}) of {}",
        release.version(),
        release.id(),
        project.name()
    );
    Ok(exit_codes::OK)
}

/// Resolve a project by name, printing a message when it does not exist.
fn find_project(api: &OctopusApi<HttpTransport>, name: &str) -> Result<Option<Project>> {
    let project = api
        .projects()
        .by_name(name.trim())
        .with_context(|| format!("look up project '{}'", name.trim()))?;
    if project.is_none() {
        eprintln!("project '{}' not found", name.trim());
    }
    Ok(project)
}

/// Print a check result and map it to an exit code.
fn report(result: &Validation) -> i32 {
    let message = result.message.as_deref();
    match result.severity {
        Severity::Ok => {
            println!("ok{}", message.map(|m| format!(": {m}")).unwrap_or_default());
            exit_codes::OK
        }
        Severity::Warning => {
            println!("warning: {}", message.unwrap_or_default());
            exit_codes::WARNING
        }
        Severity::Error => {
            println!("error: {}", message.unwrap_or_default());
            exit_codes::FAILED
        }
    }
}

/// Parse `STEP=VERSION` into a [`SelectedPackage`].
fn parse_package(raw: &str) -> Result<SelectedPackage, String> {
    let (step, version) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected STEP=VERSION, got '{raw}'"))?;
    let (step, version) = (step.trim(), version.trim());
    if step.is_empty() || version.is_empty() {
        return Err(format!("expected STEP=VERSION, got '{raw}'"));
    }
    Ok(SelectedPackage::new(step, version))
}
