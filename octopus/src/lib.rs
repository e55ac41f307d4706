//! Release-resolution and deployment-dispatch client for Octopus Deploy.
//!
//! A build job hands over a project name, a release version and an environment
//! name; the client resolves them to server identifiers and triggers the
//! deployment. The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (records, name matching, release selection).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (configuration file, HTTP transport,
//!   resource clients). The transport sits behind a trait so tests never open sockets.
//!
//! Orchestration modules ([`deploy`], [`validate`]) compose the resource clients
//! to implement CLI commands.

pub mod core;
pub mod deploy;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;
