//! I/O for the Octopus client: configuration, HTTP transport and resource clients.

pub mod api;
pub mod build_log;
pub mod config;
pub mod deployments;
pub mod environments;
pub mod error;
pub mod models;
pub mod projects;
pub mod releases;
pub mod transport;
