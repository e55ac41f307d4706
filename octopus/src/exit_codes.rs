//! Stable exit codes for octopus CLI commands.

/// Command succeeded (deployment dispatched, check passed).
pub const OK: i32 = 0;
/// Invalid configuration or usage, or an unexpected error.
pub const INVALID: i32 = 1;
/// Deployment failed or a check reported an error.
pub const FAILED: i32 = 2;
/// A check passed with a warning.
pub const WARNING: i32 = 3;
