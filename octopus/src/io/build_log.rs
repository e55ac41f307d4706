//! Build log sink for deployment and check output.
//!
//! This is product output read by whoever runs the build, separate from the
//! `tracing` diagnostics configured in [`crate::logging`].

use std::io::Write;

/// Destination for human-readable build log lines.
pub trait BuildLog {
    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    /// Record a failure that ends the current operation.
    fn fatal(&self, message: &str);
}

/// Writes build log lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleLog;

impl ConsoleLog {
    fn emit(&self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        // A closed stdout must not abort a deployment that already went out.
        let _ = writeln!(stdout, "{line}");
    }
}

impl BuildLog for ConsoleLog {
    fn info(&self, message: &str) {
        self.emit(message);
    }

    fn warn(&self, message: &str) {
        self.emit(&format!("WARNING: {message}"));
    }

    fn fatal(&self, message: &str) {
        self.emit(&format!("FATAL: {message}"));
    }
}
