//! Per-request access logging.
//!
//! The server reports every answered request through a [`RequestLogger`], so
//! the matching engine itself never writes to the console.

use std::io::Write;

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Sink for access log entries.
pub trait RequestLogger: Send + Sync {
    fn record(&self, status: u16, path: &str, message: &str);
}

/// Writes one colored line per request to stdout.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLogger {
    color: bool,
}

impl ConsoleLogger {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Render a log line: `- [ 200 ] /api/ping, /api/ping`
    pub fn format_line(&self, status: u16, path: &str, message: &str) -> String {
        if !self.color {
            return format!("- [ {status} ] {path}, {message}");
        }
        let status_color = if status == 200 { GREEN } else { RED };
        format!("- {status_color}[ {status} ]{RESET} {YELLOW}{path}{RESET}, {DIM}{message}{RESET}")
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RequestLogger for ConsoleLogger {
    fn record(&self, status: u16, path: &str, message: &str) {
        let line = self.format_line(status, path, message);
        let mut stdout = std::io::stdout().lock();
        // A closed stdout must not fail the request.
        let _ = writeln!(stdout, "{line}");
    }
}
