//! Console logger implementation

use super::traits::{LogLevel, Logger};

/// A logger that writes prefixed lines to stdout/stderr
///
/// Info goes to stdout, everything else to stderr. Messages below
/// `min_level` are dropped.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    /// Create a console logger with the default `[authdeck]` prefix
    pub fn new() -> Self {
        Self::with_prefix("[authdeck]")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            min_level: LogLevel::Debug,
        }
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    fn format(&self, level: LogLevel, message: &str) -> Option<String> {
        if level < self.min_level {
            return None;
        }
        Some(format!("{} {}: {}", self.prefix, level, message))
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        if let Some(line) = self.format(LogLevel::Debug, message) {
            eprintln!("{}", line);
        }
    }

    fn info(&self, message: &str) {
        if let Some(line) = self.format(LogLevel::Info, message) {
            println!("{}", line);
        }
    }

    fn warn(&self, message: &str) {
        if let Some(line) = self.format(LogLevel::Warn, message) {
            eprintln!("{}", line);
        }
    }

    fn error(&self, message: &str) {
        if let Some(line) = self.format(LogLevel::Error, message) {
            eprintln!("{}", line);
        }
    }
}
