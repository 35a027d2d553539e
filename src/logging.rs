/// Injected logging capability
///
/// The client reports configuration problems and batching progress through an
/// `AmpLogger`. The default forwards into `tracing`, so nothing is emitted
/// unless the host application installs a subscriber.
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

/// Logging interface used by the client
pub trait AmpLogger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    /// Unrecoverable for the capability in question, not for the process
    fn fatal(&self, message: &str);
}

/// Forwards to `tracing` events under the `amp_url_api` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl AmpLogger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "amp_url_api", "{}", message);
    }

    fn warn(&self, message: &str) {
        warn!(target: "amp_url_api", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "amp_url_api", "{}", message);
    }

    fn fatal(&self, message: &str) {
        error!(target: "amp_url_api", fatal = true, "{}", message);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl AmpLogger for NoopLogger {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn fatal(&self, _message: &str) {}
}

/// Log level of a captured record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Fatal,
}

/// Captures log records in memory
///
/// Useful for asserting on warnings emitted by the client.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    records: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages logged at the given level
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: LogLevel, message: &str) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push((level, message.to_string()));
    }
}

impl AmpLogger for MemoryLogger {
    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }

    fn fatal(&self, message: &str) {
        self.push(LogLevel::Fatal, message);
    }
}
