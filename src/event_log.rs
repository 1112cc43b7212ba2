use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Danger,
    Success,
    System,
}

impl Severity {
    pub const ALL: [Self; 5] = [
        Self::Info,
        Self::Warning,
        Self::Danger,
        Self::Success,
        Self::System,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Success => "success",
            Self::System => "system",
        }
    }
}

/// Host-supplied destination for engine log lines. One call per event.
pub trait LogSink {
    fn emit(&mut self, message: &str, severity: Severity);
}

impl<F: FnMut(&str, Severity)> LogSink for F {
    fn emit(&mut self, message: &str, severity: Severity) {
        self(message, severity)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct LogEntry {
    pub time: f64,
    pub message: String,
    pub severity: Severity,
}

/// Bounded in-memory log for the dashboard, mirrored into `tracing`.
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    clock: f64,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            clock: 0.0,
        }
    }

    /// Timestamp applied to subsequent entries (seconds since startup).
    pub fn set_clock(&mut self, seconds: f64) {
        self.clock = seconds;
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|e| e.severity == severity).count()
    }
}

impl LogSink for EventLog {
    fn emit(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Danger | Severity::Warning => warn!(severity = severity.label(), "{message}"),
            Severity::System => debug!(severity = severity.label(), "{message}"),
            Severity::Info | Severity::Success => info!(severity = severity.label(), "{message}"),
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            time: self.clock,
            message: message.to_string(),
            severity,
        });
    }
}
