//! Sampling error log
//!
//! An ordered, append-only record of discarded sampling cycles. Nothing is
//! ever evicted; the operator clears the whole log at once.

use chrono::{DateTime, Local, Timelike};

/// One discarded sampling cycle
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    /// When the failure happened, truncated to the minute
    pub timestamp: DateTime<Local>,
    /// Name of the faulting condition
    pub kind: String,
    /// Human-readable description
    pub message: String,
}

impl ErrorRecord {
    /// Create a record, truncating `at` to minute precision
    pub fn new(at: DateTime<Local>, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: truncate_to_minute(at),
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create a record with the standard sampling-failure message
    pub fn sampling_failure(at: DateTime<Local>, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        let message = sampling_failure_message(&at, &kind);
        Self::new(at, kind, message)
    }
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The fixed message recorded when a sampling cycle is discarded
pub fn sampling_failure_message(at: &DateTime<Local>, kind: &str) -> String {
    format!(
        "At {} {} occurred when plotting weather parameters.\n\
         No values were plotted on a graph at the mentioned time",
        at.format("%Y-%m-%d %H:%M"),
        kind
    )
}

fn truncate_to_minute(at: DateTime<Local>) -> DateTime<Local> {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}

/// Unbounded ordered log of [`ErrorRecord`]s
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorLog {
    records: Vec<ErrorRecord>,
}

impl ErrorLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    pub fn push(&mut self, record: ErrorRecord) {
        self.records.push(record);
    }

    /// Records in the order they were appended
    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove every record
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
