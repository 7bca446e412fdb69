//! Shared time axis for one resolution
//!
//! Every channel's value buffer at a given resolution is indexed by the same
//! [`TimeIndex`]: index `i` of any value buffer was sampled at `refs[i]`,
//! labelled `labels[i]`.

use super::buffer::SeriesBuffer;
use chrono::{DateTime, Local, TimeZone};

/// Divisor applied to Unix seconds to obtain the numeric time reference
pub const REFERENCE_SCALE: f64 = 1e10;

/// Numeric reference and "HH:MM" label for one committed cycle
#[derive(Debug, Clone, PartialEq)]
pub struct TimeMark {
    /// Scaled Unix time, monotonically increasing with the wall clock
    pub reference: f64,
    /// Hour and minute label for plot ticks
    pub label: String,
}

impl TimeMark {
    /// Derive the mark for an instant
    pub fn at<Tz: TimeZone>(time: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let seconds = time.timestamp_micros() as f64 / 1_000_000.0;
        Self {
            reference: seconds / REFERENCE_SCALE,
            label: time.format("%H:%M").to_string(),
        }
    }

    /// Mark for the current local time
    pub fn now() -> Self {
        Self::at(&Local::now())
    }
}

/// Parallel bounded sequences of time references and labels
#[derive(Debug, Clone, PartialEq)]
pub struct TimeIndex {
    refs: SeriesBuffer<f64>,
    labels: SeriesBuffer<String>,
}

impl TimeIndex {
    /// Create an empty index
    pub fn new(capacity: usize) -> Self {
        Self {
            refs: SeriesBuffer::new(capacity),
            labels: SeriesBuffer::new(capacity),
        }
    }

    /// Extend both sequences together
    pub fn push(&mut self, reference: f64, label: impl Into<String>) {
        self.refs.push(reference);
        self.labels.push(label.into());
        debug_assert_eq!(self.refs.len(), self.labels.len());
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Length of the labels sequence (always equal to [`TimeIndex::len`])
    pub fn labels_len(&self) -> usize {
        self.labels.len()
    }

    /// Time references, oldest first
    pub fn refs(&self) -> Vec<f64> {
        self.refs.to_vec()
    }

    /// Labels, oldest first
    pub fn labels(&self) -> Vec<String> {
        self.labels.to_vec()
    }

    /// Most recent reference and label
    pub fn latest(&self) -> Option<(f64, &str)> {
        Some((*self.refs.latest()?, self.labels.latest()?.as_str()))
    }
}
