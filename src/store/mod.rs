//! Rolling sensor history
//!
//! The store owns, per [`Channel`], a short-term and a long-term
//! [`SeriesBuffer`] of values, plus one shared [`TimeIndex`] per
//! [`Resolution`], plus the sampling [`ErrorLog`].
//!
//! # Layers
//!
//! - [`SeriesData`] - the plain data with the primitive append operations.
//!   Appending a value to one channel without the matching time entry is
//!   possible here, so it is only ever mutated inside one cycle commit.
//! - [`SeriesStore`] - the shared handle. Every committed cycle is a single
//!   write-locked critical section, so readers never observe a value buffer
//!   extended without its time index.
//!
//! # Example
//!
//! ```
//! use weather_kiosk::store::{SeriesStore, TimeMark};
//! use weather_kiosk::types::{Channel, CycleReadings, Resolution};
//!
//! let store = SeriesStore::new(20);
//! store.append_cycle(&CycleReadings::uniform(1.0), &TimeMark::now(), true);
//!
//! let snapshot = store.snapshot(Channel::Pressure, Resolution::Long);
//! assert_eq!(snapshot.values, vec![1.0]);
//! assert_eq!(snapshot.labels.len(), 1);
//! ```

pub mod buffer;
pub mod error_log;
pub mod time_index;

pub use buffer::{SeriesBuffer, DEFAULT_CAPACITY};
pub use error_log::{sampling_failure_message, ErrorLog, ErrorRecord};
pub use time_index::{TimeIndex, TimeMark, REFERENCE_SCALE};

use crate::types::{Channel, CycleReadings, Resolution};
use chrono::{DateTime, Local};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared handle to the application's single store
pub type SharedStore = Arc<SeriesStore>;

/// Value buffers of every channel at one resolution, with their time axis
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionSeries {
    values: [SeriesBuffer<f64>; Channel::COUNT],
    time: TimeIndex,
}

impl ResolutionSeries {
    fn new(capacity: usize) -> Self {
        Self {
            values: std::array::from_fn(|_| SeriesBuffer::new(capacity)),
            time: TimeIndex::new(capacity),
        }
    }

    /// Value buffer for a channel
    pub fn values(&self, channel: Channel) -> &SeriesBuffer<f64> {
        &self.values[channel.index()]
    }

    /// Shared time axis
    pub fn time(&self) -> &TimeIndex {
        &self.time
    }

    /// Whether every value buffer is as long as the time axis
    pub fn is_synchronized(&self) -> bool {
        let len = self.time.len();
        self.time.labels_len() == len && self.values.iter().all(|b| b.len() == len)
    }
}

/// Point-in-time contents of one channel at one resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Sample values, oldest first
    pub values: Vec<f64>,
    /// Numeric time references, parallel to `values`
    pub time_refs: Vec<f64>,
    /// "HH:MM" labels, parallel to `values`
    pub labels: Vec<String>,
}

impl Snapshot {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no samples
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(time_ref, value)` pairs for plotting
    pub fn plot_points(&self) -> Vec<[f64; 2]> {
        self.time_refs
            .iter()
            .zip(&self.values)
            .map(|(&t, &v)| [t, v])
            .collect()
    }
}

/// Unsynchronized store contents
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    short: ResolutionSeries,
    long: ResolutionSeries,
    errors: ErrorLog,
    capacity: usize,
}

impl SeriesData {
    /// Create empty buffers of the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            short: ResolutionSeries::new(capacity),
            long: ResolutionSeries::new(capacity),
            errors: ErrorLog::new(),
            capacity,
        }
    }

    /// Capacity of every buffer
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Series at a resolution
    pub fn series(&self, resolution: Resolution) -> &ResolutionSeries {
        match resolution {
            Resolution::Short => &self.short,
            Resolution::Long => &self.long,
        }
    }

    fn series_mut(&mut self, resolution: Resolution) -> &mut ResolutionSeries {
        match resolution {
            Resolution::Short => &mut self.short,
            Resolution::Long => &mut self.long,
        }
    }

    /// Append to a channel's short-term buffer
    pub fn append_short(&mut self, channel: Channel, value: f64) {
        self.short.values[channel.index()].push(value);
    }

    /// Append to a channel's long-term buffer
    pub fn append_long(&mut self, channel: Channel, value: f64) {
        self.long.values[channel.index()].push(value);
    }

    /// Append to the shared time index of a resolution
    pub fn append_time(&mut self, resolution: Resolution, reference: f64, label: impl Into<String>) {
        self.series_mut(resolution).time.push(reference, label);
    }

    /// Append an error record
    pub fn record_error(&mut self, record: ErrorRecord) {
        self.errors.push(record);
    }

    /// The error log
    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    /// Copy out one channel at one resolution
    pub fn snapshot(&self, channel: Channel, resolution: Resolution) -> Snapshot {
        let series = self.series(resolution);
        Snapshot {
            values: series.values(channel).to_vec(),
            time_refs: series.time.refs(),
            labels: series.time.labels(),
        }
    }

    /// Panic if any value buffer disagrees in length with its time index
    pub fn assert_synchronized(&self) {
        for resolution in Resolution::ALL {
            let series = self.series(resolution);
            assert_eq!(
                series.time.len(),
                series.time.labels_len(),
                "{resolution} time references and labels diverged"
            );
            for channel in Channel::ALL {
                assert_eq!(
                    series.values(channel).len(),
                    series.time.len(),
                    "{resolution} buffer of {channel} diverged from its time index"
                );
            }
        }
    }
}

/// Thread-safe store shared between the sampling worker and the UI
#[derive(Debug)]
pub struct SeriesStore {
    inner: RwLock<SeriesData>,
}

impl Default for SeriesStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SeriesStore {
    /// Create an empty store with the given buffer capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(SeriesData::new(capacity)),
        }
    }

    /// Create an empty store behind an [`Arc`]
    pub fn shared(capacity: usize) -> SharedStore {
        Arc::new(Self::new(capacity))
    }

    fn read(&self) -> RwLockReadGuard<'_, SeriesData> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SeriesData> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Capacity of every buffer
    pub fn capacity(&self) -> usize {
        self.read().capacity()
    }

    /// Commit one successful cycle
    ///
    /// Extends every short-term buffer and the short time index, and when
    /// `long_term` is set also every long-term buffer and the long time
    /// index, all under one write lock.
    pub fn append_cycle(&self, readings: &CycleReadings, mark: &TimeMark, long_term: bool) {
        let mut data = self.write();

        for (channel, value) in readings.iter() {
            data.append_short(channel, value);
        }
        data.append_time(Resolution::Short, mark.reference, mark.label.as_str());

        if long_term {
            for (channel, value) in readings.iter() {
                data.append_long(channel, value);
            }
            data.append_time(Resolution::Long, mark.reference, mark.label.as_str());
        }

        data.assert_synchronized();
    }

    /// Append an error record stamped with the current time
    pub fn record_error(&self, kind: impl Into<String>, message: impl Into<String>) {
        self.record_error_at(Local::now(), kind, message);
    }

    /// Append an error record stamped with `at`
    pub fn record_error_at(
        &self,
        at: DateTime<Local>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push_error(ErrorRecord::new(at, kind, message));
    }

    /// Append an already-built error record
    pub fn push_error(&self, record: ErrorRecord) {
        self.write().record_error(record);
    }

    /// Consistent copy of one channel at one resolution
    pub fn snapshot(&self, channel: Channel, resolution: Resolution) -> Snapshot {
        self.read().snapshot(channel, resolution)
    }

    /// Most recent value and label of a channel at a resolution
    pub fn latest(&self, channel: Channel, resolution: Resolution) -> Option<(f64, String)> {
        let data = self.read();
        let series = data.series(resolution);
        let value = *series.values(channel).latest()?;
        let (_, label) = series.time().latest()?;
        Some((value, label.to_string()))
    }

    /// Number of samples held at a resolution (identical for every channel)
    pub fn len(&self, resolution: Resolution) -> usize {
        self.read().series(resolution).time().len()
    }

    /// Whether no cycle has been committed yet
    pub fn is_empty(&self) -> bool {
        self.len(Resolution::Short) == 0
    }

    /// Copy of the error log, oldest first
    pub fn errors(&self) -> Vec<ErrorRecord> {
        self.read().errors().records().to_vec()
    }

    /// Number of error records
    pub fn error_count(&self) -> usize {
        self.read().errors().len()
    }

    /// Remove every error record
    pub fn clear_errors(&self) {
        self.write().errors.clear();
    }

    /// Run `f` against the data under a read lock
    pub fn inspect<R>(&self, f: impl FnOnce(&SeriesData) -> R) -> R {
        f(&self.read())
    }
}
