//! Sampling scheduler
//!
//! One [`SamplingScheduler::tick`] is one sampling cycle: read every channel,
//! then either commit the complete cycle to the [`SeriesStore`] or discard it
//! and log a single [`ErrorRecord`].
//!
//! # Decimation
//!
//! Successful cycles are counted from 1. Every successful cycle extends the
//! short-term buffers; the long-term buffers are extended on the first
//! successful cycle and on every multiple of the long-term interval
//! (10 by default). Failed cycles are not counted, so they never shift
//! which cycle lands in the long-term view.
//!
//! [`SeriesStore`]: crate::store::SeriesStore

use super::source::{read_all, SampleSource};
use crate::clock::{Clock, SystemClock};
use crate::store::{ErrorRecord, SharedStore, TimeMark};
use crate::types::{CycleReadings, LiveReadings, SamplingStats};
use std::sync::Arc;
use std::time::Instant;

/// Default number of successful cycles between long-term samples
pub const DEFAULT_LONG_TERM_INTERVAL: u64 = 10;

/// Whether successful cycle number `cycle` (1-indexed) also goes to the
/// long-term buffers
pub const fn is_long_term_cycle(cycle: u64, interval: u64) -> bool {
    cycle == 1 || (interval > 0 && cycle % interval == 0)
}

/// Result of one sampling cycle
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Every channel was read and the cycle was stored
    Committed {
        /// Number of this successful cycle, starting at 1
        cycle: u64,
        /// Whether the long-term buffers were extended too
        long_term: bool,
    },
    /// At least one read failed; nothing was stored
    Discarded(ErrorRecord),
}

impl TickOutcome {
    /// Whether the cycle was stored
    pub fn is_committed(&self) -> bool {
        matches!(self, TickOutcome::Committed { .. })
    }
}

/// Drives sampling cycles against a source and a store
pub struct SamplingScheduler {
    store: SharedStore,
    source: Box<dyn SampleSource>,
    clock: Arc<dyn Clock>,
    cycle_count: u64,
    long_term_interval: u64,
    stats: SamplingStats,
}

impl SamplingScheduler {
    /// Create a scheduler using the system clock
    pub fn new(store: SharedStore, source: Box<dyn SampleSource>) -> Self {
        Self {
            store,
            source,
            clock: Arc::new(SystemClock),
            cycle_count: 0,
            long_term_interval: DEFAULT_LONG_TERM_INTERVAL,
            stats: SamplingStats::default(),
        }
    }

    /// Use a different clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Change how many successful cycles separate long-term samples
    pub fn with_long_term_interval(mut self, interval: u64) -> Self {
        self.long_term_interval = interval.max(1);
        self
    }

    /// Number of successful cycles so far
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Running statistics
    pub fn stats(&self) -> &SamplingStats {
        &self.stats
    }

    /// The store this scheduler writes to
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Description of the underlying source
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Run one sampling cycle
    pub fn tick(&mut self) -> TickOutcome {
        let read_start = Instant::now();
        let results = read_all(self.source.as_mut());
        self.stats.last_read_time_us = read_start.elapsed().as_micros() as u64;

        let now = self.clock.now();

        match CycleReadings::collect(results) {
            Ok(readings) => {
                let cycle = self.cycle_count + 1;
                let long_term = is_long_term_cycle(cycle, self.long_term_interval);

                self.store
                    .append_cycle(&readings, &TimeMark::at(&now), long_term);
                self.cycle_count = cycle;

                self.stats.committed_cycles += 1;
                if long_term {
                    self.stats.long_term_commits += 1;
                }
                self.stats.last_commit = Some(now);

                tracing::debug!(
                    "Committed cycle {} (long-term: {}, read time {} us)",
                    cycle,
                    long_term,
                    self.stats.last_read_time_us
                );
                TickOutcome::Committed { cycle, long_term }
            }
            Err(failures) => {
                for (channel, failure) in &failures {
                    tracing::warn!("Failed to read {}: {}", channel, failure.name());
                }

                // Failures are in channel order; the first one names the cycle
                let kind = failures
                    .first()
                    .map(|(_, failure)| failure.name().to_string())
                    .unwrap_or_default();
                let record = ErrorRecord::sampling_failure(now, kind);
                self.store.push_error(record.clone());
                self.stats.discarded_cycles += 1;

                tracing::warn!(
                    "Discarded sampling cycle after {} failed read(s): {}",
                    failures.len(),
                    record.kind
                );
                TickOutcome::Discarded(record)
            }
        }
    }

    /// Read every channel for the dashboard without touching the store
    pub fn read_live(&mut self) -> LiveReadings {
        let results = read_all(self.source.as_mut());
        LiveReadings::new(self.clock.now(), results)
    }
}
