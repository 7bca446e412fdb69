//! Backend module for sensor sampling
//!
//! This module handles all sensor access in a separate thread to keep
//! the UI responsive. It uses crossbeam channels for thread-safe communication
//! with the frontend.
//!
//! # Architecture
//!
//! The backend runs in a separate thread from the UI, communicating via channels:
//!
//! - [`BackendCommand`] - Messages sent from UI to backend (sample now, clear errors, etc.)
//! - [`BackendMessage`] - Messages sent from backend to UI (cycle outcomes, live values)
//! - [`FrontendHandle`] - UI-side handle for sending commands and receiving messages
//! - [`SamplingBackend`] - Main backend entry point that spawns the worker thread
//!
//! Sampled data itself does not travel over the channels: the scheduler writes
//! it into the shared [`SeriesStore`](crate::store::SeriesStore) and the UI
//! reads snapshots from there.
//!
//! # Components
//!
//! - [`SampleSource`] - The sensor interface
//! - [`SimulatedSource`] - Generated values for running without hardware
//! - [`SysfsSource`] - The station hardware through Linux sysfs
//! - [`TimedSource`] - Bounds every read of another source by a timeout
//! - [`SamplingScheduler`] - One sampling cycle per tick
//! - [`BackendWorker`] - Main worker loop driving the scheduler
//!
//! # Example
//!
//! ```no_run
//! use weather_kiosk::backend::{build_source, BackendMessage, SamplingBackend};
//! use weather_kiosk::config::AppConfig;
//! use weather_kiosk::store::SeriesStore;
//!
//! let config = AppConfig::default();
//! let store = SeriesStore::shared(config.sampling.capacity);
//! let source = build_source(&config).unwrap();
//! let (backend, frontend) = SamplingBackend::new(&config, store.clone(), source);
//!
//! let handle = backend.spawn().unwrap();
//!
//! for msg in frontend.drain() {
//!     if let BackendMessage::CycleDiscarded(record) = msg {
//!         eprintln!("{}", record);
//!     }
//! }
//!
//! frontend.shutdown();
//! handle.join().unwrap();
//! ```

pub mod scheduler;
pub mod simulated;
pub mod source;
pub mod sysfs;
pub mod timed;
pub mod worker;

pub use scheduler::{is_long_term_cycle, SamplingScheduler, TickOutcome, DEFAULT_LONG_TERM_INTERVAL};
pub use simulated::{SignalPattern, SimulatedSource};
pub use source::{read_all, read_channel, SampleSource};
pub use sysfs::SysfsSource;
pub use timed::TimedSource;
pub use worker::BackendWorker;

use crate::clock::Clock;
use crate::config::{AppConfig, SourceConfig};
use crate::error::{Result, ResultExt};
use crate::store::{ErrorRecord, SharedStore};
use crate::types::{Channel, LiveReadings, SamplingStats};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Message sent from the UI to the backend
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    /// Run a sampling cycle right away
    SampleNow,
    /// Change the time between sampling cycles
    SetPeriod(Duration),
    /// Empty the error log
    ClearErrors,
    /// Shutdown the backend
    Shutdown,
}

/// Message sent from the backend to the UI
#[derive(Debug, Clone, PartialEq)]
pub enum BackendMessage {
    /// A cycle was stored
    CycleCommitted {
        /// Number of this successful cycle, starting at 1
        cycle: u64,
        /// Whether the long-term buffers were extended too
        long_term: bool,
    },
    /// A cycle was discarded and logged
    CycleDiscarded(ErrorRecord),
    /// Fresh values for the dashboard buttons
    Live(LiveReadings),
    /// Statistics update
    Stats(SamplingStats),
    /// Backend is shutting down
    Shutdown,
}

/// Build the sensor source described by the configuration
///
/// When a read timeout is configured the source is wrapped in a
/// [`TimedSource`].
pub fn build_source(config: &AppConfig) -> Result<Box<dyn SampleSource>> {
    let source: Box<dyn SampleSource> = match &config.source {
        SourceConfig::Simulated {
            failure_rate,
            noise,
        } => {
            let simulated = Channel::ALL
                .into_iter()
                .filter(|channel| *channel != Channel::Rain)
                .fold(SimulatedSource::new(), |source, channel| {
                    source.with_noise(channel, *noise)
                })
                .with_failure_rate(*failure_rate);
            Box::new(simulated)
        }
        SourceConfig::Sysfs(sysfs) => Box::new(SysfsSource::new(sysfs.clone())),
    };

    match config.sampling.read_timeout() {
        Some(timeout) => {
            let timed = TimedSource::new(source, timeout)
                .context("Failed to spawn sensor reader thread")?;
            Ok(Box::new(timed))
        }
        None => Ok(source),
    }
}

/// Frontend handle for backend messages
pub struct FrontendHandle {
    /// Receiver for backend messages
    pub receiver: Receiver<BackendMessage>,
    /// Sender for commands to the backend
    pub command_sender: Sender<BackendCommand>,
}

impl FrontendHandle {
    /// Try to receive a message without blocking
    pub fn try_recv(&self) -> Option<BackendMessage> {
        self.receiver.try_recv().ok()
    }

    /// Receive all pending messages
    pub fn drain(&self) -> Vec<BackendMessage> {
        self.receiver.try_iter().collect()
    }

    /// Send a command to the backend
    pub fn send_command(&self, cmd: BackendCommand) -> bool {
        self.command_sender.send(cmd).is_ok()
    }

    /// Request an immediate sampling cycle
    pub fn sample_now(&self) {
        let _ = self.command_sender.send(BackendCommand::SampleNow);
    }

    /// Change the sampling period
    pub fn set_period(&self, period: Duration) {
        let _ = self.command_sender.send(BackendCommand::SetPeriod(period));
    }

    /// Empty the error log
    pub fn clear_errors(&self) {
        let _ = self.command_sender.send(BackendCommand::ClearErrors);
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        let _ = self.command_sender.send(BackendCommand::Shutdown);
    }
}

/// The sampling backend that runs in a separate thread
pub struct SamplingBackend {
    /// Scheduler handed to the worker
    scheduler: SamplingScheduler,
    /// Time between sampling cycles
    period: Duration,
    /// Time between live value refreshes
    live_refresh: Duration,
    /// Receiver for commands from the UI
    command_receiver: Receiver<BackendCommand>,
    /// Sender for messages to the UI
    message_sender: Sender<BackendMessage>,
    /// Running flag
    running: Arc<AtomicBool>,
}

impl SamplingBackend {
    /// Create a new sampling backend with communication channels
    pub fn new(
        config: &AppConfig,
        store: SharedStore,
        source: Box<dyn SampleSource>,
    ) -> (Self, FrontendHandle) {
        let (cmd_tx, cmd_rx) = bounded(64);
        let (msg_tx, msg_rx) = bounded(256);

        let scheduler = SamplingScheduler::new(store, source)
            .with_long_term_interval(config.sampling.long_term_interval);

        let backend = Self {
            scheduler,
            period: config.sampling.period(),
            live_refresh: config.sampling.live_refresh(),
            command_receiver: cmd_rx,
            message_sender: msg_tx,
            running: Arc::new(AtomicBool::new(true)),
        };

        let frontend = FrontendHandle {
            receiver: msg_rx,
            command_sender: cmd_tx,
        };

        (backend, frontend)
    }

    /// Use a different clock for time stamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.scheduler = self.scheduler.with_clock(clock);
        self
    }

    /// Run the backend loop on the current thread
    pub fn run(self) {
        let mut worker = BackendWorker::new(
            self.scheduler,
            self.period,
            self.live_refresh,
            self.command_receiver,
            self.message_sender,
            self.running,
        );
        worker.run();
    }

    /// Run the backend loop on a new thread
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("sampling".to_string())
            .spawn(move || self.run())
            .context("Failed to spawn sampling thread")
    }

    /// Get a handle to stop the backend
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SeriesStore;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_backend_creation() {
        let config = AppConfig::default();
        let store = SeriesStore::shared(config.sampling.capacity);
        let (backend, frontend) =
            SamplingBackend::new(&config, store, Box::new(SimulatedSource::new()));

        // Backend should be running
        assert!(backend.stop_handle().load(Ordering::SeqCst));

        // Should be able to send commands
        assert!(frontend.send_command(BackendCommand::Shutdown));
    }

    #[test]
    fn test_frontend_commands_arrive_in_order() {
        let config = AppConfig::default();
        let store = SeriesStore::shared(config.sampling.capacity);
        let (backend, frontend) =
            SamplingBackend::new(&config, store, Box::new(SimulatedSource::new()));

        frontend.sample_now();
        frontend.set_period(Duration::from_secs(60));
        frontend.clear_errors();
        frontend.shutdown();

        let received: Vec<_> = backend.command_receiver.try_iter().collect();
        assert_eq!(
            received,
            vec![
                BackendCommand::SampleNow,
                BackendCommand::SetPeriod(Duration::from_secs(60)),
                BackendCommand::ClearErrors,
                BackendCommand::Shutdown,
            ]
        );
    }

    #[test]
    fn test_build_source() {
        let mut config = AppConfig::default();
        config.sampling.read_timeout_ms = 0;
        let source = build_source(&config).unwrap();
        assert!(source.describe().starts_with("simulated"));

        config.sampling.read_timeout_ms = 500;
        let source = build_source(&config).unwrap();
        assert!(source.describe().contains("timeout"));
    }

    #[test]
    fn test_build_source_with_noise() {
        let mut config = AppConfig::default();
        config.sampling.read_timeout_ms = 0;
        config.source = SourceConfig::Simulated {
            failure_rate: 0.0,
            noise: 0.5,
        };
        let mut source = build_source(&config).unwrap();

        let readings = read_all(source.as_mut());
        assert!(readings.iter().all(|r| r.is_ok()));
        // Rain stays a clean 0/1 value
        let rain = readings[Channel::Rain.index()].clone().unwrap();
        assert!(rain == 0.0 || rain == 1.0);
    }
}
