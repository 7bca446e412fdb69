//! Backend Worker Thread Implementation
//!
//! This module contains the loop that owns the [`SamplingScheduler`] and
//! runs on its own thread. It communicates with the UI thread through
//! crossbeam channels.
//!
//! # Responsibilities
//!
//! - **Sampling**: one cycle immediately on start, then one per period
//! - **Live values**: re-reads every channel for the dashboard buttons on a
//!   separate, shorter interval, without touching the store
//! - **Command processing**: sample now, change the period, clear the error
//!   log, shut down
//!
//! All work happens on this one thread, so sampling cycles never overlap.

use super::scheduler::{SamplingScheduler, TickOutcome};
use super::{BackendCommand, BackendMessage};
use crossbeam_channel::{select, tick, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How often the loop wakes up to check the running flag
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The backend worker that runs the sampling loop
pub struct BackendWorker {
    /// Scheduler performing the sampling cycles
    scheduler: SamplingScheduler,
    /// Command receiver from the UI
    command_rx: Receiver<BackendCommand>,
    /// Message sender to the UI
    message_tx: Sender<BackendMessage>,
    /// Running flag
    running: Arc<AtomicBool>,
    /// Time between sampling cycles
    period: Duration,
    /// Time between live value refreshes
    live_refresh: Duration,
    /// Messages dropped because the UI queue was full
    dropped_messages: u64,
}

impl BackendWorker {
    /// Create a new backend worker
    pub fn new(
        scheduler: SamplingScheduler,
        period: Duration,
        live_refresh: Duration,
        command_rx: Receiver<BackendCommand>,
        message_tx: Sender<BackendMessage>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            scheduler,
            command_rx,
            message_tx,
            running,
            period,
            live_refresh,
            dropped_messages: 0,
        }
    }

    /// Run the main worker loop
    pub fn run(&mut self) {
        tracing::info!(
            "Sampling worker started (source: {}, period: {:?})",
            self.scheduler.source_description(),
            self.period
        );

        self.sample();
        self.refresh_live();

        let commands = self.command_rx.clone();
        let mut sample_ticker = tick(self.period);
        let live_ticker = tick(self.live_refresh);

        while self.running.load(Ordering::SeqCst) {
            let mut new_period = None;

            select! {
                recv(commands) -> cmd => match cmd {
                    Ok(cmd) => new_period = self.handle_command(cmd),
                    Err(_) => {
                        tracing::error!("Command channel disconnected, stopping sampling worker");
                        self.running.store(false, Ordering::SeqCst);
                    }
                },
                recv(sample_ticker) -> _ => self.sample(),
                recv(live_ticker) -> _ => self.refresh_live(),
                default(STOP_POLL_INTERVAL) => {}
            }

            if let Some(period) = new_period {
                sample_ticker = tick(period);
            }
        }

        self.try_send_message(BackendMessage::Shutdown);
        tracing::info!(
            "Sampling worker stopped after {} committed cycles ({} messages dropped)",
            self.scheduler.cycle_count(),
            self.dropped_messages
        );
    }

    /// Handle a single command, returning a new sampling period if changed
    fn handle_command(&mut self, cmd: BackendCommand) -> Option<Duration> {
        match cmd {
            BackendCommand::SampleNow => {
                self.sample();
                None
            }
            BackendCommand::SetPeriod(period) => {
                if period.is_zero() {
                    tracing::warn!("Ignoring zero sampling period");
                    return None;
                }
                tracing::info!("Sampling period set to {:?}", period);
                self.period = period;
                Some(period)
            }
            BackendCommand::ClearErrors => {
                let cleared = self.scheduler.store().error_count();
                self.scheduler.store().clear_errors();
                tracing::info!("Cleared {} error record(s)", cleared);
                None
            }
            BackendCommand::Shutdown => {
                self.running.store(false, Ordering::SeqCst);
                None
            }
        }
    }

    /// Run one sampling cycle and report it to the UI
    fn sample(&mut self) {
        let message = match self.scheduler.tick() {
            TickOutcome::Committed { cycle, long_term } => {
                BackendMessage::CycleCommitted { cycle, long_term }
            }
            TickOutcome::Discarded(record) => BackendMessage::CycleDiscarded(record),
        };
        self.try_send_message(message);
        self.try_send_message(BackendMessage::Stats(self.scheduler.stats().clone()));
    }

    /// Re-read every channel for the dashboard
    fn refresh_live(&mut self) {
        let live = self.scheduler.read_live();
        self.try_send_message(BackendMessage::Live(live));
    }

    /// Try to send a message, tracking dropped messages if queue is full
    ///
    /// Uses try_send() to avoid blocking. If the queue is full, the message
    /// is dropped and the dropped_messages counter is incremented.
    fn try_send_message(&mut self, msg: BackendMessage) {
        if self.message_tx.try_send(msg).is_err() {
            self.dropped_messages += 1;
        }
    }
}
