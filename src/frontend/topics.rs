//! Shared topic data published by the backend and consumed by pages.
//!
//! The app writes to it from `process_backend_messages()`.
//! Pages read from it via `shared.topics`.

use chrono::{DateTime, Local};

use crate::backend::BackendMessage;
use crate::types::{LiveReadings, SamplingStats};

/// Outcome of the most recent sampling cycle, for the status bar
#[derive(Debug, Clone, PartialEq)]
pub enum LastCycle {
    /// Stored as successful cycle number `cycle`
    Committed { cycle: u64, long_term: bool },
    /// Discarded because of the named failure
    Discarded { kind: String, at: DateTime<Local> },
}

/// All data published by the backend and consumed by pages.
#[derive(Debug, Default)]
pub struct Topics {
    /// Latest live values for the dashboard buttons
    pub live: Option<LiveReadings>,

    /// Sampling statistics
    pub stats: SamplingStats,

    /// Outcome of the most recent cycle
    pub last_cycle: Option<LastCycle>,

    /// Whether the backend has announced shutdown
    pub backend_stopped: bool,
}

impl Topics {
    /// Fold one backend message into the topics
    pub fn apply(&mut self, message: BackendMessage) {
        match message {
            BackendMessage::CycleCommitted { cycle, long_term } => {
                self.last_cycle = Some(LastCycle::Committed { cycle, long_term });
            }
            BackendMessage::CycleDiscarded(record) => {
                self.last_cycle = Some(LastCycle::Discarded {
                    kind: record.kind,
                    at: record.timestamp,
                });
            }
            BackendMessage::Live(live) => self.live = Some(live),
            BackendMessage::Stats(stats) => self.stats = stats,
            BackendMessage::Shutdown => {
                tracing::info!("Backend reported shutdown");
                self.backend_stopped = true;
            }
        }
    }
}
