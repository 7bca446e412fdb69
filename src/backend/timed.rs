//! Read timeouts for blocking sources
//!
//! [`TimedSource`] moves a [`SampleSource`] onto its own reader thread and
//! waits for each reply at most `timeout`. A read that takes longer is
//! reported as [`ReadFailure::Timeout`]; its reply, when it finally arrives,
//! is dropped.
//!
//! At most one request is outstanding at a time. While a timed-out read is
//! still running, the next read first waits (within its own timeout) for that
//! stale reply and only then sends its request, so a slow sensor never builds
//! up a backlog behind it.

use super::source::{read_channel, SampleSource};
use crate::error::ReadFailure;
use crate::types::Channel;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

type Reply = (u64, Result<f64, ReadFailure>);

/// A source whose reads give up after a fixed timeout
pub struct TimedSource {
    requests: Sender<(u64, Channel)>,
    replies: Receiver<Reply>,
    timeout: Duration,
    next_seq: u64,
    /// Request whose reply has not been received yet
    in_flight: Option<u64>,
    description: String,
}

impl TimedSource {
    /// Spawn the reader thread for `inner`
    pub fn new(mut inner: Box<dyn SampleSource>, timeout: Duration) -> std::io::Result<Self> {
        let (request_tx, request_rx) = bounded::<(u64, Channel)>(1);
        let (reply_tx, reply_rx) = bounded::<Reply>(1);
        let description = format!("{} (timeout {:?})", inner.describe(), timeout);

        std::thread::Builder::new()
            .name("sensor-reader".to_string())
            .spawn(move || {
                for (seq, channel) in request_rx {
                    let result = read_channel(inner.as_mut(), channel);
                    if reply_tx.send((seq, result)).is_err() {
                        break;
                    }
                }
                tracing::debug!("Sensor reader thread exiting");
            })?;

        Ok(Self {
            requests: request_tx,
            replies: reply_rx,
            timeout,
            next_seq: 0,
            in_flight: None,
            description,
        })
    }

    /// The configured timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait until `deadline` for the reply to request `seq`
    fn wait_for(&mut self, seq: u64, deadline: Instant) -> Result<Reply, RecvTimeoutError> {
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let reply = self.replies.recv_timeout(remaining)?;
            if reply.0 == seq {
                self.in_flight = None;
                return Ok(reply);
            }
            tracing::debug!("Dropping unexpected reply #{}", reply.0);
        }
    }

    fn read(&mut self, channel: Channel) -> Result<f64, ReadFailure> {
        let deadline = Instant::now() + self.timeout;

        if let Some(stale) = self.in_flight {
            match self.wait_for(stale, deadline) {
                Ok(_) => tracing::debug!("Dropping late reply #{}", stale),
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(
                        "Reader still busy with request #{}, {} not read",
                        stale,
                        channel
                    );
                    return Err(ReadFailure::Timeout);
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(ReadFailure::Fault("ReaderDisconnected".to_string()));
                }
            }
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        if self.requests.send((seq, channel)).is_err() {
            return Err(ReadFailure::Fault("ReaderDisconnected".to_string()));
        }
        self.in_flight = Some(seq);

        match self.wait_for(seq, deadline) {
            Ok((_, result)) => result,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!("Reading {} timed out after {:?}", channel, self.timeout);
                Err(ReadFailure::Timeout)
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(ReadFailure::Fault("ReaderDisconnected".to_string()))
            }
        }
    }
}

impl SampleSource for TimedSource {
    fn read_room_temperature(&mut self) -> Result<f64, ReadFailure> {
        self.read(Channel::RoomTemperature)
    }

    fn read_outside_temperature(&mut self) -> Result<f64, ReadFailure> {
        self.read(Channel::OutsideTemperature)
    }

    fn read_humidity(&mut self) -> Result<f64, ReadFailure> {
        self.read(Channel::Humidity)
    }

    fn read_pressure(&mut self) -> Result<f64, ReadFailure> {
        self.read(Channel::Pressure)
    }

    fn read_rain(&mut self) -> Result<bool, ReadFailure> {
        self.read(Channel::Rain).map(|v| v >= 0.5)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}
