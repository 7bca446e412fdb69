//! Simulated sensors
//!
//! This module provides a [`SampleSource`] that generates plausible weather
//! data without hardware, so the dashboard can run on a desktop and tests can
//! script failures.
//!
//! # Features
//!
//! - **Pattern-based data generation**: each channel follows a [`SignalPattern`]
//! - **Noise simulation**: optional noise on top of the pattern
//! - **Failure injection**: queue specific failures per channel, or fail at
//!   random with a configurable rate
//! - **Read delay**: simulate slow hardware
//!
//! # Example
//!
//! ```
//! use weather_kiosk::backend::simulated::{SignalPattern, SimulatedSource};
//! use weather_kiosk::backend::SampleSource;
//! use weather_kiosk::error::ReadFailure;
//! use weather_kiosk::types::Channel;
//!
//! let mut source = SimulatedSource::new()
//!     .with_pattern(Channel::Pressure, SignalPattern::Constant(1013.0));
//!
//! source.fail_next(Channel::Humidity, ReadFailure::SensorNotReady);
//! assert_eq!(source.read_humidity(), Err(ReadFailure::SensorNotReady));
//! assert_eq!(source.read_pressure(), Ok(1013.0));
//! ```

use super::source::SampleSource;
use crate::error::ReadFailure;
use crate::types::Channel;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Pattern for generating simulated data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalPattern {
    /// Constant value
    Constant(f64),
    /// Sine wave around `offset`
    Sine {
        period_secs: f64,
        amplitude: f64,
        offset: f64,
    },
    /// Counter that increments on every read and wraps
    Counter { step: f64, min: f64, max: f64 },
    /// Random values within range
    Random { min: f64, max: f64 },
    /// Alternates between `low` and `high` every half period
    Square { period_secs: f64, low: f64, high: f64 },
}

impl SignalPattern {
    /// Default pattern for a channel
    pub fn default_for(channel: Channel) -> Self {
        match channel {
            Channel::RoomTemperature => SignalPattern::Sine {
                period_secs: 3600.0,
                amplitude: 1.5,
                offset: 21.5,
            },
            Channel::OutsideTemperature => SignalPattern::Sine {
                period_secs: 7200.0,
                amplitude: 4.0,
                offset: 9.0,
            },
            Channel::Humidity => SignalPattern::Sine {
                period_secs: 5400.0,
                amplitude: 6.0,
                offset: 45.0,
            },
            Channel::Pressure => SignalPattern::Random {
                min: 1008.0,
                max: 1016.0,
            },
            Channel::Rain => SignalPattern::Square {
                period_secs: 1800.0,
                low: 0.0,
                high: 1.0,
            },
        }
    }
}

/// Generator state for one channel
#[derive(Debug, Clone)]
pub struct SimulatedChannel {
    /// Data generation pattern
    pub pattern: SignalPattern,
    /// Noise amplitude to add (0.0 = no noise)
    pub noise_amplitude: f64,
    counter_value: f64,
    pending_failures: VecDeque<ReadFailure>,
}

impl SimulatedChannel {
    /// Create a generator following `pattern`
    pub fn new(pattern: SignalPattern) -> Self {
        let counter_value = match pattern {
            SignalPattern::Counter { min, step, .. } => min - step,
            _ => 0.0,
        };
        Self {
            pattern,
            noise_amplitude: 0.0,
            counter_value,
            pending_failures: VecDeque::new(),
        }
    }

    /// Generate a value based on the pattern and elapsed time
    pub fn generate_value(&mut self, elapsed_secs: f64) -> f64 {
        let base_value = match self.pattern {
            SignalPattern::Constant(v) => v,
            SignalPattern::Sine {
                period_secs,
                amplitude,
                offset,
            } => {
                offset + amplitude * (2.0 * std::f64::consts::PI * elapsed_secs / period_secs).sin()
            }
            SignalPattern::Counter { step, min, max } => {
                self.counter_value += step;
                if self.counter_value > max {
                    self.counter_value = min;
                } else if self.counter_value < min {
                    self.counter_value = max;
                }
                self.counter_value
            }
            SignalPattern::Random { min, max } => min + rand_simple() * (max - min),
            SignalPattern::Square {
                period_secs,
                low,
                high,
            } => {
                let t = elapsed_secs % period_secs;
                if t < period_secs / 2.0 {
                    low
                } else {
                    high
                }
            }
        };

        if self.noise_amplitude > 0.0 {
            base_value + (rand_simple() - 0.5) * 2.0 * self.noise_amplitude
        } else {
            base_value
        }
    }
}

/// Simple pseudo-random number generator (xorshift)
fn rand_simple() -> f64 {
    use std::cell::Cell;
    thread_local! {
        static SEED: Cell<u64> = const { Cell::new(12345) };
    }
    SEED.with(|seed| {
        let mut s = seed.get();
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        seed.set(s);
        (s as f64) / (u64::MAX as f64)
    })
}

/// Sensor source producing generated data
pub struct SimulatedSource {
    channels: [SimulatedChannel; Channel::COUNT],
    start_time: Instant,
    read_delay: Duration,
    failure_rate: f64,
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSource {
    /// Create a source with the default pattern on every channel
    pub fn new() -> Self {
        Self {
            channels: Channel::ALL.map(|c| SimulatedChannel::new(SignalPattern::default_for(c))),
            start_time: Instant::now(),
            read_delay: Duration::ZERO,
            failure_rate: 0.0,
        }
    }

    /// Replace the pattern of one channel
    pub fn with_pattern(mut self, channel: Channel, pattern: SignalPattern) -> Self {
        self.channels[channel.index()] = SimulatedChannel::new(pattern);
        self
    }

    /// Add noise to one channel
    pub fn with_noise(mut self, channel: Channel, amplitude: f64) -> Self {
        self.channels[channel.index()].noise_amplitude = amplitude;
        self
    }

    /// Sleep this long on every read
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = delay;
        self
    }

    /// Probability (0.0..=1.0) that any single read fails
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Make the next read of `channel` fail with `failure`
    ///
    /// Queued failures are consumed one per read, in order.
    pub fn fail_next(&mut self, channel: Channel, failure: ReadFailure) {
        self.channels[channel.index()]
            .pending_failures
            .push_back(failure);
    }

    fn read(&mut self, channel: Channel) -> Result<f64, ReadFailure> {
        if !self.read_delay.is_zero() {
            std::thread::sleep(self.read_delay);
        }

        let state = &mut self.channels[channel.index()];
        if let Some(failure) = state.pending_failures.pop_front() {
            return Err(failure);
        }

        if self.failure_rate > 0.0 && rand_simple() < self.failure_rate {
            return Err(ReadFailure::Fault("SimulatedFault".to_string()));
        }

        let elapsed = self.start_time.elapsed().as_secs_f64();
        Ok(state.generate_value(elapsed))
    }
}

impl SampleSource for SimulatedSource {
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
        format!("simulated sensors (failure rate {:.0}%)", self.failure_rate * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_pattern() {
        let mut source = SimulatedSource::new()
            .with_pattern(Channel::RoomTemperature, SignalPattern::Constant(22.0));
        assert_eq!(source.read_room_temperature(), Ok(22.0));
        assert_eq!(source.read_room_temperature(), Ok(22.0));
    }

    #[test]
    fn test_noise_stays_within_amplitude() {
        let mut source = SimulatedSource::new()
            .with_pattern(Channel::Pressure, SignalPattern::Constant(1000.0))
            .with_noise(Channel::Pressure, 2.0);
        let values: Vec<f64> = (0..50).map(|_| source.read_pressure().unwrap()).collect();

        assert!(values.iter().all(|v| (998.0..=1002.0).contains(v)));
        assert!(values.iter().any(|v| *v != values[0]));
    }

    #[test]
    fn test_counter_pattern_starts_at_min_and_wraps() {
        let mut source = SimulatedSource::new().with_pattern(
            Channel::Humidity,
            SignalPattern::Counter {
                step: 1.0,
                min: 1.0,
                max: 3.0,
            },
        );
        let values: Vec<f64> = (0..4).map(|_| source.read_humidity().unwrap()).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_random_pattern_stays_in_range() {
        let mut channel = SimulatedChannel::new(SignalPattern::Random { min: 5.0, max: 6.0 });
        for _ in 0..100 {
            let v = channel.generate_value(0.0);
            assert!((5.0..=6.0).contains(&v));
        }
    }

    #[test]
    fn test_square_pattern() {
        let mut channel = SimulatedChannel::new(SignalPattern::Square {
            period_secs: 10.0,
            low: 0.0,
            high: 1.0,
        });
        assert_eq!(channel.generate_value(1.0), 0.0);
        assert_eq!(channel.generate_value(6.0), 1.0);
    }

    #[test]
    fn test_queued_failures_are_consumed_in_order() {
        let mut source = SimulatedSource::new()
            .with_pattern(Channel::Pressure, SignalPattern::Constant(1000.0));
        source.fail_next(Channel::Pressure, ReadFailure::NoSensorFound);
        source.fail_next(Channel::Pressure, ReadFailure::LibraryError);

        assert_eq!(source.read_pressure(), Err(ReadFailure::NoSensorFound));
        assert_eq!(source.read_pressure(), Err(ReadFailure::LibraryError));
        assert_eq!(source.read_pressure(), Ok(1000.0));
    }

    #[test]
    fn test_full_failure_rate() {
        let mut source = SimulatedSource::new().with_failure_rate(1.0);
        assert_eq!(
            source.read_rain(),
            Err(ReadFailure::Fault("SimulatedFault".to_string()))
        );
    }

    #[test]
    fn test_rain_threshold() {
        let mut source =
            SimulatedSource::new().with_pattern(Channel::Rain, SignalPattern::Constant(1.0));
        assert_eq!(source.read_rain(), Ok(true));
    }
}
