//! Core data types for the weather kiosk
//!
//! This module contains the fundamental types shared between the sampling
//! backend, the series store and the dashboard.
//!
//! # Main Types
//!
//! - [`Channel`] - The five measured quantities, as a closed enumeration
//! - [`Resolution`] - Short-term (every cycle) or long-term (decimated) view
//! - [`CycleReadings`] - One complete, successful read of every channel
//! - [`LiveReadings`] - Per-channel results for the dashboard buttons
//! - [`SamplingStats`] - Running counters for committed/discarded cycles

use crate::error::ReadFailure;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One measured quantity
///
/// Every channel maps to a statically known pair of buffers (short-term and
/// long-term) through [`Channel::index`]; there is no string lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Indoor temperature in °C
    RoomTemperature,
    /// Outside thermometer temperature in °C
    OutsideTemperature,
    /// Indoor relative humidity in %
    Humidity,
    /// Atmospheric pressure in hPa
    Pressure,
    /// Rain detector, encoded as 0.0 (dry) or 1.0 (rain)
    Rain,
}

impl Channel {
    /// Number of channels
    pub const COUNT: usize = 5;

    /// All channels in storage order
    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::RoomTemperature,
        Channel::OutsideTemperature,
        Channel::Humidity,
        Channel::Pressure,
        Channel::Rain,
    ];

    /// Position of this channel in per-channel arrays
    pub const fn index(self) -> usize {
        match self {
            Channel::RoomTemperature => 0,
            Channel::OutsideTemperature => 1,
            Channel::Humidity => 2,
            Channel::Pressure => 3,
            Channel::Rain => 4,
        }
    }

    /// Stable identifier (matches the serde name)
    pub const fn key(self) -> &'static str {
        match self {
            Channel::RoomTemperature => "room_temperature",
            Channel::OutsideTemperature => "outside_temperature",
            Channel::Humidity => "humidity",
            Channel::Pressure => "pressure",
            Channel::Rain => "rain",
        }
    }

    /// Title shown on the dashboard button and plot page
    pub const fn display_name(self) -> &'static str {
        match self {
            Channel::RoomTemperature => "Temperature",
            Channel::OutsideTemperature => "Outside",
            Channel::Humidity => "Room Humidity",
            Channel::Pressure => "Pressure",
            Channel::Rain => "Precipitation",
        }
    }

    /// Y axis label for plots
    pub const fn axis_label(self) -> &'static str {
        match self {
            Channel::RoomTemperature | Channel::OutsideTemperature => "Temperature (°C)",
            Channel::Humidity => "Humidity (%)",
            Channel::Pressure => "Pressure (hPa)",
            Channel::Rain => "Rain",
        }
    }

    /// Plot color (RGBA)
    pub const fn color(self) -> [u8; 4] {
        match self {
            Channel::RoomTemperature => [0xb3, 0x22, 0x1d, 255],
            Channel::OutsideTemperature => [0xe0, 0x60, 0x16, 255],
            Channel::Humidity => [0x1c, 0x2d, 0x9c, 255],
            Channel::Pressure => [0x3a, 0xa1, 0x1b, 255],
            Channel::Rain => [0x7f, 0x18, 0xa1, 255],
        }
    }

    /// Format a value of this channel for display
    pub fn format_value(self, value: f64) -> String {
        match self {
            Channel::RoomTemperature | Channel::OutsideTemperature => {
                format!("{}°C", format_rounded(value))
            }
            Channel::Humidity => format!("{}%", format_rounded(value)),
            Channel::Pressure => format!("{} hPa", format_rounded(value)),
            Channel::Rain => {
                if value >= 0.5 {
                    "Rain detected".to_string()
                } else {
                    "No rain".to_string()
                }
            }
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Round to two decimals and print the shortest form, keeping one decimal
/// for whole numbers ("45.2", "21.35", "1013.0")
pub fn format_rounded(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        format!("{}", rounded)
    }
}

/// Encode a rain-detector state as a channel value
pub fn rain_value(detected: bool) -> f64 {
    if detected {
        1.0
    } else {
        0.0
    }
}

/// Which rolling window a buffer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Fine-grained recent window, extended on every successful cycle
    #[default]
    Short,
    /// Decimated window, extended on a subset of successful cycles
    Long,
}

impl Resolution {
    /// Both resolutions
    pub const ALL: [Resolution; 2] = [Resolution::Short, Resolution::Long];

    /// Button label for the plot page
    pub const fn label(self) -> &'static str {
        match self {
            Resolution::Short => "1H",
            Resolution::Long => "12H",
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Short => write!(f, "short"),
            Resolution::Long => write!(f, "long"),
        }
    }
}

/// One complete set of channel values from a successful cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReadings {
    values: [f64; Channel::COUNT],
}

impl CycleReadings {
    /// Build readings from values in [`Channel::ALL`] order
    pub fn new(values: [f64; Channel::COUNT]) -> Self {
        Self { values }
    }

    /// Build readings with the same value on every channel
    pub fn uniform(value: f64) -> Self {
        Self {
            values: [value; Channel::COUNT],
        }
    }

    /// Combine per-channel read results into a complete cycle
    ///
    /// All results are inspected; if any channel failed, every failure is
    /// returned (in channel order) and no readings are produced.
    pub fn collect(
        results: [Result<f64, ReadFailure>; Channel::COUNT],
    ) -> Result<Self, Vec<(Channel, ReadFailure)>> {
        let mut values = [0.0; Channel::COUNT];
        let mut failures = Vec::new();

        for (channel, result) in Channel::ALL.into_iter().zip(results) {
            match result {
                Ok(value) => values[channel.index()] = value,
                Err(failure) => failures.push((channel, failure)),
            }
        }

        if failures.is_empty() {
            Ok(Self { values })
        } else {
            Err(failures)
        }
    }

    /// Value for a channel
    pub fn get(&self, channel: Channel) -> f64 {
        self.values[channel.index()]
    }

    /// Iterate `(channel, value)` pairs in storage order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, f64)> + '_ {
        Channel::ALL.iter().map(move |&c| (c, self.values[c.index()]))
    }
}

/// Latest per-channel results for the dashboard buttons
///
/// Unlike a sampling cycle, each channel succeeds or fails on its own here.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveReadings {
    /// When the reads were taken
    pub taken_at: DateTime<Local>,
    readings: [Result<f64, ReadFailure>; Channel::COUNT],
}

impl LiveReadings {
    /// Create live readings from results in [`Channel::ALL`] order
    pub fn new(taken_at: DateTime<Local>, readings: [Result<f64, ReadFailure>; Channel::COUNT]) -> Self {
        Self { taken_at, readings }
    }

    /// Result for a channel
    pub fn get(&self, channel: Channel) -> &Result<f64, ReadFailure> {
        &self.readings[channel.index()]
    }

    /// Button text for a channel: the formatted value or the failure label
    pub fn label(&self, channel: Channel) -> String {
        match self.get(channel) {
            Ok(value) => channel.format_value(*value),
            Err(failure) => failure.to_string(),
        }
    }
}

/// Running statistics for the sampling scheduler
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplingStats {
    /// Cycles committed to the store
    pub committed_cycles: u64,
    /// Cycles discarded because a read failed
    pub discarded_cycles: u64,
    /// Committed cycles that also extended the long-term buffers
    pub long_term_commits: u64,
    /// Duration of the most recent cycle's reads in microseconds
    pub last_read_time_us: u64,
    /// Time of the most recent committed cycle
    pub last_commit: Option<DateTime<Local>>,
}

impl SamplingStats {
    /// Calculate the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.committed_cycles + self.discarded_cycles;
        if total == 0 {
            100.0
        } else {
            (self.committed_cycles as f64 / total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_indices_match_all_order() {
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
    }

    #[test]
    fn test_channel_serde_names() {
        let json = serde_json::to_string(&Channel::OutsideTemperature).unwrap();
        assert_eq!(json, "\"outside_temperature\"");
        let parsed: Channel = serde_json::from_str("\"rain\"").unwrap();
        assert_eq!(parsed, Channel::Rain);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(Channel::RoomTemperature.format_value(21.346), "21.35°C");
        assert_eq!(Channel::Humidity.format_value(45.2), "45.2%");
        assert_eq!(Channel::Humidity.format_value(45.123), "45.12%");
        assert_eq!(Channel::Pressure.format_value(1013.0), "1013.0 hPa");
        assert_eq!(Channel::OutsideTemperature.format_value(-3.126), "-3.13°C");
        assert_eq!(Channel::Pressure.format_value(1013.25), "1013.25 hPa");
        assert_eq!(Channel::Rain.format_value(1.0), "Rain detected");
        assert_eq!(Channel::Rain.format_value(0.0), "No rain");
    }

    #[test]
    fn test_collect_all_ok() {
        let readings =
            CycleReadings::collect([Ok(20.0), Ok(5.0), Ok(40.0), Ok(1000.0), Ok(0.0)]).unwrap();
        assert_eq!(readings.get(Channel::Humidity), 40.0);
        assert_eq!(readings.iter().count(), Channel::COUNT);
    }

    #[test]
    fn test_collect_reports_every_failure() {
        let failures = CycleReadings::collect([
            Ok(20.0),
            Err(ReadFailure::SensorNotReady),
            Ok(40.0),
            Err(ReadFailure::NoSensorFound),
            Ok(0.0),
        ])
        .unwrap_err();

        assert_eq!(
            failures,
            vec![
                (Channel::OutsideTemperature, ReadFailure::SensorNotReady),
                (Channel::Pressure, ReadFailure::NoSensorFound),
            ]
        );
    }

    #[test]
    fn test_live_labels() {
        let live = LiveReadings::new(
            Local::now(),
            [
                Ok(21.5),
                Err(ReadFailure::SensorNotReady),
                Ok(50.0),
                Err(ReadFailure::LibraryError),
                Ok(rain_value(true)),
            ],
        );
        assert_eq!(live.label(Channel::RoomTemperature), "21.5°C");
        assert_eq!(live.label(Channel::OutsideTemperature), "sensor not ready");
        assert_eq!(live.label(Channel::Pressure), "library error");
        assert_eq!(live.label(Channel::Rain), "Rain detected");
    }

    #[test]
    fn test_success_rate() {
        let mut stats = SamplingStats::default();
        assert_eq!(stats.success_rate(), 100.0);
        stats.committed_cycles = 3;
        stats.discarded_cycles = 1;
        assert_eq!(stats.success_rate(), 75.0);
    }
}
