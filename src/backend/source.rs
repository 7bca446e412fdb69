//! SampleSource trait for raw sensor access
//!
//! This module provides the common interface over the five independently
//! failing readers the scheduler samples: room temperature, outside
//! temperature, humidity, pressure and the rain detector. Real hardware
//! (sysfs), simulated sensors and test doubles all implement it.

use crate::error::ReadFailure;
use crate::types::{rain_value, Channel};

/// Unified interface for the station's sensors
///
/// Every read is independent and may fail on its own with a
/// [`ReadFailure`]. Implementations must be `Send` so they can be moved onto
/// the sampling thread.
///
/// # Example
///
/// ```ignore
/// fn sample(source: &mut dyn SampleSource) -> Result<CycleReadings, Vec<(Channel, ReadFailure)>> {
///     CycleReadings::collect(read_all(source))
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait SampleSource: Send {
    /// Indoor temperature in °C
    fn read_room_temperature(&mut self) -> Result<f64, ReadFailure>;

    /// Outside thermometer temperature in °C
    fn read_outside_temperature(&mut self) -> Result<f64, ReadFailure>;

    /// Relative humidity in %
    fn read_humidity(&mut self) -> Result<f64, ReadFailure>;

    /// Atmospheric pressure in hPa
    fn read_pressure(&mut self) -> Result<f64, ReadFailure>;

    /// Whether the rain detector is currently wet
    fn read_rain(&mut self) -> Result<bool, ReadFailure>;

    /// Short description for logs
    fn describe(&self) -> String;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn read_room_temperature(&mut self) -> Result<f64, ReadFailure> {
        (**self).read_room_temperature()
    }

    fn read_outside_temperature(&mut self) -> Result<f64, ReadFailure> {
        (**self).read_outside_temperature()
    }

    fn read_humidity(&mut self) -> Result<f64, ReadFailure> {
        (**self).read_humidity()
    }

    fn read_pressure(&mut self) -> Result<f64, ReadFailure> {
        (**self).read_pressure()
    }

    fn read_rain(&mut self) -> Result<bool, ReadFailure> {
        (**self).read_rain()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Read one channel as a numeric value (rain encoded as 0/1)
pub fn read_channel(source: &mut dyn SampleSource, channel: Channel) -> Result<f64, ReadFailure> {
    match channel {
        Channel::RoomTemperature => source.read_room_temperature(),
        Channel::OutsideTemperature => source.read_outside_temperature(),
        Channel::Humidity => source.read_humidity(),
        Channel::Pressure => source.read_pressure(),
        Channel::Rain => source.read_rain().map(rain_value),
    }
}

/// Read every channel once, in [`Channel::ALL`] order
///
/// No read is skipped because an earlier one failed.
pub fn read_all(source: &mut dyn SampleSource) -> [Result<f64, ReadFailure>; Channel::COUNT] {
    Channel::ALL.map(|channel| read_channel(&mut *source, channel))
}
