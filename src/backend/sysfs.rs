//! Linux sysfs sensor source
//!
//! Reads the reference station hardware through the kernel drivers:
//!
//! - outside temperature from a one-wire thermometer (`w1_slave`)
//! - room temperature, humidity and pressure from an IIO environmental
//!   sensor (`in_temp_input`, `in_humidityrelative_input`, `in_pressure_input`)
//! - rain from a GPIO `value` file
//!
//! Every read opens its file afresh, so a sensor that is unplugged and
//! plugged back in recovers on the next cycle.

use super::source::SampleSource;
use crate::config::SysfsConfig;
use crate::error::ReadFailure;
use std::path::{Path, PathBuf};

/// Family code prefix of one-wire thermometers in `/sys/bus/w1/devices`
const W1_THERMOMETER_PREFIX: &str = "28-";

/// Sensor source backed by sysfs files
#[derive(Debug, Clone)]
pub struct SysfsSource {
    config: SysfsConfig,
}

impl SysfsSource {
    /// Create a source reading the configured paths
    pub fn new(config: SysfsConfig) -> Self {
        Self { config }
    }

    /// Locate the `w1_slave` file of the outside thermometer
    fn w1_slave_path(&self) -> Result<PathBuf, ReadFailure> {
        if let Some(device) = &self.config.w1_device {
            return Ok(self.config.w1_devices_dir.join(device).join("w1_slave"));
        }

        let mut devices: Vec<PathBuf> = std::fs::read_dir(&self.config.w1_devices_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with(W1_THERMOMETER_PREFIX)
            })
            .map(|entry| entry.path().join("w1_slave"))
            .collect();
        devices.sort();
        devices.into_iter().next().ok_or(ReadFailure::NoSensorFound)
    }

    fn read_iio(&self, node: &str) -> Result<f64, ReadFailure> {
        read_number(&self.config.iio_device.join(node))
    }
}

/// Read a file holding a single number
fn read_number(path: &Path) -> Result<f64, ReadFailure> {
    let text = std::fs::read_to_string(path)?;
    text.trim().parse::<f64>().map_err(|_| {
        tracing::debug!("Unparseable sensor value in {}: {:?}", path.display(), text);
        ReadFailure::LibraryError
    })
}

/// Parse the two-line `w1_slave` output into °C
///
/// ```text
/// 72 01 4b 46 7f ff 0e 10 57 : crc=57 YES
/// 72 01 4b 46 7f ff 0e 10 57 t=23125
/// ```
pub fn parse_w1_slave(text: &str) -> Result<f64, ReadFailure> {
    let mut lines = text.lines();
    let crc_line = lines.next().ok_or(ReadFailure::LibraryError)?;
    if !crc_line.trim_end().ends_with("YES") {
        return Err(ReadFailure::SensorNotReady);
    }

    let data_line = lines.next().ok_or(ReadFailure::LibraryError)?;
    let (_, millidegrees) = data_line
        .rsplit_once("t=")
        .ok_or(ReadFailure::LibraryError)?;
    millidegrees
        .trim()
        .parse::<f64>()
        .map(|m| m / 1000.0)
        .map_err(|_| ReadFailure::LibraryError)
}

impl SampleSource for SysfsSource {
    fn read_room_temperature(&mut self) -> Result<f64, ReadFailure> {
        // millidegrees Celsius
        self.read_iio("in_temp_input").map(|v| v / 1000.0)
    }

    fn read_outside_temperature(&mut self) -> Result<f64, ReadFailure> {
        let path = self.w1_slave_path()?;
        parse_w1_slave(&std::fs::read_to_string(path)?)
    }

    fn read_humidity(&mut self) -> Result<f64, ReadFailure> {
        // milli-percent
        self.read_iio("in_humidityrelative_input").map(|v| v / 1000.0)
    }

    fn read_pressure(&mut self) -> Result<f64, ReadFailure> {
        // kPa
        self.read_iio("in_pressure_input").map(|v| v * 10.0)
    }

    fn read_rain(&mut self) -> Result<bool, ReadFailure> {
        let level = read_number(&self.config.rain_gpio_value)?;
        let high = level >= 0.5;
        Ok(high != self.config.rain_active_low)
    }

    fn describe(&self) -> String {
        format!(
            "sysfs sensors (iio: {}, w1: {}, rain: {})",
            self.config.iio_device.display(),
            self.config.w1_devices_dir.display(),
            self.config.rain_gpio_value.display()
        )
    }
}
