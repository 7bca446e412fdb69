//! Error handling for the weather kiosk
//!
//! Two layers of errors live here:
//!
//! - [`ReadFailure`] - a single sensor read that did not produce a value.
//!   These are expected at runtime and never fatal; the sampling scheduler
//!   turns them into error-log entries.
//! - [`KioskError`] - everything else (configuration, I/O, channel plumbing),
//!   with a [`Result`] alias for use throughout the crate.

use thiserror::Error;

/// Why a single sensor read produced no value
///
/// The `Display` text is the short label shown on a dashboard button, while
/// [`ReadFailure::name`] is the kind recorded in the error log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadFailure {
    /// The device is not present (missing bus device or sysfs node)
    #[error("no sensor found")]
    NoSensorFound,

    /// The device answered but its data is not valid yet
    #[error("sensor not ready")]
    SensorNotReady,

    /// The driver returned something that could not be interpreted
    #[error("library error")]
    LibraryError,

    /// The read did not complete within the configured timeout
    #[error("timeout")]
    Timeout,

    /// Any other fault, carrying the name of the faulting condition
    #[error("{0}")]
    Fault(String),
}

impl ReadFailure {
    /// Name of the faulting condition, as stored in the error log
    pub fn name(&self) -> &str {
        match self {
            ReadFailure::NoSensorFound => "NoSensorFound",
            ReadFailure::SensorNotReady => "SensorNotReady",
            ReadFailure::LibraryError => "LibraryError",
            ReadFailure::Timeout => "Timeout",
            ReadFailure::Fault(kind) => kind,
        }
    }
}

impl From<std::io::Error> for ReadFailure {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ReadFailure::NoSensorFound,
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => ReadFailure::Timeout,
            _ => ReadFailure::Fault(format!("{:?}", err.kind())),
        }
    }
}

/// Main error type for weather kiosk operations
#[derive(Error, Debug)]
pub enum KioskError {
    /// A sensor read failed outside the sampling scheduler
    #[error("Sensor error: {0}")]
    Sensor(#[from] ReadFailure),

    /// Errors related to configuration loading/validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<KioskError>,
    },
}

impl KioskError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        KioskError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<toml::de::Error> for KioskError {
    fn from(err: toml::de::Error) -> Self {
        KioskError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for KioskError {
    fn from(err: toml::ser::Error) -> Self {
        KioskError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for KioskError {
    fn from(err: serde_json::Error) -> Self {
        KioskError::Serialization(err.to_string())
    }
}

/// Result type alias for weather kiosk operations
pub type Result<T> = std::result::Result<T, KioskError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| KioskError::Io(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| KioskError::Io(e).with_context(f()))
    }
}
