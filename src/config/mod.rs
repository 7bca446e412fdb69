//! Configuration for the weather kiosk
//!
//! The whole configuration is one [`AppConfig`] value, loaded at start-up and
//! never written back by the running application.
//!
//! # Config Location
//!
//! The file is looked up in this order:
//! - the path in `$WEATHER_KIOSK_CONFIG`
//! - `config.toml` in the platform config directory:
//!   - **Linux**: `~/.config/dev.weather-kiosk/`
//!   - **macOS**: `~/Library/Application Support/dev.weather-kiosk/`
//!   - **Windows**: `%APPDATA%\dev.weather-kiosk\`
//!
//! A missing file means defaults. Files ending in `.json` are parsed as JSON,
//! everything else as TOML.
//!
//! # Example
//!
//! ```toml
//! [sampling]
//! period_secs = 180
//! long_term_interval = 10
//!
//! [source]
//! kind = "sysfs"
//! iio_device = "/sys/bus/iio/devices/iio:device0"
//! rain_gpio_value = "/sys/class/gpio/gpio14/value"
//!
//! [ui]
//! fullscreen = true
//!
//! [weather]
//! api_key = "0123456789abcdef"
//! timeout_secs = 10
//! ```

use crate::error::{KioskError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application identifier for the config directory
pub const APP_ID: &str = "dev.weather-kiosk";

/// Config filename inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the config path
pub const CONFIG_ENV_VAR: &str = "WEATHER_KIOSK_CONFIG";

/// Default sampling period (3 minutes)
pub const DEFAULT_PERIOD_SECS: u64 = 180;

/// Default timeout for a single sensor read in milliseconds
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 2_000;

/// Default refresh interval of the dashboard's live values
pub const DEFAULT_LIVE_REFRESH_SECS: u64 = 5;

/// Environment variable holding the OpenWeatherMap API key
pub const API_KEY_ENV_VAR: &str = "WEATHER_KIOSK_API_KEY";

/// OpenWeatherMap current-weather endpoint
pub const DEFAULT_WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Default timeout of a weather lookup
pub const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 10;

/// Get the default config file path
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    dirs_next::config_dir().map(|p| p.join(APP_ID).join(CONFIG_FILE))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

// ==================== App Config ====================

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Sampling schedule and buffer sizes
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Where sensor values come from
    #[serde(default)]
    pub source: SourceConfig,

    /// Window and plot settings
    #[serde(default)]
    pub ui: UiConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,

    /// World weather lookups
    #[serde(default)]
    pub weather: WeatherConfig,
}

impl AppConfig {
    /// Load a config file, choosing the format by extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        let config: Self = if is_json(path) {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load the config from the default location
    ///
    /// A missing file yields defaults; a file that exists but is invalid is
    /// an error.
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading configuration from {:?}", path);
                Self::load(path)
            }
            Some(path) => {
                tracing::info!("No configuration at {:?}, using defaults", path);
                Ok(Self::default())
            }
            None => {
                tracing::warn!("Could not determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load configuration, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save the config, choosing the format by extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {:?}", path))
    }

    /// Reject values the sampler cannot run with
    pub fn validate(&self) -> Result<()> {
        let sampling = &self.sampling;
        if sampling.period_secs == 0 {
            return Err(KioskError::Config(
                "sampling.period_secs must be positive".to_string(),
            ));
        }
        if sampling.capacity == 0 {
            return Err(KioskError::Config(
                "sampling.capacity must be positive".to_string(),
            ));
        }
        if sampling.long_term_interval == 0 {
            return Err(KioskError::Config(
                "sampling.long_term_interval must be positive".to_string(),
            ));
        }
        if sampling.live_refresh_secs == 0 {
            return Err(KioskError::Config(
                "sampling.live_refresh_secs must be positive".to_string(),
            ));
        }
        if let SourceConfig::Simulated {
            failure_rate,
            noise,
        } = self.source
        {
            if !(0.0..=1.0).contains(&failure_rate) {
                return Err(KioskError::Config(format!(
                    "source.failure_rate must be within 0..=1, got {}",
                    failure_rate
                )));
            }
            if !(noise >= 0.0 && noise.is_finite()) {
                return Err(KioskError::Config(format!(
                    "source.noise must be a non-negative number, got {}",
                    noise
                )));
            }
        }
        if self.weather.timeout_secs == 0 {
            return Err(KioskError::Config(
                "weather.timeout_secs must be positive".to_string(),
            ));
        }
        if !(self.weather.endpoint.starts_with("http://")
            || self.weather.endpoint.starts_with("https://"))
        {
            return Err(KioskError::Config(format!(
                "weather.endpoint must be an http(s) URL, got {:?}",
                self.weather.endpoint
            )));
        }
        Ok(())
    }
}

// ==================== Sampling Config ====================

/// Sampling schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Seconds between sampling cycles
    pub period_secs: u64,

    /// Timeout for a single sensor read in milliseconds (0 disables it)
    pub read_timeout_ms: u64,

    /// Number of samples kept per buffer
    pub capacity: usize,

    /// Successful cycles between long-term samples
    pub long_term_interval: u64,

    /// Seconds between live value refreshes on the dashboard
    pub live_refresh_secs: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            period_secs: DEFAULT_PERIOD_SECS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            capacity: crate::store::DEFAULT_CAPACITY,
            long_term_interval: crate::backend::DEFAULT_LONG_TERM_INTERVAL,
            live_refresh_secs: DEFAULT_LIVE_REFRESH_SECS,
        }
    }
}

impl SamplingConfig {
    /// Sampling period as a [`Duration`]
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }

    /// Per-read timeout, if enabled
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }

    /// Live refresh interval as a [`Duration`]
    pub fn live_refresh(&self) -> Duration {
        Duration::from_secs(self.live_refresh_secs)
    }
}

// ==================== Source Config ====================

/// Which sensor source to use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Generated values, for running without hardware
    Simulated {
        /// Probability that any single read fails
        #[serde(default)]
        failure_rate: f64,
        /// Peak amplitude of the noise added to every numeric channel
        #[serde(default)]
        noise: f64,
    },
    /// The station hardware through Linux sysfs
    Sysfs(SysfsConfig),
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Simulated {
            failure_rate: 0.0,
            noise: 0.0,
        }
    }
}

impl std::fmt::Display for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceConfig::Simulated { .. } => write!(f, "simulated"),
            SourceConfig::Sysfs(_) => write!(f, "sysfs"),
        }
    }
}

/// Sysfs paths of the station hardware
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SysfsConfig {
    /// Directory holding one-wire devices
    pub w1_devices_dir: PathBuf,

    /// One-wire thermometer id (e.g. `28-000005e2fdc3`); the first `28-`
    /// device is used when unset
    pub w1_device: Option<String>,

    /// IIO device directory of the environmental sensor
    pub iio_device: PathBuf,

    /// GPIO `value` file of the rain detector
    pub rain_gpio_value: PathBuf,

    /// Whether a low level means rain
    pub rain_active_low: bool,
}

impl Default for SysfsConfig {
    fn default() -> Self {
        Self {
            w1_devices_dir: PathBuf::from("/sys/bus/w1/devices"),
            w1_device: None,
            iio_device: PathBuf::from("/sys/bus/iio/devices/iio:device0"),
            rain_gpio_value: PathBuf::from("/sys/class/gpio/gpio14/value"),
            rain_active_low: true,
        }
    }
}

// ==================== UI Config ====================

/// Window and plot settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Window width in points
    pub window_width: f32,

    /// Window height in points
    pub window_height: f32,

    /// Start fullscreen (kiosk mode)
    pub fullscreen: bool,

    /// Use the dark theme
    pub dark_mode: bool,

    /// Plot line width in pixels
    pub line_width: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_width: 1024.0,
            window_height: 600.0,
            fullscreen: false,
            dark_mode: false,
            line_width: 2.0,
        }
    }
}

// ==================== Logging Config ====================

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for daily rolling log files; stderr only when unset
    pub directory: Option<PathBuf>,

    /// Filter directives used when `RUST_LOG` is not set
    pub filter: Option<String>,
}

// ==================== Weather Config ====================

/// World weather page settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key; `$WEATHER_KIOSK_API_KEY` takes precedence
    pub api_key: Option<String>,

    /// Current-weather endpoint URL
    pub endpoint: String,

    /// Seconds before a lookup is abandoned
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_WEATHER_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_WEATHER_TIMEOUT_SECS,
        }
    }
}

impl WeatherConfig {
    /// Lookup timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key from the environment, else from the file
    pub fn resolved_api_key(&self) -> Option<String> {
        Self::pick_api_key(std::env::var(API_KEY_ENV_VAR).ok(), self.api_key.clone())
    }

    fn pick_api_key(from_env: Option<String>, from_file: Option<String>) -> Option<String> {
        from_env
            .filter(|key| !key.trim().is_empty())
            .or_else(|| from_file.filter(|key| !key.trim().is_empty()))
    }
}
