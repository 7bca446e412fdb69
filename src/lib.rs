//! # Weather Kiosk: Touchscreen Weather Station Dashboard
//!
//! A kiosk dashboard for a small weather station. It polls the station's
//! sensors (room temperature, humidity and pressure, an outside thermometer
//! and a rain detector) and shows live values and rolling history plots.
//!
//! ## Architecture
//!
//! - **Backend**: A sampling worker thread reads every sensor once per period
//!   and commits complete cycles to the store
//! - **Store**: Fixed-capacity short-term and long-term buffers per channel,
//!   sharing one time axis per resolution, plus the sampling error log
//! - **Frontend**: Renders the UI using eframe/egui with egui_plot for graphs
//! - **Communication**: Crossbeam channels for commands and notifications;
//!   the history itself is read from the shared store
//! - **Weather**: A lookup thread fetching the current weather of a chosen
//!   city from OpenWeatherMap for the world weather page
//!
//! ## Configuration
//!
//! Settings are read from `$WEATHER_KIOSK_CONFIG` or from `config.toml` in the
//! platform config directory under `dev.weather-kiosk`. See [`config`].
//!
//! ## Example
//!
//! ```no_run
//! use weather_kiosk::{
//!     backend::{build_source, SamplingBackend},
//!     config::AppConfig,
//!     frontend::KioskApp,
//!     store::SeriesStore,
//!     weather::{OpenWeatherClient, WeatherService},
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load_default()?;
//!     let store = SeriesStore::shared(config.sampling.capacity);
//!     let source = build_source(&config)?;
//!
//!     let (backend, frontend) = SamplingBackend::new(&config, store.clone(), source);
//!     let _handle = backend.spawn()?;
//!
//!     let client = OpenWeatherClient::new(&config.weather);
//!     let (weather, weather_handle) = WeatherService::new(Box::new(client));
//!     weather.spawn()?;
//!
//!     let ui_config = config.ui.clone();
//!     eframe::run_native(
//!         "Weather Kiosk",
//!         eframe::NativeOptions::default(),
//!         Box::new(|cc| {
//!             Ok(Box::new(KioskApp::new(
//!                 cc,
//!                 frontend,
//!                 weather_handle,
//!                 store,
//!                 ui_config,
//!             )))
//!         }),
//!     )
//!     .map_err(|e| anyhow::anyhow!("{e}"))
//! }
//! ```

pub mod backend;
pub mod clock;
pub mod config;
pub mod error;
pub mod frontend;
pub mod store;
pub mod types;
pub mod weather;

// Re-export commonly used types
pub use backend::{SampleSource, SamplingBackend, SamplingScheduler, TickOutcome};
pub use config::AppConfig;
pub use error::{KioskError, ReadFailure, Result};
pub use frontend::KioskApp;
pub use store::{ErrorRecord, SeriesStore, SharedStore, Snapshot};
pub use types::{Channel, CycleReadings, Resolution};
