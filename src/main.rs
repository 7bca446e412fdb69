//! Weather Kiosk - Main Entry Point
//!
//! Loads the configuration, starts the sampling backend and the weather
//! lookup thread, and runs the dashboard window until it is closed.

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use weather_kiosk::{
    backend::{build_source, SamplingBackend},
    config::{AppConfig, LoggingConfig},
    frontend::KioskApp,
    store::SeriesStore,
    weather::{OpenWeatherClient, WeatherService},
};

const DEFAULT_LOG_FILTER: &str = "info,weather_kiosk=debug";

/// Install the global subscriber; the returned guard flushes the log file
fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(logging.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER))
        })
    };

    let (file_layer, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "weather-kiosk.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter()))
        .with(file_layer)
        .init();

    guard
}

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_default().context("Failed to load configuration")?;
    let _log_guard = init_tracing(&config.logging);

    tracing::info!(
        "Starting Weather Kiosk (source: {}, period: {:?}, capacity: {})",
        config.source,
        config.sampling.period(),
        config.sampling.capacity
    );

    let store = SeriesStore::shared(config.sampling.capacity);
    let source = build_source(&config).context("Failed to set up sensor source")?;

    let (backend, frontend) = SamplingBackend::new(&config, store.clone(), source);
    let stop_handle = backend.stop_handle();
    let backend_handle = backend.spawn()?;

    let weather_client = OpenWeatherClient::new(&config.weather);
    if config.weather.resolved_api_key().is_none() {
        tracing::warn!(
            "No OpenWeatherMap API key; set weather.api_key or $WEATHER_KIOSK_API_KEY"
        );
    }
    // Ends on its own once the UI drops its handle
    let (weather_service, weather_handle) = WeatherService::new(Box::new(weather_client));
    weather_service.spawn()?;

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size([config.ui.window_width, config.ui.window_height])
        .with_title("Weather Kiosk");
    if config.ui.fullscreen {
        viewport = viewport.with_fullscreen(true).with_decorations(false);
    }
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let ui_config = config.ui.clone();
    let result = eframe::run_native(
        "Weather Kiosk",
        native_options,
        Box::new(|cc| {
            Ok(Box::new(KioskApp::new(
                cc,
                frontend,
                weather_handle,
                store,
                ui_config,
            )))
        }),
    );

    // Signal backend to stop and wait for it
    tracing::info!("Shutting down...");
    stop_handle.store(false, std::sync::atomic::Ordering::SeqCst);
    if backend_handle.join().is_err() {
        tracing::error!("Sampling thread panicked");
    }

    result.map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
