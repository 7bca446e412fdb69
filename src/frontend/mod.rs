//! Frontend module for egui UI
//!
//! This module provides the kiosk UI using eframe/egui. It receives cycle
//! outcomes and live values from the backend through crossbeam channels and
//! reads the sampled history straight from the shared store.
//!
//! # Main Types
//!
//! - [`KioskApp`] - Main application state implementing [`eframe::App`]
//! - [`Topics`] - Latest data published by the backend
//! - [`Navigation`] - Which page is shown
//! - [`WeatherView`] - City selection and last lookup of the world weather page
//!
//! # Submodules
//!
//! - `pages` - Dashboard, chart, error console and world weather pages
//! - `plot` - History plot rendering with egui_plot
//! - `status_bar` - Sampling health at the bottom of the window

pub mod pages;
pub mod plot;
pub mod state;
pub mod status_bar;
pub mod topics;
pub mod weather_view;

pub use state::{AppAction, Navigation, Screen, SharedState};
pub use topics::{LastCycle, Topics};
pub use weather_view::{WeatherStatus, WeatherView};

use crate::backend::{BackendCommand, FrontendHandle};
use crate::config::UiConfig;
use crate::store::SharedStore;
use crate::weather::WeatherHandle;
use chrono::Local;
use pages::{ChartPage, DashboardPage, ErrorConsolePage, Page, WorldWeatherPage};
use std::time::Duration;

/// Repaint interval for the dashboard clock
const REPAINT_INTERVAL: Duration = Duration::from_secs(1);

/// Switch the whole UI to the dark or light theme
pub fn apply_theme(ctx: &egui::Context, dark_mode: bool) {
    if dark_mode {
        ctx.set_visuals(egui::Visuals::dark());
    } else {
        ctx.set_visuals(egui::Visuals::light());
    }
}

/// Apply a world weather action to the page state; returns whether it was one
fn handle_weather_action(
    view: &mut WeatherView,
    weather: &WeatherHandle,
    action: AppAction,
) -> bool {
    match action {
        AppAction::ToggleRegion => view.toggle_region(),
        AppAction::SelectCity(index) => view.select(index),
        AppAction::CheckWeather => {
            if view.is_loading() {
                return true;
            }
            let city = view.begin_request();
            if !weather.request(city) {
                view.status = WeatherStatus::Failed {
                    city: city.to_string(),
                    message: "Weather service is not running".to_string(),
                };
            }
        }
        _ => return false,
    }
    true
}

/// Main kiosk application
pub struct KioskApp {
    /// Channel endpoints to the backend
    frontend: FrontendHandle,
    /// Channel endpoints to the weather thread
    weather: WeatherHandle,
    /// Sampled history
    store: SharedStore,
    /// Window and plot settings
    ui_config: UiConfig,
    /// Data published by the backend
    topics: Topics,
    /// Current page
    nav: Navigation,
    /// World weather page state
    weather_view: WeatherView,
    /// Active theme; starts from the config and toggles at runtime
    dark_mode: bool,
}

impl KioskApp {
    /// Create the app
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        frontend: FrontendHandle,
        weather: WeatherHandle,
        store: SharedStore,
        ui_config: UiConfig,
    ) -> Self {
        let dark_mode = ui_config.dark_mode;
        apply_theme(&cc.egui_ctx, dark_mode);

        Self {
            frontend,
            weather,
            store,
            ui_config,
            topics: Topics::default(),
            nav: Navigation::default(),
            weather_view: WeatherView::default(),
            dark_mode,
        }
    }

    /// Process all pending backend messages; returns whether any arrived
    fn process_backend_messages(&mut self) -> bool {
        let messages = self.frontend.drain();
        let had_messages = !messages.is_empty();
        for message in messages {
            self.topics.apply(message);
        }
        had_messages
    }

    /// Process finished weather lookups; returns whether any arrived
    fn process_weather_updates(&mut self) -> bool {
        let updates = self.weather.drain();
        let had_updates = !updates.is_empty();
        for update in updates {
            self.weather_view.apply(update);
        }
        had_updates
    }

    /// Handle an action emitted by a page
    fn handle_action(&mut self, ctx: &egui::Context, action: AppAction) {
        if self.nav.apply(action) {
            return;
        }
        if handle_weather_action(&mut self.weather_view, &self.weather, action) {
            return;
        }
        match action {
            AppAction::ToggleDarkMode => {
                self.dark_mode = !self.dark_mode;
                tracing::debug!("Dark mode {}", if self.dark_mode { "on" } else { "off" });
                apply_theme(ctx, self.dark_mode);
            }
            AppAction::ClearErrors => {
                if !self.frontend.send_command(BackendCommand::ClearErrors) {
                    tracing::warn!("Backend is gone, cannot clear errors");
                }
            }
            AppAction::SampleNow => {
                self.frontend.sample_now();
            }
            _ => {}
        }
    }
}

impl eframe::App for KioskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let backend_updates = self.process_backend_messages();
        let weather_updates = self.process_weather_updates();
        if backend_updates || weather_updates {
            ctx.request_repaint();
        }
        ctx.request_repaint_after(REPAINT_INTERVAL);

        let error_count = self.store.error_count();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            status_bar::render_status_bar(ui, &self.topics, error_count);
        });

        let actions = {
            let shared = SharedState {
                store: &self.store,
                topics: &self.topics,
                ui_config: &self.ui_config,
                weather: &self.weather_view,
                dark_mode: self.dark_mode,
                now: Local::now(),
            };
            match self.nav.screen {
                Screen::Dashboard => DashboardPage::render(&self.nav, &shared, ctx),
                Screen::Chart => ChartPage::render(&self.nav, &shared, ctx),
                Screen::Errors => ErrorConsolePage::render(&self.nav, &shared, ctx),
                Screen::WorldWeather => WorldWeatherPage::render(&self.nav, &shared, ctx),
            }
        };

        for action in actions {
            self.handle_action(ctx, action);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        tracing::info!("Window closed, stopping backend");
        self.frontend.shutdown();
        self.weather.shutdown();
    }
}
