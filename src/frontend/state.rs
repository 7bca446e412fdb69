//! Shared state types for the frontend
//!
//! This module defines the shared state container and action types used by
//! the pages. Pages receive `SharedState` via borrowing and return
//! `AppAction`s instead of mutating state directly.

use chrono::{DateTime, Local};

use crate::config::UiConfig;
use crate::frontend::topics::Topics;
use crate::frontend::weather_view::WeatherView;
use crate::store::SeriesStore;
use crate::types::{Channel, Resolution};

/// Shared state accessible by all pages (borrowed, not owned).
pub struct SharedState<'a> {
    /// Sampled history
    pub store: &'a SeriesStore,

    /// Latest data published by the backend
    pub topics: &'a Topics,

    /// Window and plot settings
    pub ui_config: &'a UiConfig,

    /// World weather page state
    pub weather: &'a WeatherView,

    /// Whether the dark theme is active
    pub dark_mode: bool,

    /// Wall-clock time of this frame
    pub now: DateTime<Local>,
}

/// Which page is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Clock, live values and navigation buttons
    #[default]
    Dashboard,
    /// History plot of one channel
    Chart,
    /// Error console
    Errors,
    /// Current weather of a chosen city
    WorldWeather,
}

/// Actions that any page can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    // Navigation
    /// Return to the dashboard
    ShowDashboard,
    /// Open the history plot of a channel
    ShowChart(Channel),
    /// Open the error console
    ShowErrors,
    /// Switch the plot between short-term and long-term history
    SetResolution(Resolution),
    /// Open the world weather page
    ShowWorldWeather,

    // Appearance
    /// Switch between the light and dark theme
    ToggleDarkMode,

    // World weather
    /// Switch between Polish cities and world capitals
    ToggleRegion,
    /// Pick a city by its index in the current list
    SelectCity(usize),
    /// Look up the selected city
    CheckWeather,

    // Backend commands
    /// Empty the error log
    ClearErrors,
    /// Run a sampling cycle right away
    SampleNow,
}

/// Navigation state: current screen plus the chart selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigation {
    /// Current screen
    pub screen: Screen,
    /// Channel shown on the chart page
    pub channel: Option<Channel>,
    /// Resolution shown on the chart page
    pub resolution: Resolution,
}

impl Navigation {
    /// Apply a navigation action; returns `false` for non-navigation actions
    pub fn apply(&mut self, action: AppAction) -> bool {
        match action {
            AppAction::ShowDashboard => self.screen = Screen::Dashboard,
            AppAction::ShowChart(channel) => {
                self.screen = Screen::Chart;
                self.channel = Some(channel);
                // Every chart opens on the recent history
                self.resolution = Resolution::Short;
            }
            AppAction::ShowErrors => self.screen = Screen::Errors,
            AppAction::SetResolution(resolution) => self.resolution = resolution,
            AppAction::ShowWorldWeather => self.screen = Screen::WorldWeather,
            AppAction::ClearErrors
            | AppAction::SampleNow
            | AppAction::ToggleDarkMode
            | AppAction::ToggleRegion
            | AppAction::SelectCity(_)
            | AppAction::CheckWeather => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_defaults_to_dashboard() {
        let nav = Navigation::default();
        assert_eq!(nav.screen, Screen::Dashboard);
        assert_eq!(nav.channel, None);
    }

    #[test]
    fn test_open_chart_resets_resolution() {
        let mut nav = Navigation::default();
        assert!(nav.apply(AppAction::ShowChart(Channel::Humidity)));
        assert!(nav.apply(AppAction::SetResolution(Resolution::Long)));
        assert_eq!(nav.resolution, Resolution::Long);

        nav.apply(AppAction::ShowDashboard);
        nav.apply(AppAction::ShowChart(Channel::Pressure));
        assert_eq!(nav.screen, Screen::Chart);
        assert_eq!(nav.channel, Some(Channel::Pressure));
        assert_eq!(nav.resolution, Resolution::Short);
    }

    #[test]
    fn test_backend_actions_are_not_navigation() {
        let mut nav = Navigation::default();
        nav.apply(AppAction::ShowErrors);
        assert!(!nav.apply(AppAction::ClearErrors));
        assert!(!nav.apply(AppAction::SampleNow));
        assert_eq!(nav.screen, Screen::Errors);
    }

    #[test]
    fn test_world_weather_navigation() {
        let mut nav = Navigation::default();
        assert!(nav.apply(AppAction::ShowWorldWeather));
        assert_eq!(nav.screen, Screen::WorldWeather);

        assert!(!nav.apply(AppAction::ToggleRegion));
        assert!(!nav.apply(AppAction::SelectCity(3)));
        assert!(!nav.apply(AppAction::CheckWeather));
        assert!(!nav.apply(AppAction::ToggleDarkMode));
        assert_eq!(nav.screen, Screen::WorldWeather);
    }
}
