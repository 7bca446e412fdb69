//! Page modules for the frontend
//!
//! Each page implements the Page trait, receiving shared state
//! via context and returning actions instead of mutating directly.

mod chart;
mod dashboard;
mod errors;
mod world_weather;

pub use chart::ChartPage;
pub use dashboard::DashboardPage;
pub use errors::ErrorConsolePage;
pub use world_weather::WorldWeatherPage;

use crate::frontend::state::{AppAction, Navigation, SharedState};
use egui::Context;

/// Trait for page components
///
/// Pages receive shared state via `SharedState` and return actions
/// instead of mutating the main app directly.
pub trait Page {
    /// Render the page and return any actions to perform
    ///
    /// Actions are processed after the page finishes rendering.
    fn render(nav: &Navigation, shared: &SharedState<'_>, ctx: &Context) -> Vec<AppAction>;
}

/// Large touch-friendly button text
pub(crate) fn big_text(text: impl Into<String>, size: f32) -> egui::RichText {
    egui::RichText::new(text).size(size)
}
