//! World weather page - current conditions of a chosen city
//!
//! The region button switches between Polish cities and world capitals. A
//! failed lookup replaces the description with the reason, and the four
//! readings stay empty.

use egui::{Color32, Context};

use super::{big_text, Page};
use crate::frontend::state::{AppAction, Navigation, SharedState};
use crate::frontend::weather_view::WeatherStatus;

const DESCRIPTION_COLOR: Color32 = Color32::from_rgb(0x3a, 0xa1, 0x1b);

/// Current weather page
pub struct WorldWeatherPage;

/// Line under the "Check Weather!" button
pub fn status_text(status: &WeatherStatus) -> String {
    match status {
        WeatherStatus::Idle => String::new(),
        WeatherStatus::Loading(city) => format!("Checking {}...", city),
        WeatherStatus::Ready(report) => report.description.clone(),
        WeatherStatus::Failed { message, .. } => message.clone(),
    }
}

/// Label and value of the four readings; values are empty unless a report is shown
pub fn reading_rows(status: &WeatherStatus) -> [(&'static str, String); 4] {
    match status {
        WeatherStatus::Ready(report) => [
            ("Temperature", report.temperature_text()),
            ("Wind speed", report.wind_text()),
            ("Pressure", report.pressure_text()),
            ("Humidity", report.humidity_text()),
        ],
        _ => [
            ("Temperature", String::new()),
            ("Wind speed", String::new()),
            ("Pressure", String::new()),
            ("Humidity", String::new()),
        ],
    }
}

impl Page for WorldWeatherPage {
    fn render(_nav: &Navigation, shared: &SharedState<'_>, ctx: &Context) -> Vec<AppAction> {
        let mut actions = Vec::new();
        let view = shared.weather;

        egui::TopBottomPanel::top("world_weather_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(big_text("Main menu", 22.0)).clicked() {
                    actions.push(AppAction::ShowDashboard);
                }
                ui.separator();
                ui.label(big_text("World weather", 26.0).strong());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(big_text("Select city name:", 40.0).strong());
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                let region = egui::Button::new(big_text(view.region.label(), 22.0));
                if ui.add_sized([140.0, 48.0], region).clicked() {
                    actions.push(AppAction::ToggleRegion);
                }

                let mut selected = view.city_index;
                egui::ComboBox::from_id_salt("city_list")
                    .width(ui.available_width() * 0.8)
                    .selected_text(big_text(view.selected_city(), 22.0))
                    .show_ui(ui, |ui| {
                        for (i, city) in view.cities().iter().enumerate() {
                            ui.selectable_value(&mut selected, i, big_text(*city, 20.0));
                        }
                    });
                if selected != view.city_index {
                    actions.push(AppAction::SelectCity(selected));
                }
            });

            ui.add_space(12.0);
            ui.vertical_centered_justified(|ui| {
                let button = egui::Button::new(big_text("Check Weather!", 30.0))
                    .min_size(egui::vec2(0.0, 70.0));
                let check = ui.add_enabled(!view.is_loading(), button);
                if check.clicked() {
                    actions.push(AppAction::CheckWeather);
                }
            });

            ui.add_space(16.0);
            let text = status_text(&view.status);
            if !text.is_empty() {
                ui.label(big_text(text, 32.0).strong().color(DESCRIPTION_COLOR));
            }

            ui.add_space(16.0);
            egui::Grid::new("weather_readings")
                .num_columns(4)
                .spacing([48.0, 12.0])
                .show(ui, |ui| {
                    let rows = reading_rows(&view.status);
                    for (label, _) in &rows {
                        ui.label(big_text(*label, 24.0).strong());
                    }
                    ui.end_row();
                    for (_, value) in rows {
                        ui.label(big_text(value, 24.0));
                    }
                    ui.end_row();
                });
        });

        actions
    }
}
