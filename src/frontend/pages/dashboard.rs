//! Dashboard page - clock, live values, navigation
//!
//! The dashboard shows the current time and date, one button per channel
//! with its latest live value, a button opening the world weather page, the
//! error console button and the theme switch.

use egui::{Context, Ui, Vec2};

use super::{big_text, Page};
use crate::frontend::state::{AppAction, Navigation, SharedState};
use crate::types::{Channel, LiveReadings};

const BUTTON_SIZE: Vec2 = Vec2::new(300.0, 110.0);

/// Main kiosk page
pub struct DashboardPage;

/// Text on a channel button
pub fn channel_button_text(channel: Channel, live: Option<&LiveReadings>) -> String {
    let value = live
        .map(|l| l.label(channel))
        .unwrap_or_else(|| "--".to_string());
    format!("{}\n{}", channel.display_name(), value)
}

/// Text on the theme button; names the theme it switches to
pub fn theme_button_text(dark_mode: bool) -> &'static str {
    if dark_mode {
        "Light mode"
    } else {
        "Dark mode"
    }
}

/// Text on the error console button
pub fn error_button_text(error_count: usize) -> String {
    if error_count == 0 {
        "Errors".to_string()
    } else {
        format!("Errors ({})", error_count)
    }
}

fn channel_button(ui: &mut Ui, channel: Channel, shared: &SharedState<'_>) -> bool {
    let text = channel_button_text(channel, shared.topics.live.as_ref());
    ui.add_sized(BUTTON_SIZE, egui::Button::new(big_text(text, 24.0)))
        .clicked()
}

impl Page for DashboardPage {
    fn render(_nav: &Navigation, shared: &SharedState<'_>, ctx: &Context) -> Vec<AppAction> {
        let mut actions = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(big_text(shared.now.format("%H:%M").to_string(), 64.0).strong());
                ui.label(big_text(shared.now.format("%A, %d %B %Y").to_string(), 22.0));
            });

            ui.add_space(16.0);

            egui::Grid::new("channel_buttons")
                .num_columns(3)
                .spacing([16.0, 16.0])
                .show(ui, |ui| {
                    for (i, channel) in Channel::ALL.into_iter().enumerate() {
                        if channel_button(ui, channel, shared) {
                            actions.push(AppAction::ShowChart(channel));
                        }
                        if i % 3 == 2 {
                            ui.end_row();
                        }
                    }

                    let world = egui::Button::new(big_text("World weather", 24.0));
                    if ui.add_sized(BUTTON_SIZE, world).clicked() {
                        actions.push(AppAction::ShowWorldWeather);
                    }
                    ui.end_row();

                    let error_count = shared.store.error_count();
                    let text = big_text(error_button_text(error_count), 24.0);
                    let text = if error_count > 0 {
                        text.color(egui::Color32::LIGHT_RED)
                    } else {
                        text
                    };
                    if ui
                        .add_sized(BUTTON_SIZE, egui::Button::new(text))
                        .clicked()
                    {
                        actions.push(AppAction::ShowErrors);
                    }

                    let theme = big_text(theme_button_text(shared.dark_mode), 24.0);
                    if ui
                        .add_sized(BUTTON_SIZE, egui::Button::new(theme))
                        .clicked()
                    {
                        actions.push(AppAction::ToggleDarkMode);
                    }
                    ui.end_row();
                });
        });

        actions
    }
}
