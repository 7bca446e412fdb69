//! Chart page - history plot of one channel
//!
//! The 1H / 12H buttons switch between the short-term and the long-term
//! buffers of the selected channel. "Sample now" runs a cycle right away
//! instead of waiting for the next period.

use egui::Context;

use super::{big_text, Page};
use crate::frontend::plot::render_history;
use crate::frontend::state::{AppAction, Navigation, SharedState};
use crate::types::Resolution;

/// History plot page
pub struct ChartPage;

impl Page for ChartPage {
    fn render(nav: &Navigation, shared: &SharedState<'_>, ctx: &Context) -> Vec<AppAction> {
        let mut actions = Vec::new();

        let Some(channel) = nav.channel else {
            // Nothing selected; fall back to the dashboard
            actions.push(AppAction::ShowDashboard);
            return actions;
        };

        egui::TopBottomPanel::top("chart_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(big_text("Back", 22.0)).clicked() {
                    actions.push(AppAction::ShowDashboard);
                }
                ui.separator();
                ui.label(big_text(channel.display_name(), 26.0).strong());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(big_text("Sample now", 22.0)).clicked() {
                        actions.push(AppAction::SampleNow);
                    }
                    ui.separator();
                    for resolution in Resolution::ALL.into_iter().rev() {
                        let selected = nav.resolution == resolution;
                        if ui
                            .selectable_label(selected, big_text(resolution.label(), 22.0))
                            .clicked()
                            && !selected
                        {
                            actions.push(AppAction::SetResolution(resolution));
                        }
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let snapshot = shared.store.snapshot(channel, nav.resolution);
            if snapshot.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label(big_text("No samples yet", 22.0));
                });
            } else {
                render_history(ui, channel, &snapshot, shared.ui_config.line_width);
            }
        });

        actions
    }
}
