//! Error console page
//!
//! Lists every discarded sampling cycle, oldest first, with a button that
//! clears the whole log.

use egui::Context;

use super::{big_text, Page};
use crate::frontend::state::{AppAction, Navigation, SharedState};
use crate::store::ErrorRecord;

/// Text shown when the log is empty
pub const NO_ERRORS_TEXT: &str = "No errors detected";

/// Error console page
pub struct ErrorConsolePage;

/// Lines shown in the console, one entry per record
pub fn console_entries(records: &[ErrorRecord]) -> Vec<String> {
    if records.is_empty() {
        vec![NO_ERRORS_TEXT.to_string()]
    } else {
        records.iter().map(|r| r.to_string()).collect()
    }
}

impl Page for ErrorConsolePage {
    fn render(_nav: &Navigation, shared: &SharedState<'_>, ctx: &Context) -> Vec<AppAction> {
        let mut actions = Vec::new();
        let records = shared.store.errors();

        egui::TopBottomPanel::top("errors_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(big_text("Back", 22.0)).clicked() {
                    actions.push(AppAction::ShowDashboard);
                }
                ui.separator();
                ui.label(big_text("Error console", 26.0).strong());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let clear = ui.add_enabled(
                        !records.is_empty(),
                        egui::Button::new(big_text("Clear", 22.0)),
                    );
                    if clear.clicked() {
                        actions.push(AppAction::ClearErrors);
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for entry in console_entries(&records) {
                        ui.label(big_text(entry, 18.0));
                        ui.separator();
                    }
                });
        });

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_empty_console() {
        assert_eq!(console_entries(&[]), vec![NO_ERRORS_TEXT.to_string()]);
    }

    #[test]
    fn test_console_lists_messages_in_order() {
        let at = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let records = vec![
            ErrorRecord::sampling_failure(at, "NoSensorFound"),
            ErrorRecord::sampling_failure(at, "Timeout"),
        ];
        let entries = console_entries(&records);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].starts_with("At 2024-01-02 03:04 NoSensorFound"));
        assert!(entries[1].contains("Timeout occurred"));
    }
}
