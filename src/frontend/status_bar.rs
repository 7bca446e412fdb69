//! Status bar panel, bottom bar showing sampling health.

use egui::{Color32, RichText, Ui};

use crate::frontend::topics::{LastCycle, Topics};

/// Short description of the most recent cycle
pub fn last_cycle_text(last: Option<&LastCycle>) -> String {
    match last {
        None => "Waiting for first sample".to_string(),
        Some(LastCycle::Committed { cycle, long_term }) => {
            if *long_term {
                format!("Cycle {} stored (1H + 12H)", cycle)
            } else {
                format!("Cycle {} stored (1H)", cycle)
            }
        }
        Some(LastCycle::Discarded { kind, at }) => {
            format!("Cycle discarded at {}: {}", at.format("%H:%M"), kind)
        }
    }
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, topics: &Topics, error_count: usize) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        // === Sampling status dot ===
        let status_color = match (&topics.last_cycle, topics.backend_stopped) {
            (_, true) => Color32::GRAY,
            (Some(LastCycle::Discarded { .. }), _) => Color32::LIGHT_RED,
            (Some(LastCycle::Committed { .. }), _) => Color32::GREEN,
            (None, _) => Color32::YELLOW,
        };
        ui.colored_label(status_color, "●");
        ui.label(RichText::new(last_cycle_text(topics.last_cycle.as_ref())).small());

        ui.separator();

        let stats = &topics.stats;
        ui.label(RichText::new(format!("Stored: {}", stats.committed_cycles)).small());

        ui.separator();

        // === Success rate ===
        let rate = stats.success_rate();
        let rate_color = if rate >= 99.0 {
            Color32::from_rgb(100, 200, 100)
        } else {
            Color32::LIGHT_RED
        };
        ui.colored_label(rate_color, RichText::new(format!("{:.0}% ok", rate)).small());

        ui.separator();

        // === Error count ===
        let error_color = if error_count > 0 {
            Color32::LIGHT_RED
        } else {
            Color32::GRAY
        };
        ui.colored_label(
            error_color,
            RichText::new(format!("Errors: {}", error_count)).small(),
        );

        ui.separator();

        ui.label(RichText::new(format!("Read: {} μs", stats.last_read_time_us)).small());
    });
}
