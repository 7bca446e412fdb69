//! History plot rendering with egui_plot
//!
//! The x axis is the numeric time reference of each sample. Grid marks sit
//! exactly on the sample references and are labelled with the sample's
//! "HH:MM" label, so the axis reads as wall-clock time.

use egui::{Color32, Ui};
use egui_plot::{GridMark, Line, Plot, PlotPoints};

use crate::store::Snapshot;
use crate::types::Channel;

/// Fallback spacing between marks when there are fewer than two samples
const SINGLE_MARK_STEP: f64 = 1e-8;

/// Smallest gap between consecutive references
fn min_spacing(refs: &[f64]) -> Option<f64> {
    refs.windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|gap| *gap > 0.0)
        .reduce(f64::min)
}

/// One grid mark per sample reference
pub fn time_grid_marks(refs: &[f64]) -> Vec<GridMark> {
    let step = min_spacing(refs).unwrap_or(SINGLE_MARK_STEP);
    refs.iter()
        .map(|&value| GridMark {
            value,
            step_size: step,
        })
        .collect()
}

/// Label of the sample whose reference is at `value`, or empty
pub fn time_label(value: f64, refs: &[f64], labels: &[String]) -> String {
    let tolerance = min_spacing(refs).unwrap_or(SINGLE_MARK_STEP) / 4.0;
    refs.iter()
        .position(|r| (r - value).abs() <= tolerance)
        .and_then(|i| labels.get(i))
        .cloned()
        .unwrap_or_default()
}

/// Render the history of one channel
pub fn render_history(ui: &mut Ui, channel: Channel, snapshot: &Snapshot, line_width: f32) {
    let [r, g, b, a] = channel.color();
    let color = Color32::from_rgba_unmultiplied(r, g, b, a);

    let refs = snapshot.time_refs.clone();
    let labels = snapshot.labels.clone();
    let grid_refs = refs.clone();

    Plot::new(("history_plot", channel.key()))
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_axes(true)
        .show_grid(true)
        .x_axis_label("Time")
        .y_axis_label(channel.axis_label())
        .x_grid_spacer(move |_grid_input| time_grid_marks(&grid_refs))
        .x_axis_formatter(move |mark, _range| time_label(mark.value, &refs, &labels))
        .show(ui, |plot_ui| {
            let line = Line::new(channel.display_name(), PlotPoints::from(snapshot.plot_points()))
                .color(color)
                .width(line_width);
            plot_ui.line(line);
        });
}
