use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridInput, GridMark, Plot};

use crate::color::bar_colors;
use crate::export::label_at;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Bar chart (central panel)
// ---------------------------------------------------------------------------

/// One x grid mark per visible bar centre, so every bar keeps its label
/// whatever the zoom level.
fn bar_grid_marks(n_bars: usize, input: GridInput) -> Vec<GridMark> {
    let (lo, hi) = input.bounds;
    (0..n_bars)
        .map(|i| i as f64)
        .filter(|&x| x >= lo && x <= hi)
        .map(|value| GridMark {
            value,
            step_size: 1.0,
        })
        .collect()
}

/// Render the integrity bar chart for the current selection.
pub fn integrity_chart(ui: &mut Ui, state: &AppState) {
    let Some(series) = state.chart_series() else {
        return;
    };
    let columns = &state.config.columns;

    let n_bars = series.len();
    let colors = bar_colors(n_bars);
    let bars: Vec<Bar> = series
        .points
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (p, color))| {
            Bar::new(i as f64, p.score)
                .name(&p.label)
                .fill(color)
                .width(0.6)
        })
        .collect();
    let labels: Vec<String> = series.points.iter().map(|p| p.label.clone()).collect();

    ui.heading(format!("{} por {}", columns.score, columns.program));
    Plot::new("integrity_chart")
        .x_axis_label(columns.program.as_str())
        .y_axis_label(columns.score.as_str())
        .x_grid_spacer(move |input| bar_grid_marks(n_bars, input))
        .x_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(columns.score.as_str()));
        });
}
