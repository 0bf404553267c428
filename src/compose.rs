use crate::error::ChartError;
use crate::grid::{GridSpec, Span};
use crate::scene::{BarStyle, CategoryTicks, DrawCommand, LineStyle, PanelScene, PointStyle};

/// How `range_series` renders its three series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeStyle {
    Scatter { size: f64 },
    Line { width: f64 },
}

const RANGE_ALPHA: f64 = 0.7;
const STACK_ALPHA: f64 = 0.7;

/// Strip every piece of visual chrome from a panel: frame, mesh, ticks.
pub fn hide_axes(panel: &mut PanelScene) {
    panel.hide_chrome = true;
}

/// Allocate a span as a bare, titled region. Used for the figure-level
/// title row above the radar sub-panels.
pub fn title_banner(
    grid: &mut GridSpec,
    span: Span,
    text: &str,
    font_size: u32,
) -> Result<PanelScene, ChartError> {
    let span = grid.allocate(span)?;
    let mut panel = PanelScene::new(span);
    panel.title = Some(text.to_string());
    panel.title_size = font_size;
    hide_axes(&mut panel);
    Ok(panel)
}

/// Draw min/mean/max as three bar series stacked for display density.
///
/// This is visual stacking, not a statistical sum: each series keeps its
/// own magnitude and is drawn at a baseline equal to the sum of the
/// magnitudes below it (min at 0, mean at min, max at min+mean).
/// Returns the indices of the three appended commands so callers can
/// refer back to the drawn series.
pub fn stacked_bars(
    panel: &mut PanelScene,
    ids: &[usize],
    mins: &[f64],
    means: &[f64],
    maxs: &[f64],
    colors: [String; 3],
    bar_width: f64,
) -> [usize; 3] {
    let positions: Vec<f64> = ids.iter().map(|&id| id as f64).collect();
    let [min_color, mean_color, max_color] = colors;

    let zero_base = vec![0.0; mins.len()];
    let mean_base: Vec<f64> = mins.to_vec();
    let max_base: Vec<f64> = mins.iter().zip(means).map(|(a, b)| a + b).collect();

    let mut handles = [0usize; 3];
    let series = [
        (mins, zero_base, min_color, "Min"),
        (means, mean_base, mean_color, "Mean"),
        (maxs, max_base, max_color, "Max"),
    ];
    for (slot, (heights, baselines, color, label)) in series.into_iter().enumerate() {
        handles[slot] = panel.commands.len();
        panel.commands.push(DrawCommand::Bars {
            positions: positions.clone(),
            baselines,
            heights: heights.to_vec(),
            style: BarStyle {
                color: Some(color),
                alpha: Some(STACK_ALPHA),
                width: Some(bar_width),
            },
            legend: Some(label.to_string()),
        });
    }
    handles
}

/// Draw min/mean/max as three unstacked series at the category positions,
/// as scatter points or lines depending on the style flag.
pub fn range_series(
    panel: &mut PanelScene,
    ids: &[usize],
    mins: &[f64],
    means: &[f64],
    maxs: &[f64],
    colors: [String; 3],
    labels: [&str; 3],
    style: RangeStyle,
) {
    let positions: Vec<f64> = ids.iter().map(|&id| id as f64).collect();
    let [min_color, mean_color, max_color] = colors;
    let [min_label, mean_label, max_label] = labels;

    let series = [
        (mins, min_color, min_label),
        (means, mean_color, mean_label),
        (maxs, max_color, max_label),
    ];
    for (values, color, label) in series {
        let points: Vec<(f64, f64)> = positions.iter().cloned().zip(values.iter().cloned()).collect();
        let command = match style {
            RangeStyle::Line { width } => DrawCommand::Line {
                points,
                style: LineStyle {
                    color: Some(color),
                    width: Some(width),
                    alpha: Some(RANGE_ALPHA),
                },
                legend: Some(label.to_string()),
            },
            RangeStyle::Scatter { size } => DrawCommand::Points {
                points,
                style: PointStyle {
                    color: Some(color),
                    size: Some(size),
                    alpha: Some(RANGE_ALPHA),
                },
                legend: Some(label.to_string()),
            },
        };
        panel.commands.push(command);
    }
}

/// Wire tick positions/labels and the two axis titles onto a panel.
/// With `pad` set, one blank slot is added before and after the id range
/// so edge categories do not sit on the panel border.
pub fn apply_category_axis(
    panel: &mut PanelScene,
    ids: &[usize],
    labels: &[String],
    x_label: &str,
    y_label: &str,
    pad: bool,
) {
    let mut positions: Vec<f64> = Vec::new();
    let mut tick_labels: Vec<String> = Vec::new();

    if pad {
        positions.push(-1.0);
        tick_labels.push(String::new());
    }
    for (&id, label) in ids.iter().zip(labels) {
        positions.push(id as f64);
        tick_labels.push(label.clone());
    }
    if pad {
        positions.push(ids.len() as f64);
        tick_labels.push(String::new());
    }

    panel.ticks = Some(CategoryTicks {
        positions,
        labels: tick_labels,
    });
    panel.x_label = Some(x_label.to_string());
    panel.y_label = Some(y_label.to_string());
}
