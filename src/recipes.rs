use std::collections::HashMap;

use crate::aggregate::{aggregate, aggregate_many, Reduction};
use crate::compose::{
    apply_category_axis, hide_axes, range_series, stacked_bars, title_banner, RangeStyle,
};
use crate::data::{category_ids, category_names, numeric_cell, AutoData};
use crate::error::ChartError;
use crate::grid::{GridSpec, Span};
use crate::palette::ColorCycle;
use crate::radar::RadarProjection;
use crate::scene::{DrawCommand, LineStyle, PanelScene, PointStyle, PolygonStyle};

const TITLE_SIZE: u32 = 20;
const SUBPANEL_TITLE_SIZE: u32 = 13;
const SCATTER_MARKER_SIZE: f64 = 12.0;
const SCATTER_ALPHA: f64 = 0.4;
const RANGE_LINE_WIDTH: f64 = 4.0;
const STACK_BAR_WIDTH: f64 = 0.5;
const COMBINED_BAR_WIDTH: f64 = 0.8;

/// Radar summary: a bare title banner across the top row, then one radar
/// sub-panel per category on the remaining cells. Every numeric column
/// becomes a spoke; min/mean/max rings are overlaid per category, drawn
/// max first and min last with rising alpha so the smallest ring stays
/// most visible.
pub fn make_radar_summary(
    grid: &mut GridSpec,
    data: &AutoData,
    category_key: &str,
    palette: &ColorCycle,
) -> Result<(PanelScene, Vec<PanelScene>), ChartError> {
    let columns = data.numeric_columns(category_key)?;
    let names = category_names(data, category_key)?;
    let (_, ncol) = grid.geometry();

    let mins = aggregate_many(data, category_key, &columns, Reduction::Min)?;
    let means = aggregate_many(data, category_key, &columns, Reduction::Mean)?;
    let maxs = aggregate_many(data, category_key, &columns, Reduction::Max)?;

    let title = format!(
        "Radar Plot on {} Dimensions\nFor {} Manufacturers",
        columns.len(),
        names.len()
    );
    let banner = title_banner(grid, Span::row(0, ncol), &title, TITLE_SIZE)?;

    let projection = RadarProjection::new(columns.len());
    let spoke_labels: Vec<String> = columns.iter().map(|c| c.replace(' ', "\n")).collect();

    let mut panels = Vec::with_capacity(names.len());
    for (cat, name) in names.iter().enumerate() {
        let row = 1 + cat / ncol;
        let col = cat % ncol;
        let span = grid.allocate(Span::cell(row, col))?;

        let mut panel = PanelScene::new(span);
        panel.title = Some(title_case(name));
        panel.title_size = SUBPANEL_TITLE_SIZE;
        panel.spoke_labels = spoke_labels.clone();
        hide_axes(&mut panel);

        let rings = [
            (&maxs, palette.get(1), 0.2),
            (&means, palette.get(2), 0.3),
            (&mins, palette.get(0), 0.4),
        ];
        for (series, color, alpha) in rings {
            let values: Vec<f64> = series.iter().map(|s| s.values[cat]).collect();
            let ring = projection.ring(&values);
            panel.commands.push(DrawCommand::Polygon {
                points: ring.clone(),
                style: PolygonStyle {
                    color: Some(color.clone()),
                    alpha: Some(alpha),
                },
                legend: None,
            });
            panel.commands.push(DrawCommand::Line {
                points: ring,
                style: LineStyle {
                    color: Some(color),
                    width: None,
                    alpha: None,
                },
                legend: None,
            });
        }
        panels.push(panel);
    }

    Ok((banner, panels))
}

/// City/highway efficiency scatter. The only recipe that bypasses the
/// aggregator: every row contributes a raw point at its category's id,
/// so the spread within each make stays visible. Cells that fail to
/// parse are skipped, consistent with the aggregation policy.
pub fn make_efficiency_scatter(
    grid: &mut GridSpec,
    span: Span,
    data: &AutoData,
    category_key: &str,
    city_key: &str,
    highway_key: &str,
    palette: &ColorCycle,
) -> Result<PanelScene, ChartError> {
    let names = category_names(data, category_key)?;
    let ids = category_ids(data, category_key)?;
    let cat_idx = data.column_index(category_key)?;
    let id_of: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(id, name)| (name.as_str(), id))
        .collect();

    let span = grid.allocate(span)?;
    let mut panel = PanelScene::new(span);
    panel.title = Some("Ranges of City and Highway MPG".to_string());
    panel.title_size = TITLE_SIZE;

    let highway = raw_points(data, cat_idx, &id_of, data.column_index(highway_key)?);
    let city = raw_points(data, cat_idx, &id_of, data.column_index(city_key)?);

    // Highway under city, as in the reference chart.
    for (points, color, label) in [
        (highway, palette.get(3), "Highway"),
        (city, palette.get(0), "City"),
    ] {
        panel.commands.push(DrawCommand::Points {
            points,
            style: PointStyle {
                color: Some(color),
                size: Some(SCATTER_MARKER_SIZE),
                alpha: Some(SCATTER_ALPHA),
            },
            legend: Some(label.to_string()),
        });
    }

    let labels: Vec<String> = names.iter().map(|n| title_case(n)).collect();
    apply_category_axis(&mut panel, &ids, &labels, "Make", "MPG", false);
    Ok(panel)
}

/// Price ranges as three thick, semi-transparent lines over the category
/// axis, with one blank tick slot padding each side.
pub fn make_price_lines(
    grid: &mut GridSpec,
    span: Span,
    data: &AutoData,
    category_key: &str,
    value_key: &str,
    palette: &ColorCycle,
) -> Result<PanelScene, ChartError> {
    let names = category_names(data, category_key)?;
    let ids = category_ids(data, category_key)?;
    let min = aggregate(data, category_key, value_key, Reduction::Min)?;
    let mean = aggregate(data, category_key, value_key, Reduction::Mean)?;
    let max = aggregate(data, category_key, value_key, Reduction::Max)?;

    let span = grid.allocate(span)?;
    let mut panel = PanelScene::new(span);
    panel.title = Some("Auto Price Ranges".to_string());
    panel.title_size = TITLE_SIZE;

    range_series(
        &mut panel,
        &ids,
        &min.values,
        &mean.values,
        &max.values,
        [palette.get(2), palette.get(3), palette.get(4)],
        ["Low", "Mean", "High"],
        RangeStyle::Line {
            width: RANGE_LINE_WIDTH,
        },
    );

    let labels: Vec<String> = names.iter().map(|n| title_case(n)).collect();
    apply_category_axis(&mut panel, &ids, &labels, "Make", &title_case(value_key), true);
    Ok(panel)
}

/// Min/mean/max of one column as display-stacked bars. Instantiated for
/// riskiness and losses with different titles, not copied per column.
pub fn make_stacked_range(
    grid: &mut GridSpec,
    span: Span,
    data: &AutoData,
    category_key: &str,
    value_key: &str,
    title: &str,
    y_label: &str,
    palette: &ColorCycle,
) -> Result<PanelScene, ChartError> {
    let names = category_names(data, category_key)?;
    let ids = category_ids(data, category_key)?;
    let min = aggregate(data, category_key, value_key, Reduction::Min)?;
    let mean = aggregate(data, category_key, value_key, Reduction::Mean)?;
    let max = aggregate(data, category_key, value_key, Reduction::Max)?;

    let span = grid.allocate(span)?;
    let mut panel = PanelScene::new(span);
    panel.title = Some(title.to_string());
    panel.title_size = TITLE_SIZE;

    stacked_bars(
        &mut panel,
        &ids,
        &min.values,
        &mean.values,
        &max.values,
        [palette.get(0), palette.get(3), palette.get(2)],
        STACK_BAR_WIDTH,
    );

    let labels: Vec<String> = names.iter().map(|n| title_case(n)).collect();
    apply_category_axis(&mut panel, &ids, &labels, "Make", y_label, false);
    Ok(panel)
}

/// Two columns summed attribute-wise per category, then display-stacked.
/// The sums happen before stacking: the base layer is min1+min2, not a
/// stack of the two columns' own layers.
pub fn make_combined_stack(
    grid: &mut GridSpec,
    span: Span,
    data: &AutoData,
    category_key: &str,
    first_key: &str,
    second_key: &str,
    title: &str,
    y_label: &str,
    palette: &ColorCycle,
) -> Result<PanelScene, ChartError> {
    let names = category_names(data, category_key)?;
    let ids = category_ids(data, category_key)?;

    let sum_of = |reduction: Reduction| -> Result<Vec<f64>, ChartError> {
        let first = aggregate(data, category_key, first_key, reduction)?;
        let second = aggregate(data, category_key, second_key, reduction)?;
        Ok(first
            .values
            .iter()
            .zip(&second.values)
            .map(|(a, b)| a + b)
            .collect())
    };
    let mins = sum_of(Reduction::Min)?;
    let means = sum_of(Reduction::Mean)?;
    let maxs = sum_of(Reduction::Max)?;

    let span = grid.allocate(span)?;
    let mut panel = PanelScene::new(span);
    panel.title = Some(title.to_string());
    panel.title_size = TITLE_SIZE;

    stacked_bars(
        &mut panel,
        &ids,
        &mins,
        &means,
        &maxs,
        [palette.get(0), palette.get(3), palette.get(2)],
        COMBINED_BAR_WIDTH,
    );

    let labels: Vec<String> = names.iter().map(|n| title_case(n)).collect();
    apply_category_axis(&mut panel, &ids, &labels, "Make", y_label, false);
    Ok(panel)
}

/// A titled region with nothing drawn in it. Default panel for slots the
/// caller has not assigned yet.
pub fn make_empty(grid: &mut GridSpec, span: Span, title: &str) -> Result<PanelScene, ChartError> {
    let span = grid.allocate(span)?;
    let mut panel = PanelScene::new(span);
    panel.title = Some(title.to_string());
    panel.title_size = TITLE_SIZE;
    Ok(panel)
}

fn raw_points(
    data: &AutoData,
    cat_idx: usize,
    id_of: &HashMap<&str, usize>,
    value_idx: usize,
) -> Vec<(f64, f64)> {
    data.rows
        .iter()
        .filter_map(|row| {
            let id = id_of.get(row[cat_idx].as_str())?;
            let value = numeric_cell(&row[value_idx])?;
            Some((*id as f64, value))
        })
        .collect()
}

/// Uppercase the first letter of each whitespace-separated word.
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
