use anyhow::{anyhow, Context, Result};
use image::ImageEncoder;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

use crate::radar::RadarProjection;
use crate::scene::{CategoryTicks, DrawCommand, FigureScene, PanelScene};
use crate::RenderOptions;

/// Execute a figure scene onto a bitmap buffer and encode it as PNG.
///
/// Pixel geometry: the canvas is cut into the scene's grid and each panel
/// is drawn into the rectangle covered by its span. The renderer never
/// re-checks span validity; the grid already did.
pub fn render_figure(scene: &FigureScene, options: &RenderOptions) -> Result<Vec<u8>> {
    let (width, height) = (options.width, options.height);
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let cell_w = width / scene.ncol.max(1) as u32;
        let cell_h = height / scene.nrow.max(1) as u32;

        for panel in &scene.panels {
            let span = panel.span;
            let x0 = (span.col_start as u32 * cell_w) as i32;
            let y0 = (span.row_start as u32 * cell_h) as i32;
            let w = ((span.col_end - span.col_start + 1) as u32 * cell_w) as i32;
            let h = ((span.row_end - span.row_start + 1) as u32 * cell_h) as i32;

            let area = root.clone().shrink((x0, y0), (w, h));
            draw_panel(&area, panel).with_context(|| {
                format!(
                    "Failed to draw panel at ({},{})",
                    span.row_start, span.col_start
                )
            })?;
        }

        root.present().context("Failed to present drawing")?;
    }

    encode_png(&buffer, width, height)
}

fn draw_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, panel: &PanelScene) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (x_range, y_range) = panel_ranges(panel);

    let caption = panel.title.as_deref().unwrap_or("").replace('\n', " ");

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .caption(&caption, ("sans-serif", panel.title_size as i32));
    if !panel.hide_chrome {
        builder.x_label_area_size(40).y_label_area_size(50);
    }
    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| anyhow!("Failed to build chart: {}", e))?;

    // The formatter must outlive the mesh configuration below.
    let tick_formatter = panel.ticks.clone().map(|ticks| {
        let count = ticks.positions.len();
        (count, move |x: &f64| tick_label(&ticks, *x))
    });

    if !panel.hide_chrome {
        let mut mesh = chart.configure_mesh();
        if let Some((count, formatter)) = &tick_formatter {
            mesh.x_labels(*count).x_label_formatter(formatter);
        }
        if let Some(x_label) = &panel.x_label {
            mesh.x_desc(x_label.replace('\n', " "));
        }
        if let Some(y_label) = &panel.y_label {
            mesh.y_desc(y_label.replace('\n', " "));
        }
        mesh.axis_desc_style(("sans-serif", 16))
            .draw()
            .map_err(|e| anyhow!("Failed to draw mesh: {}", e))?;
    }

    let mut has_legend = false;
    for command in &panel.commands {
        match command {
            DrawCommand::Bars {
                positions,
                baselines,
                heights,
                style,
                legend,
            } => {
                let shaded = parse_color(&style.color).mix(style.alpha.unwrap_or(1.0));
                let bar_width = style.width.unwrap_or(0.8);
                let rects: Vec<Rectangle<(f64, f64)>> = positions
                    .iter()
                    .zip(baselines.iter().zip(heights.iter()))
                    .map(|(&x, (&base, &magnitude))| {
                        Rectangle::new(
                            [
                                (x - bar_width / 2.0, base),
                                (x + bar_width / 2.0, base + magnitude),
                            ],
                            shaded.filled(),
                        )
                    })
                    .collect();
                let series = chart
                    .draw_series(rects)
                    .map_err(|e| anyhow!("Failed to draw bar series: {}", e))?;
                if let Some(label) = legend {
                    has_legend = true;
                    series.label(label.as_str()).legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], shaded.filled())
                    });
                }
            }
            DrawCommand::Line {
                points,
                style,
                legend,
            } => {
                let shaded = parse_color(&style.color).mix(style.alpha.unwrap_or(1.0));
                let stroke = shaded.stroke_width(style.width.unwrap_or(1.0) as u32);
                let series = chart
                    .draw_series(LineSeries::new(points.clone(), stroke))
                    .map_err(|e| anyhow!("Failed to draw line series: {}", e))?;
                if let Some(label) = legend {
                    has_legend = true;
                    series.label(label.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 10, y)], stroke)
                    });
                }
            }
            DrawCommand::Points {
                points,
                style,
                legend,
            } => {
                let shaded = parse_color(&style.color).mix(style.alpha.unwrap_or(1.0));
                let size = style.size.unwrap_or(3.0) as i32;
                let series = chart
                    .draw_series(
                        points
                            .iter()
                            .map(|&(x, y)| Circle::new((x, y), size, shaded.filled())),
                    )
                    .map_err(|e| anyhow!("Failed to draw point series: {}", e))?;
                if let Some(label) = legend {
                    has_legend = true;
                    series
                        .label(label.as_str())
                        .legend(move |(x, y)| Circle::new((x + 5, y), 4, shaded.filled()));
                }
            }
            DrawCommand::Polygon {
                points,
                style,
                legend,
            } => {
                let shaded = parse_color(&style.color).mix(style.alpha.unwrap_or(1.0));
                let series = chart
                    .draw_series(std::iter::once(Polygon::new(
                        points.clone(),
                        shaded.filled(),
                    )))
                    .map_err(|e| anyhow!("Failed to draw polygon: {}", e))?;
                if let Some(label) = legend {
                    has_legend = true;
                    series.label(label.as_str()).legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], shaded.filled())
                    });
                }
            }
        }
    }

    if !panel.spoke_labels.is_empty() {
        draw_spoke_labels(&mut chart, panel)?;
    }

    if has_legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| anyhow!("Failed to draw legend: {}", e))?;
    }

    Ok(())
}

fn draw_spoke_labels<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    panel: &PanelScene,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let projection = RadarProjection::new(panel.spoke_labels.len());
    let radius = panel
        .commands
        .iter()
        .flat_map(command_points)
        .flat_map(|(x, y)| [x.abs(), y.abs()])
        .fold(1.0_f64, f64::max);

    for (spoke, label) in panel.spoke_labels.iter().enumerate() {
        let (x, y) = projection.project(spoke, radius * 1.05);
        chart
            .draw_series(std::iter::once(Text::new(
                label.replace('\n', " "),
                (x, y),
                ("sans-serif", 11),
            )))
            .map_err(|e| anyhow!("Failed to draw spoke label: {}", e))?;
    }
    Ok(())
}

/// Data ranges for one panel, padded the same way for every panel kind.
/// Bar panels are pinned to include zero so stacked baselines read true.
fn panel_ranges(panel: &PanelScene) -> (Range<f64>, Range<f64>) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    let mut has_bars = false;

    for command in &panel.commands {
        if let DrawCommand::Bars { .. } = command {
            has_bars = true;
        }
        for (x, y) in command_points(command) {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    if let Some(ticks) = &panel.ticks {
        for &pos in &ticks.positions {
            x_min = x_min.min(pos);
            x_max = x_max.max(pos);
        }
    }

    if has_bars {
        y_min = y_min.min(0.0);
        y_max = y_max.max(0.0);
    }

    if !x_min.is_finite() {
        x_min = 0.0;
        x_max = 1.0;
    }
    if !y_min.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }

    (pad_range(x_min, x_max), pad_range(y_min, y_max))
}

/// Every data-space point a command touches, bar corners included.
fn command_points(command: &DrawCommand) -> Vec<(f64, f64)> {
    match command {
        DrawCommand::Bars {
            positions,
            baselines,
            heights,
            style,
            ..
        } => {
            let half = style.width.unwrap_or(0.8) / 2.0;
            positions
                .iter()
                .zip(baselines.iter().zip(heights.iter()))
                .flat_map(|(&x, (&base, &magnitude))| {
                    [(x - half, base), (x + half, base + magnitude)]
                })
                .collect()
        }
        DrawCommand::Line { points, .. }
        | DrawCommand::Points { points, .. }
        | DrawCommand::Polygon { points, .. } => points.clone(),
    }
}

fn pad_range(min: f64, max: f64) -> Range<f64> {
    if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding)..(max + padding)
    }
}

/// Label for the tick nearest to a mesh coordinate.
fn tick_label(ticks: &CategoryTicks, x: f64) -> String {
    let rounded = x.round();
    ticks
        .positions
        .iter()
        .position(|&pos| (pos - rounded).abs() < 0.25)
        .map(|idx| ticks.labels[idx].clone())
        .unwrap_or_default()
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }
    Ok(png_bytes)
}

/// Parse color string to RGBColor
fn parse_color(color_str: &Option<String>) -> RGBColor {
    match color_str.as_deref() {
        Some("red") => RED,
        Some("green") => GREEN,
        Some("blue") => BLUE,
        Some("black") => BLACK,
        Some("yellow") => YELLOW,
        Some("cyan") => CYAN,
        Some("magenta") => MAGENTA,
        Some("white") => WHITE,
        _ => BLUE, // default
    }
}
