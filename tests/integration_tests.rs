use std::fs;

use autodash::aggregate::{aggregate, Reduction};
use autodash::data::{category_names, AutoData};
use autodash::error::ChartError;
use autodash::grid::{GridSpec, Span};
use autodash::palette::ColorCycle;
use autodash::recipes;
use autodash::render::render_figure;
use autodash::scene::FigureScene;
use autodash::RenderOptions;

/// Helper to load the automobile fixture
fn load_autos() -> AutoData {
    let csv = fs::read_to_string("test/autos.csv").expect("Failed to read test CSV");
    AutoData::from_csv_reader(csv.as_bytes()).expect("Failed to parse test CSV")
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && &bytes[0..8] == &[137, 80, 78, 71, 13, 10, 26, 10]
}

fn single_panel_scene(panel: autodash::scene::PanelScene) -> FigureScene {
    let mut scene = FigureScene::new(1, 1);
    scene.panels.push(panel);
    scene
}

#[test]
fn test_fixture_invariants_across_columns() {
    let data = load_autos();
    let names = category_names(&data, "make").unwrap();
    assert_eq!(
        names,
        vec!["alfa-romero", "audi", "bmw", "chevrolet", "dodge", "honda"]
    );

    for column in ["price", "city mpg", "highway mpg", "riskiness", "losses"] {
        let min = aggregate(&data, "make", column, Reduction::Min).unwrap();
        let mean = aggregate(&data, "make", column, Reduction::Mean).unwrap();
        let max = aggregate(&data, "make", column, Reduction::Max).unwrap();
        assert_eq!(min.len(), names.len());
        for i in 0..names.len() {
            assert!(min.values[i] <= mean.values[i], "min <= mean for {}", column);
            assert!(mean.values[i] <= max.values[i], "mean <= max for {}", column);
        }
    }
}

#[test]
fn test_end_to_end_radar_summary() {
    let data = load_autos();
    let palette = ColorCycle::classic();
    // 6 makes over 4 columns: title row plus two panel rows.
    let mut grid = GridSpec::new(3, 4);
    let (banner, panels) =
        recipes::make_radar_summary(&mut grid, &data, "make", &palette).unwrap();

    assert_eq!(panels.len(), 6);
    for panel in &panels {
        // 5 numeric columns = 5 spokes
        assert_eq!(panel.spoke_labels.len(), 5);
    }

    let mut scene = FigureScene::new(3, 4);
    scene.panels.push(banner);
    scene.panels.extend(panels);
    let png = render_figure(&scene, &RenderOptions::default()).unwrap();
    assert!(is_valid_png(&png));
}

#[test]
fn test_end_to_end_mpg_scatter() {
    let data = load_autos();
    let palette = ColorCycle::classic();
    let mut grid = GridSpec::new(1, 1);
    let panel = recipes::make_efficiency_scatter(
        &mut grid,
        Span::cell(0, 0),
        &data,
        "make",
        "city mpg",
        "highway mpg",
        &palette,
    )
    .unwrap();
    let png = render_figure(&single_panel_scene(panel), &RenderOptions::default()).unwrap();
    assert!(is_valid_png(&png));
}

#[test]
fn test_end_to_end_price_lines() {
    let data = load_autos();
    let palette = ColorCycle::classic();
    let mut grid = GridSpec::new(1, 1);
    let panel =
        recipes::make_price_lines(&mut grid, Span::cell(0, 0), &data, "make", "price", &palette)
            .unwrap();
    let png = render_figure(&single_panel_scene(panel), &RenderOptions::default()).unwrap();
    assert!(is_valid_png(&png));
}

#[test]
fn test_end_to_end_stacked_panels() {
    let data = load_autos();
    let palette = ColorCycle::classic();

    for (column, title, y_label) in [
        ("riskiness", "Stacked Riskiness (Inverted, Normalized)", "Inverse Risk"),
        ("losses", "Stacked Losses (Inverted, Normalized)", "Inverse Losses"),
    ] {
        let mut grid = GridSpec::new(1, 1);
        let panel = recipes::make_stacked_range(
            &mut grid,
            Span::cell(0, 0),
            &data,
            "make",
            column,
            title,
            y_label,
            &palette,
        )
        .unwrap();
        assert_eq!(panel.legend_labels(), vec!["Min", "Mean", "Max"]);
        let png = render_figure(&single_panel_scene(panel), &RenderOptions::default()).unwrap();
        assert!(is_valid_png(&png));
    }
}

#[test]
fn test_end_to_end_combined_stack_matches_parts() {
    let data = load_autos();
    let palette = ColorCycle::classic();
    let mut grid = GridSpec::new(1, 1);
    let panel = recipes::make_combined_stack(
        &mut grid,
        Span::cell(0, 0),
        &data,
        "make",
        "riskiness",
        "losses",
        "Stacked Combined Losses and Riskiness Data\n(Inverted, Normalized)",
        "Inverse Losses\nand Riskiness",
        &palette,
    )
    .unwrap();

    let risk = aggregate(&data, "make", "riskiness", Reduction::Min).unwrap();
    let loss = aggregate(&data, "make", "losses", Reduction::Min).unwrap();
    match &panel.commands[0] {
        autodash::scene::DrawCommand::Bars { heights, .. } => {
            for i in 0..heights.len() {
                let expected = risk.values[i] + loss.values[i];
                assert!((heights[i] - expected).abs() < 1e-9);
            }
        }
        other => panic!("expected bars, got {:?}", other),
    }

    let png = render_figure(&single_panel_scene(panel), &RenderOptions::default()).unwrap();
    assert!(is_valid_png(&png));
}

#[test]
fn test_end_to_end_empty_panel() {
    let mut grid = GridSpec::new(1, 1);
    let panel = recipes::make_empty(&mut grid, Span::cell(0, 0), "Empty Plot").unwrap();
    let png = render_figure(&single_panel_scene(panel), &RenderOptions::default()).unwrap();
    assert!(is_valid_png(&png));
}

#[test]
fn test_span_outside_grid_fails() {
    let mut grid = GridSpec::new(2, 3);
    let result = grid.allocate(Span::new(0, 0, 0, 3));
    assert!(matches!(result, Err(ChartError::Layout { .. })));
}

#[test]
fn test_missing_column_surfaces_schema_error() {
    let data = load_autos();
    let palette = ColorCycle::classic();
    let mut grid = GridSpec::new(1, 1);
    let result = recipes::make_stacked_range(
        &mut grid,
        Span::cell(0, 0),
        &data,
        "make",
        "horsepower",
        "Stacked Horsepower",
        "Horsepower",
        &palette,
    );
    assert!(matches!(result, Err(ChartError::Schema { .. })));
}
