use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use autodash::data::{category_names, AutoData};
use autodash::grid::{GridSpec, Span};
use autodash::palette::ColorCycle;
use autodash::recipes;
use autodash::render::render_figure;
use autodash::scene::FigureScene;
use autodash::RenderOptions;

const RADAR_COLS: usize = 4;

#[derive(Parser, Debug)]
#[command(name = "autodash")]
#[command(about = "Render comparative automobile charts from CSV data", long_about = None)]
struct Args {
    /// Path to the automobile CSV (use '-' for stdin)
    input: String,

    /// Directory the PNG files are written to
    #[arg(short, long, default_value = "target/plots")]
    out: PathBuf,

    /// Category column used for grouping
    #[arg(long, default_value = "make")]
    category: String,

    /// Figure width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let data = if args.input == "-" {
        AutoData::from_csv_reader(io::stdin().lock()).context("Failed to read CSV from stdin")?
    } else {
        let file = fs::File::open(&args.input)
            .with_context(|| format!("Failed to open '{}'", args.input))?;
        AutoData::from_csv_reader(file)
            .with_context(|| format!("Failed to read CSV from '{}'", args.input))?
    };

    fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create output directory '{}'", args.out.display()))?;

    let palette = ColorCycle::classic();
    let options = RenderOptions {
        width: args.width,
        height: args.height,
        ..RenderOptions::default()
    };

    render_radar(&args, &data, &palette, &args.out)?;
    render_panels(&args, &data, &palette, &options, &args.out)?;

    println!("Saved charts to {}", args.out.display());
    Ok(())
}

fn render_radar(args: &Args, data: &AutoData, palette: &ColorCycle, out: &Path) -> Result<()> {
    let names = category_names(data, &args.category)?;
    let nrow = 1 + (names.len() as f64 / RADAR_COLS as f64).ceil() as usize;
    let mut grid = GridSpec::new(nrow, RADAR_COLS);

    let (banner, panels) = recipes::make_radar_summary(&mut grid, data, &args.category, palette)
        .context("Failed to compose radar summary")?;

    let mut scene = FigureScene::new(nrow, RADAR_COLS);
    scene.panels.push(banner);
    scene.panels.extend(panels);

    // One cell row of height keeps the sub-panels roughly square.
    let options = RenderOptions {
        width: args.width,
        height: (args.width / RADAR_COLS as u32) * nrow as u32,
        ..RenderOptions::default()
    };
    write_png(out.join("radar.png"), &scene, &options)
}

fn render_panels(
    args: &Args,
    data: &AutoData,
    palette: &ColorCycle,
    options: &RenderOptions,
    out: &Path,
) -> Result<()> {
    let category = args.category.as_str();

    let mut grid = GridSpec::new(1, 1);
    let panel = recipes::make_efficiency_scatter(
        &mut grid,
        Span::cell(0, 0),
        data,
        category,
        "city mpg",
        "highway mpg",
        palette,
    )
    .context("Failed to compose MPG scatter")?;
    write_png(out.join("mpg.png"), &single_panel_scene(panel), options)?;

    let mut grid = GridSpec::new(1, 1);
    let panel = recipes::make_price_lines(&mut grid, Span::cell(0, 0), data, category, "price", palette)
        .context("Failed to compose price lines")?;
    write_png(out.join("price.png"), &single_panel_scene(panel), options)?;

    let mut grid = GridSpec::new(1, 1);
    let panel = recipes::make_stacked_range(
        &mut grid,
        Span::cell(0, 0),
        data,
        category,
        "riskiness",
        "Stacked Riskiness (Inverted, Normalized)",
        "Inverse Risk",
        palette,
    )
    .context("Failed to compose riskiness stack")?;
    write_png(out.join("riskiness.png"), &single_panel_scene(panel), options)?;

    let mut grid = GridSpec::new(1, 1);
    let panel = recipes::make_stacked_range(
        &mut grid,
        Span::cell(0, 0),
        data,
        category,
        "losses",
        "Stacked Losses (Inverted, Normalized)",
        "Inverse Losses",
        palette,
    )
    .context("Failed to compose losses stack")?;
    write_png(out.join("losses.png"), &single_panel_scene(panel), options)?;

    let mut grid = GridSpec::new(1, 1);
    let panel = recipes::make_combined_stack(
        &mut grid,
        Span::cell(0, 0),
        data,
        category,
        "riskiness",
        "losses",
        "Stacked Combined Losses and Riskiness Data\n(Inverted, Normalized)",
        "Inverse Losses\nand Riskiness",
        palette,
    )
    .context("Failed to compose combined stack")?;
    write_png(out.join("combined.png"), &single_panel_scene(panel), options)?;

    Ok(())
}

fn single_panel_scene(panel: autodash::scene::PanelScene) -> FigureScene {
    let mut scene = FigureScene::new(1, 1);
    scene.panels.push(panel);
    scene
}

fn write_png(path: PathBuf, scene: &FigureScene, options: &RenderOptions) -> Result<()> {
    let png_bytes = render_figure(scene, options)
        .with_context(|| format!("Failed to render '{}'", path.display()))?;
    fs::write(&path, png_bytes).with_context(|| format!("Failed to write '{}'", path.display()))?;
    Ok(())
}
