use crate::grid::Span;

// =============================================================================
// Styles
// =============================================================================

/// Style configuration for line series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineStyle {
    pub color: Option<String>,
    pub width: Option<f64>,
    pub alpha: Option<f64>,
}

/// Style configuration for scatter series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointStyle {
    pub color: Option<String>,
    pub size: Option<f64>,
    pub alpha: Option<f64>,
}

/// Style configuration for bar series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarStyle {
    pub color: Option<String>,
    pub alpha: Option<f64>,
    pub width: Option<f64>,
}

/// Style configuration for filled polygons (radar rings)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonStyle {
    pub color: Option<String>,
    pub alpha: Option<f64>,
}

// =============================================================================
// Draw commands
// =============================================================================

/// A primitive drawing instruction. The renderer executes these blindly;
/// recipes and composer helpers only ever append commands, so every layout
/// decision is inspectable before anything touches a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// One bar per position. `baselines[i]` is where bar `i` starts and
    /// `heights[i]` is its magnitude: the drawn rectangle spans
    /// `baselines[i] .. baselines[i] + heights[i]`.
    Bars {
        positions: Vec<f64>,
        baselines: Vec<f64>,
        heights: Vec<f64>,
        style: BarStyle,
        legend: Option<String>,
    },
    Line {
        points: Vec<(f64, f64)>,
        style: LineStyle,
        legend: Option<String>,
    },
    Points {
        points: Vec<(f64, f64)>,
        style: PointStyle,
        legend: Option<String>,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        style: PolygonStyle,
        legend: Option<String>,
    },
}

// =============================================================================
// Panels and figures
// =============================================================================

/// Tick positions and labels for a categorical axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTicks {
    pub positions: Vec<f64>,
    pub labels: Vec<String>,
}

/// One drawn region of the figure: a grid span plus everything the
/// renderer needs to fill it. Never mutated after the recipe returns it.
#[derive(Debug, Clone)]
pub struct PanelScene {
    pub span: Span,
    pub title: Option<String>,
    pub title_size: u32,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub ticks: Option<CategoryTicks>,
    /// Variable labels drawn at spoke ends (radar panels only).
    pub spoke_labels: Vec<String>,
    /// Strip frame, mesh, and tick chrome (title banners, radar panels).
    pub hide_chrome: bool,
    pub commands: Vec<DrawCommand>,
}

impl PanelScene {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            title: None,
            title_size: 20,
            x_label: None,
            y_label: None,
            ticks: None,
            spoke_labels: Vec::new(),
            hide_chrome: false,
            commands: Vec::new(),
        }
    }

    /// Legend labels in command order, for legend rendering and tests.
    pub fn legend_labels(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Bars { legend, .. }
                | DrawCommand::Line { legend, .. }
                | DrawCommand::Points { legend, .. }
                | DrawCommand::Polygon { legend, .. } => legend.as_deref(),
            })
            .collect()
    }
}

/// A complete figure: grid geometry plus the panels composed onto it.
#[derive(Debug, Clone)]
pub struct FigureScene {
    pub nrow: usize,
    pub ncol: usize,
    pub panels: Vec<PanelScene>,
}

impl FigureScene {
    pub fn new(nrow: usize, ncol: usize) -> Self {
        Self {
            nrow,
            ncol,
            panels: Vec::new(),
        }
    }
}
