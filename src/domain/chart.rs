// Chart domain models - the live visual description handed to the renderer

pub const PRIMARY_BORDER_COLOR: &str = "#3F51B5";
pub const DATASET_BACKGROUND_COLOR: &str = "#ffffff";
pub const THRESHOLD_BORDER_COLOR: &str = "#878787";
pub const THRESHOLD_BORDER_DASH: [u32; 2] = [7, 3];

/// One plotted dataset. `label`, `data` and `point_colors` are recomputed
/// by the reconciler on parameter changes; `hidden` and the style fields
/// belong to the rendering side and survive patching.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub point_colors: Vec<String>,
    pub border_color: String,
    pub background_color: String,
    pub fill: bool,
    pub border_dash: Option<[u32; 2]>,
    pub point_radius: Option<u8>,
    pub hidden: bool,
}

impl Dataset {
    /// The series line, with per-point colors from threshold classification.
    pub fn primary(label: String, data: Vec<f64>, point_colors: Vec<String>) -> Self {
        Self {
            label,
            data,
            point_colors,
            border_color: PRIMARY_BORDER_COLOR.to_string(),
            background_color: DATASET_BACKGROUND_COLOR.to_string(),
            fill: false,
            border_dash: None,
            point_radius: None,
            hidden: false,
        }
    }

    /// The constant threshold line: dashed, no points, no color encoding.
    pub fn threshold_line(threshold: f64, points: usize) -> Self {
        Self {
            label: "Threshold".to_string(),
            data: vec![threshold; points],
            point_colors: Vec::new(),
            border_color: THRESHOLD_BORDER_COLOR.to_string(),
            background_color: DATASET_BACKGROUND_COLOR.to_string(),
            fill: false,
            border_dash: Some(THRESHOLD_BORDER_DASH),
            point_radius: Some(0),
            hidden: false,
        }
    }
}

/// Static render options; set once at build time and never patched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub show_legend: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            show_legend: true,
        }
    }
}

/// The on-screen chart: shared x-axis labels and the two datasets,
/// addressed by name rather than by position.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub labels: Vec<String>,
    pub primary: Dataset,
    pub threshold: Dataset,
    pub options: ChartOptions,
}
