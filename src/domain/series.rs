// Series domain models
use serde::Deserialize;

/// The data sources the dashboard can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesId {
    Stock,
    Population,
}

impl SeriesId {
    pub const ALL: [SeriesId; 2] = [SeriesId::Stock, SeriesId::Population];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesId::Stock => "stock",
            SeriesId::Population => "population",
        }
    }

    /// Input granularity for the threshold control: fine for prices,
    /// coarse for population counts.
    pub fn threshold_step(&self) -> f64 {
        match self {
            SeriesId::Stock => 0.1,
            SeriesId::Population => 10_000.0,
        }
    }
}

impl std::fmt::Display for SeriesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ordered label/value pair sequence. Labels are x-axis categories in
/// chronological order; `values` runs parallel to `labels`. Both empty is
/// valid and renders nothing. Once fetched, a series is immutable for the
/// session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        Self { labels, values }
    }

    pub fn from_points(points: Vec<(String, f64)>) -> Self {
        let (labels, values) = points.into_iter().unzip();
        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The first `max_points` points, chronologically earliest. The whole
    /// series when `max_points` covers it.
    pub fn head(&self, max_points: usize) -> Series {
        if self.len() <= max_points {
            return self.clone();
        }
        Series {
            labels: self.labels[..max_points].to_vec(),
            values: self.values[..max_points].to_vec(),
        }
    }
}

/// User-adjustable display parameters. Mutated only by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub series: SeriesId,
    pub threshold: f64,
    pub max_points: usize,
}
