use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Area,
    Pie,
    Radial,
}

/// Fixed palette. Each data series always renders in the same color.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeriesColor {
    Blue,
    Green,
    Purple,
    Orange,
    Teal,
    Red,
    Gray,
    Custom(String),
}

impl SeriesColor {
    pub const STARS: SeriesColor = SeriesColor::Blue;
    pub const FORKS: SeriesColor = SeriesColor::Green;
    pub const PERFORMANCE: SeriesColor = SeriesColor::Purple;
    pub const COMMITS: SeriesColor = SeriesColor::Orange;
    pub const PULL_REQUESTS: SeriesColor = SeriesColor::Teal;
    pub const ISSUES: SeriesColor = SeriesColor::Red;

    pub fn hex(&self) -> &str {
        match self {
            SeriesColor::Blue => "#3b82f6",
            SeriesColor::Green => "#10b981",
            SeriesColor::Purple => "#8b5cf6",
            SeriesColor::Orange => "#f59e0b",
            SeriesColor::Teal => "#14b8a6",
            SeriesColor::Red => "#ef4444",
            SeriesColor::Gray => "#6b7280",
            SeriesColor::Custom(hex) => hex,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SeriesColor::Blue => "blue",
            SeriesColor::Green => "green",
            SeriesColor::Purple => "purple",
            SeriesColor::Orange => "orange",
            SeriesColor::Teal => "teal",
            SeriesColor::Red => "red",
            SeriesColor::Gray => "gray",
            SeriesColor::Custom(hex) => hex,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: SeriesColor,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    /// Per-label colors for pie and radial charts.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub slice_colors: Vec<SeriesColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Chart {
    pub fn new(kind: ChartKind, labels: Vec<String>) -> Self {
        Self {
            kind,
            labels,
            series: Vec::new(),
            slice_colors: Vec::new(),
            unit: None,
        }
    }

    pub fn bar(labels: Vec<String>) -> Self {
        Self::new(ChartKind::Bar, labels)
    }

    pub fn with_series(mut self, name: &str, color: SeriesColor, values: Vec<f64>) -> Self {
        self.series.push(Series {
            name: name.to_string(),
            color,
            values,
        });
        self
    }

    pub fn with_counts(self, name: &str, color: SeriesColor, counts: &[u32]) -> Self {
        let values = counts.iter().map(|&c| c as f64).collect();
        self.with_series(name, color, values)
    }

    pub fn with_slice_colors(mut self, colors: Vec<SeriesColor>) -> Self {
        self.slice_colors = colors;
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    /// No labels, or every value of every series is zero.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
            || self
                .series
                .iter()
                .all(|s| s.values.iter().all(|v| *v == 0.0))
    }

    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0, f64::max)
    }

    pub fn slice_color(&self, index: usize) -> SeriesColor {
        self.slice_colors
            .get(index)
            .cloned()
            .or_else(|| self.series.first().map(|s| s.color.clone()))
            .unwrap_or(SeriesColor::Gray)
    }
}
