use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::render::chart::{Chart, SeriesColor};

pub const NO_DATA: &str = "No data available";

/// One fully composed screen of the dashboard.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page {
    pub title: String,
    pub tabs: Vec<TabLabel>,
    pub panels: Vec<Panel>,
    pub rendered_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TabLabel {
    pub hotkey: char,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Panel {
    pub title: String,
    /// Data shown is from an earlier fetch; the latest refresh failed.
    pub stale: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub body: PanelBody,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PanelBody {
    Skeleton { rows: usize },
    Empty { message: String },
    Error { message: String, retry_hint: String },
    Metrics { metrics: Vec<Metric> },
    Chart { chart: Chart },
    Feed { rows: Vec<FeedRow> },
    Heatmap { grid: HeatmapGrid },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<SeriesColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Metric {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            color: None,
            hint: None,
        }
    }

    pub fn colored(mut self, color: SeriesColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedRow {
    pub kind: String,
    pub title: String,
    pub subtitle: String,
    pub repository: String,
    pub when: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Contribution cells laid out as week columns of seven day rows.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct HeatmapGrid {
    pub weeks: Vec<[Option<u8>; 7]>,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

impl Panel {
    fn with_body(title: &str, body: PanelBody) -> Self {
        Self {
            title: title.to_string(),
            stale: false,
            notice: None,
            body,
        }
    }

    /// Placeholder sized like the content it stands in for.
    pub fn loading(title: &str, rows: usize) -> Self {
        Self::with_body(title, PanelBody::Skeleton { rows: rows.max(1) })
    }

    pub fn empty(title: &str) -> Self {
        Self::empty_with(title, NO_DATA)
    }

    pub fn empty_with(title: &str, message: &str) -> Self {
        Self::with_body(
            title,
            PanelBody::Empty {
                message: message.to_string(),
            },
        )
    }

    pub fn error(title: &str, message: &str) -> Self {
        Self::with_body(
            title,
            PanelBody::Error {
                message: message.to_string(),
                retry_hint: "press r to retry".to_string(),
            },
        )
    }

    pub fn chart(title: &str, chart: Chart) -> Self {
        if chart.is_empty() {
            return Self::empty(title);
        }
        Self::with_body(title, PanelBody::Chart { chart })
    }

    pub fn metrics(title: &str, metrics: Vec<Metric>) -> Self {
        Self::with_body(title, PanelBody::Metrics { metrics })
    }

    pub fn feed(title: &str, rows: Vec<FeedRow>) -> Self {
        if rows.is_empty() {
            return Self::empty_with(title, "No recent activity");
        }
        Self::with_body(title, PanelBody::Feed { rows })
    }

    pub fn heatmap(title: &str, grid: HeatmapGrid) -> Self {
        if grid.weeks.is_empty() {
            return Self::empty(title);
        }
        Self::with_body(title, PanelBody::Heatmap { grid })
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    pub fn mark_stale(mut self, error: &str) -> Self {
        self.stale = true;
        self.notice = Some(format!("showing cached data, refresh failed: {}", error));
        self
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.body, PanelBody::Skeleton { .. })
    }
}
