use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The `type=contributions` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContributionCalendar {
    #[serde(default)]
    pub weeks: Vec<ContributionWeek>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContributionWeek {
    #[serde(default)]
    pub days: Vec<ContributionDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContributionDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub count: u32,
    /// Server-side level; ignored in favour of the locally derived one.
    #[serde(default)]
    pub level: Option<u8>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContributionHeatmapCell {
    pub date: NaiveDate,
    pub count: u32,
    pub level: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContributionSummary {
    pub total: u64,
    pub active_days: u32,
    pub longest_streak: u32,
    pub current_streak: u32,
    pub best_day: Option<ContributionHeatmapCell>,
}
