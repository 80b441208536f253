use serde::{Deserialize, Serialize};

use super::repository::RepositorySummary;

pub const HOURS_PER_DAY: usize = 24;
pub const DAYS_PER_WEEK: usize = 7;
pub const MONTHS_PER_YEAR: usize = 12;

pub const DAY_NAMES: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
pub const MONTH_NAMES: [&str; MONTHS_PER_YEAR] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodingActivityProfile {
    pub hourly_distribution: [u32; HOURS_PER_DAY],
    /// Index 0 is Sunday.
    pub daily_distribution: [u32; DAYS_PER_WEEK],
    /// Index 0 is January.
    pub monthly_distribution: [u32; MONTHS_PER_YEAR],
    pub most_active_hour: usize,
    pub most_active_day: usize,
    pub most_active_month: usize,
    pub average_commits_per_day: f64,
    pub total_commits: u32,
}

impl Default for CodingActivityProfile {
    fn default() -> Self {
        Self {
            hourly_distribution: [0; HOURS_PER_DAY],
            daily_distribution: [0; DAYS_PER_WEEK],
            monthly_distribution: [0; MONTHS_PER_YEAR],
            most_active_hour: 0,
            most_active_day: 0,
            most_active_month: 0,
            average_commits_per_day: 0.0,
            total_commits: 0,
        }
    }
}

impl CodingActivityProfile {
    pub fn most_active_day_name(&self) -> &'static str {
        DAY_NAMES[self.most_active_day % DAYS_PER_WEEK]
    }

    pub fn most_active_month_name(&self) -> &'static str {
        MONTH_NAMES[self.most_active_month % MONTHS_PER_YEAR]
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityBuckets {
    /// Updated within the last 30 days.
    pub active: u32,
    /// Updated within the last 90 days.
    pub moderate: u32,
    pub inactive: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SizeBuckets {
    /// Under 1 MB.
    pub small: u32,
    /// Under 10 MB.
    pub medium: u32,
    pub large: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RepositoryInsights {
    pub total_repositories: u32,
    pub total_stars: u64,
    pub total_forks: u64,
    pub language_count: u32,
    pub average_stars: f64,
    pub most_starred: Option<RepositorySummary>,
    pub most_forked: Option<RepositorySummary>,
    pub newest: Option<RepositorySummary>,
    pub activity: ActivityBuckets,
    pub size: SizeBuckets,
    pub top_repositories: Vec<RepositorySummary>,
}
