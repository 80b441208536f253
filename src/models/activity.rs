use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Commit,
    PullRequest,
    Issue,
}

impl ActivityKind {
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ActivityKind::Commit => "commit",
            ActivityKind::PullRequest => "pr",
            ActivityKind::Issue => "issue",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Commit => "Commit",
            ActivityKind::PullRequest => "Pull request",
            ActivityKind::Issue => "Issue",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityKind::Commit => write!(f, "commit"),
            ActivityKind::PullRequest => write!(f, "pull_request"),
            ActivityKind::Issue => write!(f, "issue"),
        }
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "commit" | "commits" => Ok(ActivityKind::Commit),
            "pr" | "prs" | "pull_request" | "pull-request" | "pulls" => Ok(ActivityKind::PullRequest),
            "issue" | "issues" => Ok(ActivityKind::Issue),
            other => Err(format!("unknown activity kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Open,
    Closed,
    Merged,
}

impl ActivityStatus {
    pub fn from_state(state: Option<&str>) -> Option<Self> {
        match state.map(str::to_lowercase).as_deref() {
            Some("open") => Some(ActivityStatus::Open),
            Some("closed") => Some(ActivityStatus::Closed),
            Some("merged") => Some(ActivityStatus::Merged),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityStatus::Open => write!(f, "open"),
            ActivityStatus::Closed => write!(f, "closed"),
            ActivityStatus::Merged => write!(f, "merged"),
        }
    }
}

/// A commit, pull request or issue in the unified feed shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityItem {
    pub id: String,
    pub kind: ActivityKind,
    pub title: String,
    pub description: Option<String>,
    pub subtitle: String,
    pub timestamp: DateTime<Utc>,
    pub repository: String,
    pub url: String,
    pub status: Option<ActivityStatus>,
}
