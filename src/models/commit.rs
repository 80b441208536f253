use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit as returned inside the `type=activity` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawCommit {
    pub sha: String,
    pub commit: CommitDetails,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub repository: Option<RepositoryRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitDetails {
    #[serde(default)]
    pub message: String,
    pub author: CommitAuthor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitAuthor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositoryRef {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl RawCommit {
    pub fn committed_at(&self) -> DateTime<Utc> {
        self.commit.author.date
    }

    pub fn repository_name(&self) -> Option<&str> {
        self.repository.as_ref().map(|r| r.name.as_str())
    }
}

/// Pull requests and issues share GitHub's issue-search shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawPullRequest {
    pub id: u64,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub html_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub repository: Option<RepositoryRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawIssue {
    pub id: u64,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub repository: Option<RepositoryRef>,
}

/// Resolves the owning repository from an explicit reference, falling back to
/// the last path segment of an API `repository_url`.
pub fn resolve_repository(
    repository: Option<&RepositoryRef>,
    repository_url: Option<&str>,
) -> Option<String> {
    if let Some(repo) = repository {
        if !repo.name.is_empty() {
            return Some(repo.name.clone());
        }
    }
    repository_url
        .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// The `type=activity` payload. Every collection is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPayload {
    #[serde(default)]
    pub recent_commits: Vec<RawCommit>,
    #[serde(default)]
    pub recent_pull_requests: Vec<RawPullRequest>,
    #[serde(default)]
    pub recent_issues: Vec<RawIssue>,
}
