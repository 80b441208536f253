use std::collections::{BTreeMap, HashSet};

use crate::models::activity::{ActivityItem, ActivityKind, ActivityStatus};
use crate::models::commit::{resolve_repository, RawCommit, RawIssue, RawPullRequest};

/// Maps raw commits, pull requests and issues into the unified feed shape.
///
/// The result keeps input order (commits, then pull requests, then issues) and
/// is not sorted. A source event that appears twice in one payload is kept
/// once so that ids stay unique.
pub fn normalize_activity(
    commits: &[RawCommit],
    pull_requests: &[RawPullRequest],
    issues: &[RawIssue],
) -> Vec<ActivityItem> {
    let mut items = Vec::with_capacity(commits.len() + pull_requests.len() + issues.len());
    let mut seen = HashSet::new();

    let candidates = commits
        .iter()
        .map(normalize_commit)
        .chain(pull_requests.iter().map(normalize_pull_request))
        .chain(issues.iter().map(normalize_issue));

    for item in candidates {
        if seen.insert(item.id.clone()) {
            items.push(item);
        } else {
            tracing::debug!("Dropping duplicate activity item {}", item.id);
        }
    }

    items
}

pub fn normalize_commit(commit: &RawCommit) -> ActivityItem {
    let (title, description) = split_message(&commit.commit.message);
    let repository = commit.repository_name().unwrap_or_default().to_string();

    ActivityItem {
        id: format!("{}-{}", ActivityKind::Commit.id_prefix(), commit.sha),
        kind: ActivityKind::Commit,
        title,
        description,
        subtitle: subtitle(ActivityKind::Commit, &repository),
        timestamp: commit.committed_at(),
        repository,
        url: commit.html_url.clone().unwrap_or_default(),
        status: None,
    }
}

pub fn normalize_pull_request(pr: &RawPullRequest) -> ActivityItem {
    let repository = resolve_repository(pr.repository.as_ref(), pr.repository_url.as_deref())
        .unwrap_or_default();
    let status = if pr.merged_at.is_some() {
        Some(ActivityStatus::Merged)
    } else {
        ActivityStatus::from_state(pr.state.as_deref())
    };

    ActivityItem {
        id: format!("{}-{}", ActivityKind::PullRequest.id_prefix(), pr.id),
        kind: ActivityKind::PullRequest,
        title: pr.title.trim().to_string(),
        description: None,
        subtitle: subtitle(ActivityKind::PullRequest, &repository),
        timestamp: pr.created_at,
        repository,
        url: pr.html_url.clone().unwrap_or_default(),
        status,
    }
}

pub fn normalize_issue(issue: &RawIssue) -> ActivityItem {
    let repository = resolve_repository(issue.repository.as_ref(), issue.repository_url.as_deref())
        .unwrap_or_default();

    ActivityItem {
        id: format!("{}-{}", ActivityKind::Issue.id_prefix(), issue.id),
        kind: ActivityKind::Issue,
        title: issue.title.trim().to_string(),
        description: None,
        subtitle: subtitle(ActivityKind::Issue, &repository),
        timestamp: issue.created_at,
        repository,
        url: issue.html_url.clone().unwrap_or_default(),
        status: ActivityStatus::from_state(issue.state.as_deref()),
    }
}

/// First line becomes the title; the trimmed remainder, if any, the description.
fn split_message(message: &str) -> (String, Option<String>) {
    match message.split_once('\n') {
        Some((first, rest)) => {
            let rest = rest.trim();
            let description = (!rest.is_empty()).then(|| rest.to_string());
            (first.trim_end_matches('\r').trim().to_string(), description)
        }
        None => (message.trim().to_string(), None),
    }
}

fn subtitle(kind: ActivityKind, repository: &str) -> String {
    if repository.is_empty() {
        return kind.label().to_string();
    }
    match kind {
        ActivityKind::Commit => format!("Committed to {}", repository),
        ActivityKind::PullRequest => format!("Pull request in {}", repository),
        ActivityKind::Issue => format!("Issue in {}", repository),
    }
}

/// Most recent first. `sort_by` is stable, so equal timestamps keep input order.
pub fn sort_by_timestamp_desc(items: &mut [ActivityItem]) {
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Repository name ascending, input order within a repository.
pub fn sort_by_repository(items: &mut [ActivityItem]) {
    items.sort_by(|a, b| a.repository.cmp(&b.repository));
}

pub fn filter_by_kind(items: &[ActivityItem], kind: Option<ActivityKind>) -> Vec<ActivityItem> {
    items
        .iter()
        .filter(|item| kind.map_or(true, |k| item.kind == k))
        .cloned()
        .collect()
}

pub fn group_by_repository(items: &[ActivityItem]) -> BTreeMap<String, Vec<ActivityItem>> {
    let mut groups: BTreeMap<String, Vec<ActivityItem>> = BTreeMap::new();
    for item in items {
        groups
            .entry(item.repository.clone())
            .or_default()
            .push(item.clone());
    }
    groups
}
