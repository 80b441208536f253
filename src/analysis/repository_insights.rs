use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::models::analysis::{ActivityBuckets, RepositoryInsights, SizeBuckets};
use crate::models::repository::RepositorySummary;

const ACTIVE_WITHIN_DAYS: i64 = 30;
const MODERATE_WITHIN_DAYS: i64 = 90;
const SMALL_REPO_KB: u64 = 1024;
const MEDIUM_REPO_KB: u64 = 10 * 1024;
const TOP_REPOSITORIES: usize = 5;

pub fn calculate_repository_insights(repositories: &[RepositorySummary]) -> RepositoryInsights {
    calculate_repository_insights_at(repositories, Utc::now())
}

/// Insights relative to an explicit "now", which drives the activity buckets.
pub fn calculate_repository_insights_at(
    repositories: &[RepositorySummary],
    now: DateTime<Utc>,
) -> RepositoryInsights {
    let total_stars: u64 = repositories.iter().map(|r| r.stars).sum();
    let total_forks: u64 = repositories.iter().map(|r| r.forks).sum();

    let languages: HashSet<&str> = repositories
        .iter()
        .filter_map(|r| r.language.as_deref())
        .filter(|l| !l.is_empty())
        .collect();

    let average_stars = if repositories.is_empty() {
        0.0
    } else {
        total_stars as f64 / repositories.len() as f64
    };

    RepositoryInsights {
        total_repositories: repositories.len() as u32,
        total_stars,
        total_forks,
        language_count: languages.len() as u32,
        average_stars,
        most_starred: first_max_by(repositories, |r| r.stars).cloned(),
        most_forked: first_max_by(repositories, |r| r.forks).cloned(),
        newest: first_max_by(repositories, |r| r.created_at).cloned(),
        activity: activity_buckets(repositories, now),
        size: size_buckets(repositories),
        top_repositories: top_by_stars(repositories, TOP_REPOSITORIES),
    }
}

/// Linear scan keeping the first repository that reaches the maximum.
fn first_max_by<K: Ord>(
    repositories: &[RepositorySummary],
    key: impl Fn(&RepositorySummary) -> K,
) -> Option<&RepositorySummary> {
    let mut best: Option<&RepositorySummary> = None;
    for repo in repositories {
        if best.map_or(true, |current| key(repo) > key(current)) {
            best = Some(repo);
        }
    }
    best
}

pub fn activity_buckets(repositories: &[RepositorySummary], now: DateTime<Utc>) -> ActivityBuckets {
    let mut buckets = ActivityBuckets::default();
    let active_cutoff = now - Duration::days(ACTIVE_WITHIN_DAYS);
    let moderate_cutoff = now - Duration::days(MODERATE_WITHIN_DAYS);

    for repo in repositories {
        if repo.updated_at >= active_cutoff {
            buckets.active += 1;
        } else if repo.updated_at >= moderate_cutoff {
            buckets.moderate += 1;
        } else {
            buckets.inactive += 1;
        }
    }

    buckets
}

pub fn size_buckets(repositories: &[RepositorySummary]) -> SizeBuckets {
    let mut buckets = SizeBuckets::default();
    for repo in repositories {
        match repo.size_kb {
            s if s < SMALL_REPO_KB => buckets.small += 1,
            s if s < MEDIUM_REPO_KB => buckets.medium += 1,
            _ => buckets.large += 1,
        }
    }
    buckets
}

/// Highest star counts first; equal counts keep input order.
pub fn top_by_stars(repositories: &[RepositorySummary], limit: usize) -> Vec<RepositorySummary> {
    let mut sorted: Vec<RepositorySummary> = repositories.to_vec();
    sorted.sort_by(|a, b| b.stars.cmp(&a.stars));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn repo(name: &str, stars: u64, forks: u64, updated_days_ago: i64) -> RepositorySummary {
        RepositorySummary {
            name: name.to_string(),
            description: None,
            language: Some("Rust".to_string()),
            stars,
            forks,
            size_kb: 512,
            created_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            updated_at: now() - Duration::days(updated_days_ago),
            url: None,
        }
    }

    #[test]
    fn test_empty_repositories() {
        let insights = calculate_repository_insights_at(&[], now());
        assert_eq!(insights.average_stars, 0.0);
        assert_eq!(insights.total_repositories, 0);
        assert!(insights.most_starred.is_none());
        assert!(insights.newest.is_none());
    }

    #[test]
    fn test_star_tie_resolves_to_first() {
        let repos = vec![repo("repoA", 10, 1, 1), repo("repoB", 10, 1, 1)];
        let insights = calculate_repository_insights_at(&repos, now());
        assert_eq!(insights.most_starred.unwrap().name, "repoA");
        assert_eq!(insights.most_forked.unwrap().name, "repoA");
    }

    #[test]
    fn test_totals_and_average() {
        let mut repos = vec![repo("a", 3, 1, 1), repo("b", 7, 4, 1), repo("c", 0, 0, 1)];
        repos[2].language = Some("TypeScript".to_string());
        repos[1].language = None;

        let insights = calculate_repository_insights_at(&repos, now());
        assert_eq!(insights.total_stars, 10);
        assert_eq!(insights.total_forks, 5);
        assert_eq!(insights.language_count, 2);
        assert!((insights.average_stars - 10.0 / 3.0).abs() < 1e-9);
        assert_eq!(insights.most_starred.unwrap().name, "b");
        assert_eq!(insights.most_forked.unwrap().name, "b");
    }

    #[test]
    fn test_newest_by_created_at() {
        let mut repos = vec![repo("old", 0, 0, 1), repo("new", 0, 0, 1), repo("also-new", 0, 0, 1)];
        repos[1].created_at = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        repos[2].created_at = repos[1].created_at;

        let insights = calculate_repository_insights_at(&repos, now());
        assert_eq!(insights.newest.unwrap().name, "new");
    }

    #[test]
    fn test_activity_buckets() {
        let repos = vec![
            repo("fresh", 0, 0, 0),
            repo("edge", 0, 0, 30),
            repo("moderate", 0, 0, 45),
            repo("edge-moderate", 0, 0, 90),
            repo("stale", 0, 0, 91),
        ];
        let buckets = activity_buckets(&repos, now());
        assert_eq!(
            buckets,
            ActivityBuckets {
                active: 2,
                moderate: 2,
                inactive: 1
            }
        );
    }

    #[test]
    fn test_size_buckets_and_top() {
        let mut repos = vec![repo("s", 1, 0, 1), repo("m", 9, 0, 1), repo("l", 9, 0, 1)];
        repos[1].size_kb = 2048;
        repos[2].size_kb = 20_480;

        let sizes = size_buckets(&repos);
        assert_eq!((sizes.small, sizes.medium, sizes.large), (1, 1, 1));

        let top: Vec<_> = top_by_stars(&repos, 2).into_iter().map(|r| r.name).collect();
        assert_eq!(top, vec!["m", "l"]);
    }
}
