use chrono::{DateTime, Utc};

use crate::analysis::calculate_coding_activity;
use crate::analysis::coding_activity::time_of_day_breakdown;
use crate::analysis::normalizer::{filter_by_kind, group_by_repository};
use crate::analysis::{normalize_activity, sort_by_repository, sort_by_timestamp_desc};
use crate::cache::{PollOptions, PollingCache, Subscription};
use crate::config::DashboardConfig;
use crate::dashboard::panels::skeleton_rows;
use crate::dashboard::{DashboardTab, DashboardView, FeedOptions, Resource, ViewContext};
use crate::github::Endpoint;
use crate::models::analysis::{DAY_NAMES, HOURS_PER_DAY, MONTH_NAMES};
use crate::models::{ActivityItem, ActivityKind, ActivityPayload, CodingActivityProfile};
use crate::render::{
    format_decimal, format_hour, format_number, relative_time, Chart, ChartKind, FeedRow, Metric,
    Panel, SeriesColor,
};

const FEED_LIMIT: usize = 20;
const BUSIEST_REPOSITORIES: usize = 5;

pub struct ActivityView {
    activity: Subscription,
}

impl ActivityView {
    pub fn mount(cache: &PollingCache, config: &DashboardConfig) -> Self {
        Self {
            activity: cache.subscribe(
                Some(Endpoint::Activity.key()),
                PollOptions::every(config.refresh_interval),
            ),
        }
    }
}

struct ActivityData {
    items: Vec<ActivityItem>,
    profile: CodingActivityProfile,
}

/// Applies the filter and ordering, then flattens into feed rows.
pub fn feed_rows(items: &[ActivityItem], options: &FeedOptions, now: DateTime<Utc>) -> Vec<FeedRow> {
    let mut items = filter_by_kind(items, options.filter);
    sort_by_timestamp_desc(&mut items);
    if options.group_by_repository {
        sort_by_repository(&mut items);
    }

    items
        .iter()
        .take(FEED_LIMIT)
        .map(|item| FeedRow {
            kind: item.kind.label().to_string(),
            title: item.title.clone(),
            subtitle: item.subtitle.clone(),
            repository: item.repository.clone(),
            when: relative_time(item.timestamp, now),
            status: item.status.map(|s| s.to_string()),
            url: item.url.clone(),
            group: options
                .group_by_repository
                .then(|| item.repository.clone()),
        })
        .collect()
}

fn feed_title(filter: Option<ActivityKind>) -> String {
    match filter {
        None => "Recent activity".to_string(),
        Some(kind) => format!("Recent activity ({})", kind.label().to_lowercase()),
    }
}

/// Event counts per repository, busiest first.
pub fn busiest_repositories(items: &[ActivityItem]) -> Chart {
    let mut counts: Vec<(String, [u32; 3])> = group_by_repository(items)
        .into_iter()
        .map(|(repository, items)| {
            let mut by_kind = [0u32; 3];
            for item in &items {
                let slot = match item.kind {
                    ActivityKind::Commit => 0,
                    ActivityKind::PullRequest => 1,
                    ActivityKind::Issue => 2,
                };
                by_kind[slot] += 1;
            }
            (repository, by_kind)
        })
        .collect();
    counts.sort_by(|a, b| {
        let total = |c: &[u32; 3]| c.iter().sum::<u32>();
        total(&b.1).cmp(&total(&a.1))
    });
    counts.truncate(BUSIEST_REPOSITORIES);

    let column = |i: usize| counts.iter().map(|(_, c)| c[i]).collect::<Vec<u32>>();
    Chart::bar(counts.iter().map(|(name, _)| name.clone()).collect())
        .with_counts("Commits", SeriesColor::COMMITS, &column(0))
        .with_counts("Pull requests", SeriesColor::PULL_REQUESTS, &column(1))
        .with_counts("Issues", SeriesColor::ISSUES, &column(2))
}

fn profile_panels(profile: &CodingActivityProfile) -> Vec<Panel> {
    // Peaks of an all-zero histogram are just index 0
    let summary = if profile.total_commits == 0 {
        Panel::empty("Coding habits")
    } else {
        Panel::metrics(
            "Coding habits",
            vec![
                Metric::new("Commits analyzed", format_number(profile.total_commits as u64))
                    .colored(SeriesColor::COMMITS),
                Metric::new("Most active hour", format_hour(profile.most_active_hour)),
                Metric::new("Most active day", profile.most_active_day_name()),
                Metric::new("Most active month", profile.most_active_month_name()),
                Metric::new("Commits per day", format_decimal(profile.average_commits_per_day)),
            ],
        )
    };

    let hours = Chart::bar((0..HOURS_PER_DAY).map(format_hour).collect()).with_counts(
        "Commits",
        SeriesColor::COMMITS,
        &profile.hourly_distribution,
    );
    let days = Chart::bar(DAY_NAMES.iter().map(|d| d.to_string()).collect()).with_counts(
        "Commits",
        SeriesColor::COMMITS,
        &profile.daily_distribution,
    );
    let months = Chart::new(
        ChartKind::Line,
        MONTH_NAMES.iter().map(|m| m.to_string()).collect(),
    )
    .with_counts("Commits", SeriesColor::COMMITS, &profile.monthly_distribution);

    let breakdown = time_of_day_breakdown(profile);
    let parts = Chart::new(
        ChartKind::Radial,
        breakdown.iter().map(|(name, _)| name.to_string()).collect(),
    )
    .with_counts(
        "Commits",
        SeriesColor::PERFORMANCE,
        &breakdown.iter().map(|(_, count)| *count).collect::<Vec<u32>>(),
    );

    vec![
        summary,
        Panel::chart("Commits by hour", hours),
        Panel::chart("Commits by weekday", days),
        Panel::chart("Commits by month", months),
        Panel::chart("Time of day", parts),
    ]
}

impl DashboardView for ActivityView {
    fn tab(&self) -> DashboardTab {
        DashboardTab::Activity
    }

    fn subscriptions(&self) -> Vec<&Subscription> {
        vec![&self.activity]
    }

    fn subscriptions_mut(&mut self) -> Vec<&mut Subscription> {
        vec![&mut self.activity]
    }

    fn panels(&self, ctx: &ViewContext<'_>) -> Vec<Panel> {
        let data = Resource::<ActivityPayload>::from_entry(&self.activity.current()).map(|payload| {
            ActivityData {
                items: normalize_activity(
                    &payload.recent_commits,
                    &payload.recent_pull_requests,
                    &payload.recent_issues,
                ),
                profile: calculate_coding_activity(&payload.recent_commits),
            }
        });

        let title = feed_title(ctx.feed.filter);
        let mut panels = vec![
            data.panel(&title, skeleton_rows(FEED_LIMIT), |data| {
                let panel = Panel::feed(&title, feed_rows(&data.items, ctx.feed, ctx.now));
                if ctx.feed.group_by_repository {
                    panel.with_notice("grouped by repository")
                } else {
                    panel
                }
            }),
            data.panel("Busiest repositories", skeleton_rows(BUSIEST_REPOSITORIES), |data| {
                Panel::chart("Busiest repositories", busiest_repositories(&data.items))
            }),
        ];

        match data.data() {
            Some(data) => {
                let stale = panels.first().map_or(false, |p| p.stale);
                panels.extend(profile_panels(&data.profile).into_iter().map(|panel| {
                    if stale {
                        Panel { stale: true, ..panel }
                    } else {
                        panel
                    }
                }));
            }
            None => {
                let placeholder = data.panel("Coding habits", 5, |_| Panel::empty("Coding habits"));
                panels.push(placeholder);
            }
        }
        panels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityStatus;
    use crate::render::PanelBody;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn item(id: &str, kind: ActivityKind, repository: &str, minutes_ago: i64, now: DateTime<Utc>) -> ActivityItem {
        ActivityItem {
            id: id.to_string(),
            kind,
            title: id.to_string(),
            description: None,
            subtitle: format!("in {}", repository),
            timestamp: now - Duration::minutes(minutes_ago),
            repository: repository.to_string(),
            url: format!("https://github.com/octo/{}", repository),
            status: (kind != ActivityKind::Commit).then_some(ActivityStatus::Open),
        }
    }

    fn sample(now: DateTime<Utc>) -> Vec<ActivityItem> {
        vec![
            item("c1", ActivityKind::Commit, "web", 30, now),
            item("p1", ActivityKind::PullRequest, "api", 10, now),
            item("c2", ActivityKind::Commit, "api", 20, now),
            item("i1", ActivityKind::Issue, "web", 5, now),
        ]
    }

    #[test]
    fn test_feed_is_newest_first() {
        let now = Utc::now();
        let rows = feed_rows(&sample(now), &FeedOptions::default(), now);
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["i1", "p1", "c2", "c1"]);
        assert_eq!(rows[0].when, "5m ago");
        assert!(rows.iter().all(|r| r.group.is_none()));
    }

    #[test]
    fn test_feed_filter_and_grouping() {
        let now = Utc::now();
        let options = FeedOptions {
            filter: Some(ActivityKind::Commit),
            group_by_repository: false,
        };
        let rows = feed_rows(&sample(now), &options, now);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.kind == "Commit"));

        let options = FeedOptions {
            filter: None,
            group_by_repository: true,
        };
        let rows = feed_rows(&sample(now), &options, now);
        let order: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.repository.as_str(), r.title.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("api", "p1"), ("api", "c2"), ("web", "i1"), ("web", "c1")]
        );
        assert_eq!(rows[0].group.as_deref(), Some("api"));
    }

    #[test]
    fn test_busiest_repositories() {
        let now = Utc::now();
        let mut items = sample(now);
        items.push(item("c3", ActivityKind::Commit, "web", 40, now));
        let chart = busiest_repositories(&items);
        assert_eq!(chart.labels, vec!["web".to_string(), "api".to_string()]);
        assert_eq!(chart.series[0].values, vec![2.0, 1.0]);
        assert_eq!(chart.series[2].values, vec![1.0, 0.0]);
    }

    #[test]
    fn test_profile_without_commits_has_no_peaks() {
        let panels = profile_panels(&calculate_coding_activity(&[]));
        assert_eq!(panels.len(), 5);
        assert_eq!(panels[0].title, "Coding habits");
        assert!(panels
            .iter()
            .all(|p| matches!(p.body, PanelBody::Empty { .. })));
    }

    #[test]
    fn test_feed_title_names_filter() {
        assert_eq!(feed_title(None), "Recent activity");
        assert_eq!(
            feed_title(Some(ActivityKind::PullRequest)),
            "Recent activity (pull request)"
        );
    }
}
