use chrono::{DateTime, Duration, Local, Timelike, Utc};

use crate::analysis::normalize_activity;
use crate::analysis::repository_insights::top_by_stars;
use crate::cache::{PollOptions, PollingCache, Subscription};
use crate::config::DashboardConfig;
use crate::dashboard::panels::skeleton_rows;
use crate::dashboard::{DashboardTab, DashboardView, Resource, ViewContext};
use crate::github::Endpoint;
use crate::models::{ActivityItem, ActivityKind, ActivityPayload, ActivityStatus, RepositorySummary};
use crate::models::analysis::HOURS_PER_DAY;
use crate::render::{
    format_hour, format_number, relative_time, Chart, ChartKind, Metric, Panel, SeriesColor,
};

const TOP_REPOSITORIES: usize = 5;

/// Live counters on the fast interval.
pub struct RealtimeView {
    activity: Subscription,
    repositories: Subscription,
}

impl RealtimeView {
    pub fn mount(cache: &PollingCache, config: &DashboardConfig) -> Self {
        let options = PollOptions::every(config.realtime_interval);
        Self {
            activity: cache.subscribe(Some(Endpoint::Activity.key()), options),
            repositories: cache.subscribe(Some(Endpoint::Repositories.key()), options),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveCounters {
    pub commits_today: u64,
    pub open_pull_requests: u64,
    pub open_issues: u64,
    pub events_last_day: u64,
}

pub fn live_counters(items: &[ActivityItem], now: DateTime<Utc>) -> LiveCounters {
    let today = now.with_timezone(&Local).date_naive();
    let day_ago = now - Duration::hours(24);
    let mut counters = LiveCounters::default();

    for item in items {
        if item.timestamp > day_ago && item.timestamp <= now {
            counters.events_last_day += 1;
        }
        match item.kind {
            ActivityKind::Commit => {
                if item.timestamp.with_timezone(&Local).date_naive() == today {
                    counters.commits_today += 1;
                }
            }
            ActivityKind::PullRequest if item.status == Some(ActivityStatus::Open) => {
                counters.open_pull_requests += 1;
            }
            ActivityKind::Issue if item.status == Some(ActivityStatus::Open) => {
                counters.open_issues += 1;
            }
            _ => {}
        }
    }
    counters
}

/// Events per local hour of day over the trailing 24 hours, one series per kind.
pub fn hourly_events(items: &[ActivityItem], now: DateTime<Utc>) -> Chart {
    let day_ago = now - Duration::hours(24);
    let mut commits = [0u32; HOURS_PER_DAY];
    let mut pulls = [0u32; HOURS_PER_DAY];
    let mut issues = [0u32; HOURS_PER_DAY];

    for item in items
        .iter()
        .filter(|i| i.timestamp > day_ago && i.timestamp <= now)
    {
        let hour = item.timestamp.with_timezone(&Local).hour() as usize;
        match item.kind {
            ActivityKind::Commit => commits[hour] += 1,
            ActivityKind::PullRequest => pulls[hour] += 1,
            ActivityKind::Issue => issues[hour] += 1,
        }
    }

    Chart::new(ChartKind::Area, (0..HOURS_PER_DAY).map(format_hour).collect())
        .with_counts("Commits", SeriesColor::COMMITS, &commits)
        .with_counts("Pull requests", SeriesColor::PULL_REQUESTS, &pulls)
        .with_counts("Issues", SeriesColor::ISSUES, &issues)
}

pub fn stars_and_forks(repositories: &[RepositorySummary]) -> Chart {
    let top = top_by_stars(repositories, TOP_REPOSITORIES);
    Chart::bar(top.iter().map(|r| r.name.clone()).collect())
        .with_series(
            "Stars",
            SeriesColor::STARS,
            top.iter().map(|r| r.stars as f64).collect(),
        )
        .with_series(
            "Forks",
            SeriesColor::FORKS,
            top.iter().map(|r| r.forks as f64).collect(),
        )
}

impl DashboardView for RealtimeView {
    fn tab(&self) -> DashboardTab {
        DashboardTab::Realtime
    }

    fn subscriptions(&self) -> Vec<&Subscription> {
        vec![&self.activity, &self.repositories]
    }

    fn subscriptions_mut(&mut self) -> Vec<&mut Subscription> {
        vec![&mut self.activity, &mut self.repositories]
    }

    fn panels(&self, ctx: &ViewContext<'_>) -> Vec<Panel> {
        let now = ctx.now;
        let activity_entry = self.activity.current();
        let repositories_entry = self.repositories.current();

        let items = Resource::<ActivityPayload>::from_entry(&activity_entry).map(|payload| {
            normalize_activity(
                &payload.recent_commits,
                &payload.recent_pull_requests,
                &payload.recent_issues,
            )
        });
        let repositories: Resource<Vec<RepositorySummary>> =
            Resource::from_entry(&repositories_entry);

        let last_updated = [activity_entry.updated_at, repositories_entry.updated_at]
            .into_iter()
            .flatten()
            .max();

        let mut panels = vec![
            repositories.panel("Totals", 3, |repos| {
                let stars: u64 = repos.iter().map(|r| r.stars).sum();
                let forks: u64 = repos.iter().map(|r| r.forks).sum();
                Panel::metrics(
                    "Totals",
                    vec![
                        Metric::new("Stars", format_number(stars)).colored(SeriesColor::STARS),
                        Metric::new("Forks", format_number(forks)).colored(SeriesColor::FORKS),
                        Metric::new("Repositories", format_number(repos.len() as u64)),
                    ],
                )
            }),
            items.panel("Live", 5, |items| {
                let counters = live_counters(items, now);
                let mut metrics = vec![
                    Metric::new("Commits today", format_number(counters.commits_today))
                        .colored(SeriesColor::COMMITS),
                    Metric::new("Open pull requests", format_number(counters.open_pull_requests))
                        .colored(SeriesColor::PULL_REQUESTS),
                    Metric::new("Open issues", format_number(counters.open_issues))
                        .colored(SeriesColor::ISSUES),
                    Metric::new("Events (24h)", format_number(counters.events_last_day))
                        .colored(SeriesColor::PERFORMANCE),
                ];
                if let Some(at) = last_updated {
                    metrics.push(Metric::new("Last updated", relative_time(at, now)));
                }
                Panel::metrics("Live", metrics)
            }),
            items.panel("Last 24 hours", skeleton_rows(HOURS_PER_DAY), |items| {
                Panel::chart("Last 24 hours", hourly_events(items, now))
            }),
            repositories.panel("Stars vs forks", skeleton_rows(TOP_REPOSITORIES), |repos| {
                Panel::chart("Stars vs forks", stars_and_forks(repos))
            }),
        ];

        if activity_entry.is_validating || repositories_entry.is_validating {
            if let Some(live) = panels.get_mut(1) {
                live.notice.get_or_insert_with(|| "refreshing".to_string());
            }
        }
        panels
    }
}
