use chrono::Local;

use crate::analysis::{build_heatmap, language_distribution, summarize_contributions};
use crate::cache::{PollOptions, PollingCache, Subscription};
use crate::config::DashboardConfig;
use crate::dashboard::panels::{heatmap_grid, language_panel};
use crate::dashboard::{DashboardTab, DashboardView, Resource, ViewContext};
use crate::github::{Endpoint, StatsMetric};
use crate::models::{ContributionCalendar, LanguageTotals, OverviewStats};
use crate::render::{format_decimal, format_number, Metric, Panel, SeriesColor};

/// Headline stats, language share and the contribution calendar, on the slow interval.
pub struct OverviewView {
    stats: Subscription,
    languages: Subscription,
    contributions: Subscription,
}

impl OverviewView {
    pub fn mount(cache: &PollingCache, config: &DashboardConfig) -> Self {
        let options = PollOptions::every(config.refresh_interval);
        Self {
            stats: cache.subscribe(Some(Endpoint::Stats(StatsMetric::Overview).key()), options),
            languages: cache.subscribe(Some(Endpoint::Stats(StatsMetric::Languages).key()), options),
            contributions: cache.subscribe(Some(Endpoint::Contributions.key()), options),
        }
    }
}

fn stats_panel(stats: &OverviewStats) -> Panel {
    let mut metrics = vec![
        Metric::new("Repositories", format_number(stats.total_repositories)),
        Metric::new("Stars", format_number(stats.total_stars)).colored(SeriesColor::STARS),
        Metric::new("Forks", format_number(stats.total_forks)).colored(SeriesColor::FORKS),
        Metric::new("Followers", format_number(stats.followers)),
        Metric::new("Following", format_number(stats.following)),
    ];
    if let Some(commits) = stats.total_commits {
        metrics.push(Metric::new("Commits", format_number(commits)).colored(SeriesColor::COMMITS));
    }
    if stats.total_repositories > 0 {
        let average = stats.total_stars as f64 / stats.total_repositories as f64;
        metrics.push(Metric::new("Stars / repo", format_decimal(average)));
    }
    Panel::metrics("Overview", metrics)
}

impl DashboardView for OverviewView {
    fn tab(&self) -> DashboardTab {
        DashboardTab::Overview
    }

    fn subscriptions(&self) -> Vec<&Subscription> {
        vec![&self.stats, &self.languages, &self.contributions]
    }

    fn subscriptions_mut(&mut self) -> Vec<&mut Subscription> {
        vec![&mut self.stats, &mut self.languages, &mut self.contributions]
    }

    fn panels(&self, ctx: &ViewContext<'_>) -> Vec<Panel> {
        let today = ctx.now.with_timezone(&Local).date_naive();

        let stats: Resource<OverviewStats> = Resource::from_entry(&self.stats.current());
        let languages = Resource::<LanguageTotals>::from_entry(&self.languages.current())
            .map(|totals| language_distribution(&totals.into_map()));
        let calendar: Resource<ContributionCalendar> =
            Resource::from_entry(&self.contributions.current());
        let cells = calendar.map(|calendar| build_heatmap(&calendar));

        vec![
            stats.panel("Overview", 5, stats_panel),
            languages.panel("Languages", 6, |languages| {
                language_panel("Languages", languages)
            }),
            cells.panel("Contributions", 7, |cells| {
                Panel::heatmap("Contributions", heatmap_grid(cells))
            }),
            cells.panel("Contribution streaks", 4, |cells| {
                let summary = summarize_contributions(cells, today);
                let mut metrics = vec![
                    Metric::new("Contributions", format_number(summary.total)),
                    Metric::new("Active days", format_number(summary.active_days as u64)),
                    Metric::new("Longest streak", format!("{} days", summary.longest_streak)),
                    Metric::new("Current streak", format!("{} days", summary.current_streak)),
                ];
                if let Some(best) = summary.best_day {
                    metrics.push(
                        Metric::new("Best day", format_number(best.count as u64))
                            .with_hint(best.date.to_string()),
                    );
                }
                Panel::metrics("Contribution streaks", metrics)
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PanelBody;

    #[test]
    fn test_stats_panel_formats_numbers() {
        let stats = OverviewStats {
            total_repositories: 4,
            total_stars: 12_345,
            total_forks: 10,
            followers: 1,
            following: 0,
            total_commits: Some(2_000),
        };
        let panel = stats_panel(&stats);
        let PanelBody::Metrics { metrics } = panel.body else {
            panic!("expected metrics");
        };
        let value = |label: &str| {
            metrics
                .iter()
                .find(|m| m.label == label)
                .map(|m| m.value.clone())
        };
        assert_eq!(value("Stars").as_deref(), Some("12,345"));
        assert_eq!(value("Commits").as_deref(), Some("2,000"));
        assert_eq!(value("Stars / repo").as_deref(), Some("3,086.3"));
    }

    #[test]
    fn test_empty_account_has_no_average() {
        let panel = stats_panel(&OverviewStats::default());
        let PanelBody::Metrics { metrics } = panel.body else {
            panic!("expected metrics");
        };
        assert!(metrics.iter().all(|m| m.label != "Stars / repo"));
    }
}
