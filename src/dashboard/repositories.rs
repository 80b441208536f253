use crate::analysis::{calculate_repository_insights_at, language_counts, language_distribution};
use crate::cache::{PollOptions, PollingCache, Subscription};
use crate::config::DashboardConfig;
use crate::dashboard::panels::language_panel;
use crate::dashboard::realtime::stars_and_forks;
use crate::dashboard::{DashboardTab, DashboardView, Resource, ViewContext};
use crate::github::Endpoint;
use crate::models::{ActivityBuckets, RepositoryInsights, RepositorySummary, SizeBuckets};
use crate::render::{format_decimal, format_number, Chart, ChartKind, Metric, Panel, SeriesColor};

pub struct RepositoriesView {
    repositories: Subscription,
}

impl RepositoriesView {
    pub fn mount(cache: &PollingCache, config: &DashboardConfig) -> Self {
        Self {
            repositories: cache.subscribe(
                Some(Endpoint::Repositories.key()),
                PollOptions::every(config.refresh_interval),
            ),
        }
    }
}

fn insights_panel(insights: &RepositoryInsights) -> Panel {
    let mut metrics = vec![
        Metric::new("Repositories", format_number(insights.total_repositories as u64)),
        Metric::new("Stars", format_number(insights.total_stars)).colored(SeriesColor::STARS),
        Metric::new("Forks", format_number(insights.total_forks)).colored(SeriesColor::FORKS),
        Metric::new("Languages", format_number(insights.language_count as u64)),
        Metric::new("Average stars", format_decimal(insights.average_stars)),
    ];
    if let Some(ref repo) = insights.most_starred {
        metrics.push(
            Metric::new("Most starred", repo.name.clone())
                .with_hint(format!("{} stars", format_number(repo.stars))),
        );
    }
    if let Some(ref repo) = insights.most_forked {
        metrics.push(
            Metric::new("Most forked", repo.name.clone())
                .with_hint(format!("{} forks", format_number(repo.forks))),
        );
    }
    if let Some(ref repo) = insights.newest {
        metrics.push(
            Metric::new("Newest", repo.name.clone())
                .with_hint(repo.created_at.format("%Y-%m-%d").to_string()),
        );
    }
    Panel::metrics("Repository insights", metrics)
}

pub fn activity_chart(buckets: &ActivityBuckets) -> Chart {
    Chart::new(
        ChartKind::Pie,
        vec![
            "Active (30d)".to_string(),
            "Moderate (90d)".to_string(),
            "Inactive".to_string(),
        ],
    )
    .with_counts(
        "Repositories",
        SeriesColor::Gray,
        &[buckets.active, buckets.moderate, buckets.inactive],
    )
    .with_slice_colors(vec![SeriesColor::Green, SeriesColor::Orange, SeriesColor::Gray])
}

pub fn size_chart(buckets: &SizeBuckets) -> Chart {
    Chart::new(
        ChartKind::Radial,
        vec![
            "Small (<1 MB)".to_string(),
            "Medium (<10 MB)".to_string(),
            "Large".to_string(),
        ],
    )
    .with_counts(
        "Repositories",
        SeriesColor::PERFORMANCE,
        &[buckets.small, buckets.medium, buckets.large],
    )
    .with_slice_colors(vec![SeriesColor::Teal, SeriesColor::Blue, SeriesColor::Purple])
}

impl DashboardView for RepositoriesView {
    fn tab(&self) -> DashboardTab {
        DashboardTab::Repositories
    }

    fn subscriptions(&self) -> Vec<&Subscription> {
        vec![&self.repositories]
    }

    fn subscriptions_mut(&mut self) -> Vec<&mut Subscription> {
        vec![&mut self.repositories]
    }

    fn panels(&self, ctx: &ViewContext<'_>) -> Vec<Panel> {
        let repositories: Resource<Vec<RepositorySummary>> =
            Resource::from_entry(&self.repositories.current());
        let insights = repositories
            .clone()
            .map(|repos| calculate_repository_insights_at(&repos, ctx.now));

        vec![
            insights.panel("Repository insights", 8, insights_panel),
            repositories.panel("Top repositories", 5, |repos| {
                Panel::chart("Top repositories", stars_and_forks(repos))
            }),
            insights.panel("Repository activity", 3, |insights| {
                Panel::chart("Repository activity", activity_chart(&insights.activity))
            }),
            insights.panel("Repository size", 3, |insights| {
                Panel::chart("Repository size", size_chart(&insights.size))
            }),
            repositories.panel("Languages", 6, |repos| {
                language_panel("Languages", &language_distribution(&language_counts(repos)))
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PanelBody;

    #[test]
    fn test_insights_panel_names_leaders() {
        let repo = |name: &str, stars: u64, forks: u64| RepositorySummary {
            name: name.to_string(),
            description: None,
            language: Some("Rust".to_string()),
            stars,
            forks,
            size_kb: 10,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            url: None,
        };
        let repos = vec![repo("a", 5, 9), repo("b", 5, 1)];
        let insights = calculate_repository_insights_at(&repos, chrono::Utc::now());
        let PanelBody::Metrics { metrics } = insights_panel(&insights).body else {
            panic!("expected metrics");
        };
        let find = |label: &str| metrics.iter().find(|m| m.label == label).cloned();
        assert_eq!(find("Most starred").map(|m| m.value), Some("a".to_string()));
        assert_eq!(find("Most forked").map(|m| m.value), Some("a".to_string()));
        assert_eq!(find("Average stars").map(|m| m.value), Some("5".to_string()));
    }

    #[test]
    fn test_bucket_charts_empty_without_repositories() {
        let panel = Panel::chart("Repository size", size_chart(&SizeBuckets::default()));
        assert!(matches!(panel.body, PanelBody::Empty { .. }));

        let chart = activity_chart(&ActivityBuckets {
            active: 2,
            moderate: 0,
            inactive: 1,
        });
        assert_eq!(chart.series[0].values, vec![2.0, 0.0, 1.0]);
        assert_eq!(chart.slice_color(0), SeriesColor::Green);
    }
}
