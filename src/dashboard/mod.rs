pub mod activity;
pub mod command;
pub mod overview;
pub mod panels;
pub mod realtime;
pub mod repositories;
pub mod resource;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::cache::{CacheKey, PollingCache, Subscription};
use crate::config::DashboardConfig;
use crate::error::{Error, Result};
use crate::models::ActivityKind;
use crate::render::{Page, Panel, TabLabel};

pub use command::Command;
pub use resource::Resource;

pub const TITLE: &str = "GitHub Pulse";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DashboardTab {
    #[default]
    Overview,
    Realtime,
    Activity,
    Repositories,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 4] = [
        DashboardTab::Overview,
        DashboardTab::Realtime,
        DashboardTab::Activity,
        DashboardTab::Repositories,
    ];

    pub fn hotkey(&self) -> char {
        match self {
            DashboardTab::Overview => '1',
            DashboardTab::Realtime => '2',
            DashboardTab::Activity => '3',
            DashboardTab::Repositories => '4',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DashboardTab::Overview => "Overview",
            DashboardTab::Realtime => "Realtime",
            DashboardTab::Activity => "Activity",
            DashboardTab::Repositories => "Repositories",
        }
    }
}

impl fmt::Display for DashboardTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name().to_lowercase())
    }
}

impl FromStr for DashboardTab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "1" | "overview" => Ok(DashboardTab::Overview),
            "2" | "realtime" | "live" => Ok(DashboardTab::Realtime),
            "3" | "activity" => Ok(DashboardTab::Activity),
            "4" | "repositories" | "repos" => Ok(DashboardTab::Repositories),
            other => Err(Error::InvalidCommand(format!("unknown tab: {}", other))),
        }
    }
}

/// Presentation options for the activity feed. They live on the dashboard so
/// they survive tab switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedOptions {
    pub filter: Option<ActivityKind>,
    pub group_by_repository: bool,
}

pub struct ViewContext<'a> {
    pub now: DateTime<Utc>,
    pub feed: &'a FeedOptions,
}

/// A mounted tab. Owning its subscriptions is what keeps its keys polling;
/// dropping the view unmounts them.
pub trait DashboardView: Send {
    fn tab(&self) -> DashboardTab;

    fn subscriptions(&self) -> Vec<&Subscription>;

    fn subscriptions_mut(&mut self) -> Vec<&mut Subscription>;

    fn panels(&self, ctx: &ViewContext<'_>) -> Vec<Panel>;
}

fn mount(tab: DashboardTab, cache: &PollingCache, config: &DashboardConfig) -> Box<dyn DashboardView> {
    tracing::debug!("Mounting {} view", tab);
    match tab {
        DashboardTab::Overview => Box::new(overview::OverviewView::mount(cache, config)),
        DashboardTab::Realtime => Box::new(realtime::RealtimeView::mount(cache, config)),
        DashboardTab::Activity => Box::new(activity::ActivityView::mount(cache, config)),
        DashboardTab::Repositories => {
            Box::new(repositories::RepositoriesView::mount(cache, config))
        }
    }
}

/// Tabbed container that keeps exactly one view mounted.
pub struct Dashboard {
    cache: PollingCache,
    config: DashboardConfig,
    view: Box<dyn DashboardView>,
    feed: FeedOptions,
}

impl Dashboard {
    pub fn new(cache: PollingCache, config: DashboardConfig) -> Self {
        Self::with_tab(cache, config, DashboardTab::default())
    }

    pub fn with_tab(cache: PollingCache, config: DashboardConfig, tab: DashboardTab) -> Self {
        let view = mount(tab, &cache, &config);
        Self {
            cache,
            config,
            view,
            feed: FeedOptions::default(),
        }
    }

    pub fn active_tab(&self) -> DashboardTab {
        self.view.tab()
    }

    /// Switches tabs. The new view is mounted before the old one is dropped,
    /// so a key shared by both keeps its data; keys only the old view used are
    /// unsubscribed and stop polling.
    pub fn select(&mut self, tab: DashboardTab) {
        if tab == self.active_tab() {
            return;
        }
        tracing::info!("Switching to {} tab", tab);
        self.view = mount(tab, &self.cache, &self.config);
    }

    pub fn feed_options(&self) -> FeedOptions {
        self.feed
    }

    pub fn set_filter(&mut self, filter: Option<ActivityKind>) {
        self.feed.filter = filter;
    }

    pub fn toggle_grouping(&mut self) {
        self.feed.group_by_repository = !self.feed.group_by_repository;
    }

    /// Keys the active view is subscribed to.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.view
            .subscriptions()
            .into_iter()
            .filter_map(|s| s.key().cloned())
            .collect()
    }

    pub fn render(&self, now: DateTime<Utc>) -> Page {
        let ctx = ViewContext {
            now,
            feed: &self.feed,
        };
        let active = self.active_tab();

        Page {
            title: TITLE.to_string(),
            tabs: DashboardTab::ALL
                .iter()
                .map(|tab| TabLabel {
                    hotkey: tab.hotkey(),
                    name: tab.name().to_string(),
                    active: *tab == active,
                })
                .collect(),
            panels: self.view.panels(&ctx),
            rendered_at: now,
            footer: None,
        }
    }

    /// Resolves when any key of the active view publishes a new entry.
    pub async fn changed(&mut self) {
        let pending: Vec<_> = self
            .view
            .subscriptions_mut()
            .into_iter()
            .map(|s| Box::pin(s.changed()))
            .collect();

        if pending.is_empty() {
            std::future::pending::<()>().await;
        }
        futures::future::select_all(pending).await;
    }

    /// Every key has data or an error and nothing is being fetched.
    pub fn is_settled(&self) -> bool {
        self.view
            .subscriptions()
            .iter()
            .filter(|s| s.is_enabled())
            .all(|s| s.current().is_settled())
    }

    /// Refetches every key of the active view and waits for the results.
    pub async fn refresh(&self) {
        let subscriptions = self.view.subscriptions();
        tracing::info!("Refreshing {} keys", self.keys().len());
        futures::future::join_all(subscriptions.into_iter().map(|s| s.mutate())).await;
    }

    pub fn clear_cache(&self) {
        self.cache.clear_cache();
    }

    /// Applies one watch-mode command. Returns `false` once the user asked to quit.
    pub async fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Select(tab) => self.select(tab),
            Command::Refresh => self.refresh().await,
            Command::ClearCache => self.clear_cache(),
            Command::Filter(kind) => self.set_filter(kind),
            Command::ToggleGrouping => self.toggle_grouping(),
            Command::Quit => return false,
        }
        true
    }
}
