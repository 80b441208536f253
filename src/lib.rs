pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod cache;
pub mod analysis;
pub mod dashboard;
pub mod render;

pub use cache::{PollOptions, PollingCache};
pub use config::{Config, DashboardConfig};
pub use dashboard::{Dashboard, DashboardTab};
pub use error::{Error, Result};
pub use github::MetricsClient;
pub use render::OutputFormat;
