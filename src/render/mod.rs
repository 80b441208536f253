pub mod chart;
pub mod format;
pub mod markdown;
pub mod page;
pub mod text;

use std::str::FromStr;

use crate::error::{Error, Result};

pub use chart::{Chart, ChartKind, Series, SeriesColor};
pub use format::{format_decimal, format_hour, format_number, format_percent, relative_time};
pub use page::{FeedRow, HeatmapGrid, Metric, Page, Panel, PanelBody, TabLabel, NO_DATA};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::Config(format!("unknown output format: {}", other))),
        }
    }
}

pub fn render(page: &Page, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text::render_text(page)),
        OutputFormat::Markdown => Ok(markdown::render_markdown(page)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(page)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_parse_format() {
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_json_render_round_trips_title() {
        let page = Page {
            title: "GitHub Pulse".to_string(),
            tabs: Vec::new(),
            panels: vec![Panel::empty("Languages")],
            rendered_at: Utc::now(),
            footer: None,
        };
        let json = render(&page, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "GitHub Pulse");
        assert_eq!(value["panels"][0]["body"]["message"], NO_DATA);
    }
}
