use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{ContributionHeatmapCell, LanguageStat};
use crate::render::{Chart, ChartKind, HeatmapGrid, Panel, SeriesColor};

/// Pie of language shares, each slice in the language's own color.
pub fn language_panel(title: &str, languages: &[LanguageStat]) -> Panel {
    let chart = Chart::new(
        ChartKind::Pie,
        languages.iter().map(|l| l.name.clone()).collect(),
    )
    .with_series(
        "Share",
        SeriesColor::Gray,
        languages.iter().map(|l| l.percentage).collect(),
    )
    .with_slice_colors(
        languages
            .iter()
            .map(|l| SeriesColor::Custom(l.color.clone()))
            .collect(),
    )
    .with_unit("%");
    Panel::chart(title, chart)
}

/// Lays date-ordered cells out as Sunday-first week columns.
pub fn heatmap_grid(cells: &[ContributionHeatmapCell]) -> HeatmapGrid {
    let mut weeks: Vec<[Option<u8>; 7]> = Vec::new();
    let mut current: Option<NaiveDate> = None;
    for cell in cells {
        let weekday = cell.date.weekday().num_days_from_sunday() as usize;
        let week_start = cell.date - Duration::days(weekday as i64);
        match current {
            Some(start) if start == week_start => {}
            Some(start) if start < week_start => {
                // Skipped weeks stay as empty columns
                let gap = (week_start - start).num_weeks() as usize;
                weeks.extend(std::iter::repeat([None; 7]).take(gap));
                current = Some(week_start);
            }
            Some(_) => {
                tracing::debug!("Skipping out-of-order heatmap cell {}", cell.date);
                continue;
            }
            None => {
                weeks.push([None; 7]);
                current = Some(week_start);
            }
        }
        if let Some(week) = weeks.last_mut() {
            week[weekday] = Some(cell.level);
        }
    }

    HeatmapGrid {
        weeks,
        first_date: cells.first().map(|c| c.date.to_string()),
        last_date: cells.last().map(|c| c.date.to_string()),
    }
}

/// Skeleton height for a chart over `points` labels.
pub fn skeleton_rows(points: usize) -> usize {
    points.clamp(3, 12)
}
