use chrono::{Duration, NaiveDate};

use crate::models::contribution::{ContributionCalendar, ContributionHeatmapCell, ContributionSummary};

pub const MAX_LEVEL: u8 = 4;

/// Fixed intensity thresholds: 0, 1-2, 3-5, 6-9, 10+.
pub fn heatmap_level(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        6..=9 => 3,
        _ => MAX_LEVEL,
    }
}

/// Flattens the calendar into cells in date order, recomputing every level.
pub fn build_heatmap(calendar: &ContributionCalendar) -> Vec<ContributionHeatmapCell> {
    let mut cells: Vec<ContributionHeatmapCell> = calendar
        .weeks
        .iter()
        .flat_map(|week| week.days.iter())
        .map(|day| ContributionHeatmapCell {
            date: day.date,
            count: day.count,
            level: heatmap_level(day.count),
        })
        .collect();
    cells.sort_by_key(|cell| cell.date);
    cells
}

/// Totals and streaks. The current streak counts back from `today`, or from
/// yesterday when nothing has been recorded today yet.
pub fn summarize_contributions(
    cells: &[ContributionHeatmapCell],
    today: NaiveDate,
) -> ContributionSummary {
    let mut summary = ContributionSummary::default();
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for cell in cells {
        summary.total += cell.count as u64;
        if cell.count == 0 {
            run = 0;
            previous = Some(cell.date);
            continue;
        }

        summary.active_days += 1;
        let contiguous = previous.map_or(false, |p| p + Duration::days(1) == cell.date);
        run = if contiguous { run + 1 } else { 1 };
        summary.longest_streak = summary.longest_streak.max(run);
        previous = Some(cell.date);

        if summary.best_day.map_or(true, |best| cell.count > best.count) {
            summary.best_day = Some(*cell);
        }
    }

    summary.current_streak = current_streak(cells, today);
    summary
}

fn current_streak(cells: &[ContributionHeatmapCell], today: NaiveDate) -> u32 {
    let active = |date: NaiveDate| cells.iter().any(|c| c.date == date && c.count > 0);

    let mut day = if active(today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while active(day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contribution::{ContributionDay, ContributionWeek};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn cells(counts: &[u32]) -> Vec<ContributionHeatmapCell> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| ContributionHeatmapCell {
                date: date(i as u32 + 1),
                count,
                level: heatmap_level(count),
            })
            .collect()
    }

    #[test]
    fn test_level_thresholds() {
        let levels: Vec<u8> = [0, 1, 3, 7, 15].iter().map(|&c| heatmap_level(c)).collect();
        assert_eq!(levels, vec![0, 1, 2, 3, 4]);
        assert_eq!(heatmap_level(2), 1);
        assert_eq!(heatmap_level(5), 2);
        assert_eq!(heatmap_level(9), 3);
        assert_eq!(heatmap_level(10), 4);
    }

    #[test]
    fn test_build_recomputes_levels_in_date_order() {
        let calendar = ContributionCalendar {
            weeks: vec![
                ContributionWeek {
                    days: vec![ContributionDay {
                        date: date(8),
                        count: 7,
                        level: Some(1),
                    }],
                },
                ContributionWeek {
                    days: vec![ContributionDay {
                        date: date(1),
                        count: 0,
                        level: None,
                    }],
                },
            ],
        };
        let heatmap = build_heatmap(&calendar);
        assert_eq!(heatmap[0].date, date(1));
        assert_eq!(heatmap[1].level, 3);
    }

    #[test]
    fn test_streaks() {
        let heatmap = cells(&[1, 2, 0, 4, 5, 6, 0, 1, 1]);
        let summary = summarize_contributions(&heatmap, date(9));
        assert_eq!(summary.total, 20);
        assert_eq!(summary.active_days, 7);
        assert_eq!(summary.longest_streak, 3);
        assert_eq!(summary.current_streak, 2);
        assert_eq!(summary.best_day.unwrap().count, 6);
    }

    #[test]
    fn test_current_streak_tolerates_quiet_today() {
        let heatmap = cells(&[3, 3, 0]);
        assert_eq!(summarize_contributions(&heatmap, date(3)).current_streak, 2);
        assert_eq!(summarize_contributions(&heatmap, date(5)).current_streak, 0);
    }

    #[test]
    fn test_empty_calendar() {
        let summary = summarize_contributions(&[], date(1));
        assert_eq!(summary, ContributionSummary::default());
    }
}
