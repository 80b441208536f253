use chrono::{Datelike, Local, TimeZone, Timelike};

use crate::models::analysis::{CodingActivityProfile, DAYS_PER_WEEK, HOURS_PER_DAY, MONTHS_PER_YEAR};
use crate::models::commit::RawCommit;

/// Buckets commits by local hour, weekday and month.
pub fn calculate_coding_activity(commits: &[RawCommit]) -> CodingActivityProfile {
    calculate_coding_activity_in(commits, &Local)
}

/// Same as [`calculate_coding_activity`] but in an explicit time zone.
pub fn calculate_coding_activity_in<Tz: TimeZone>(
    commits: &[RawCommit],
    tz: &Tz,
) -> CodingActivityProfile {
    let mut profile = CodingActivityProfile::default();
    if commits.is_empty() {
        return profile;
    }

    let mut first_day = None;
    let mut last_day = None;

    for commit in commits {
        let local = commit.committed_at().with_timezone(tz);
        profile.hourly_distribution[local.hour() as usize % HOURS_PER_DAY] += 1;
        profile.daily_distribution[local.weekday().num_days_from_sunday() as usize % DAYS_PER_WEEK] += 1;
        profile.monthly_distribution[local.month0() as usize % MONTHS_PER_YEAR] += 1;

        let day = local.date_naive();
        first_day = Some(first_day.map_or(day, |d: chrono::NaiveDate| d.min(day)));
        last_day = Some(last_day.map_or(day, |d: chrono::NaiveDate| d.max(day)));
    }

    profile.total_commits = commits.len() as u32;
    profile.most_active_hour = peak_index(&profile.hourly_distribution);
    profile.most_active_day = peak_index(&profile.daily_distribution);
    profile.most_active_month = peak_index(&profile.monthly_distribution);

    let span_days = match (first_day, last_day) {
        (Some(first), Some(last)) => (last - first).num_days() + 1,
        _ => 1,
    };
    profile.average_commits_per_day = profile.total_commits as f64 / span_days.max(1) as f64;

    profile
}

/// Index of the largest bucket; the lowest index wins ties.
pub fn peak_index(buckets: &[u32]) -> usize {
    let mut best = 0;
    for (i, &count) in buckets.iter().enumerate() {
        if count > buckets[best] {
            best = i;
        }
    }
    best
}

/// Commits per coarse part of the day: night (0-5), morning (6-11),
/// afternoon (12-17), evening (18-23).
pub fn time_of_day_breakdown(profile: &CodingActivityProfile) -> [(&'static str, u32); 4] {
    let sum = |range: std::ops::Range<usize>| profile.hourly_distribution[range].iter().sum::<u32>();
    [
        ("Night", sum(0..6)),
        ("Morning", sum(6..12)),
        ("Afternoon", sum(12..18)),
        ("Evening", sum(18..24)),
    ]
}
