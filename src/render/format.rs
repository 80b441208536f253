use chrono::{DateTime, Utc};

use crate::analysis::numeric::round_one_decimal;

/// `1234567` -> `"1,234,567"`.
pub fn format_number(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Thousands separators plus one decimal, dropping a trailing `.0` for whole values.
pub fn format_decimal(value: f64) -> String {
    let rounded = round_one_decimal(value);
    let whole = rounded.trunc() as u64;
    let tenths = ((rounded - rounded.trunc()) * 10.0).round() as u64;
    if tenths == 0 {
        format_number(whole)
    } else {
        format!("{}.{}", format_number(whole), tenths)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", round_one_decimal(value))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Coarse "how long ago" label for feed rows and freshness notices.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    match seconds {
        s if s < 0 => "just now".to_string(),
        s if s < 60 => format!("{}s ago", s),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 86_400 * 30 => format!("{}d ago", s / 86_400),
        _ => then.format("%Y-%m-%d").to_string(),
    }
}

pub fn format_hour(hour: usize) -> String {
    format!("{:02}:00", hour)
}
