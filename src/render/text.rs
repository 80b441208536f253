use crate::render::chart::{Chart, ChartKind};
use crate::render::format::{format_decimal, format_percent};
use crate::render::page::{HeatmapGrid, Page, Panel, PanelBody};

const BAR_WIDTH: usize = 30;
const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const HEAT: [char; 5] = ['·', '░', '▒', '▓', '█'];
const DAY_INITIALS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

pub fn render_text(page: &Page) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n=== {} ===\n", page.title));

    let tabs: Vec<String> = page
        .tabs
        .iter()
        .map(|tab| {
            if tab.active {
                format!("[{}:{}]", tab.hotkey, tab.name)
            } else {
                format!(" {}:{} ", tab.hotkey, tab.name)
            }
        })
        .collect();
    output.push_str(&tabs.join(" "));
    output.push_str("\n\n");

    for panel in &page.panels {
        output.push_str(&render_panel(panel));
        output.push('\n');
    }

    output.push_str(&format!(
        "Rendered at {}\n",
        page.rendered_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(ref footer) = page.footer {
        output.push_str(footer);
        output.push('\n');
    }

    output
}

pub fn render_panel(panel: &Panel) -> String {
    let mut output = format!("--- {} ---\n", panel.title);
    if let Some(ref notice) = panel.notice {
        let marker = if panel.stale { "!" } else { "i" };
        output.push_str(&format!("  ({}) {}\n", marker, notice));
    }

    match &panel.body {
        PanelBody::Skeleton { rows } => {
            for _ in 0..*rows {
                output.push_str(&format!("  {}\n", "░".repeat(BAR_WIDTH)));
            }
        }
        PanelBody::Empty { message } => {
            output.push_str(&format!("  {}\n", message));
        }
        PanelBody::Error { message, retry_hint } => {
            output.push_str(&format!("  Error: {} ({})\n", message, retry_hint));
        }
        PanelBody::Metrics { metrics } => {
            let width = metrics.iter().map(|m| m.label.len()).max().unwrap_or(0);
            for metric in metrics {
                output.push_str(&format!("  {:<width$}  {}", metric.label, metric.value, width = width));
                if let Some(ref hint) = metric.hint {
                    output.push_str(&format!("  ({})", hint));
                }
                output.push('\n');
            }
        }
        PanelBody::Chart { chart } => output.push_str(&render_chart(chart)),
        PanelBody::Feed { rows } => {
            let mut current_group: Option<&str> = None;
            for row in rows {
                if let Some(ref group) = row.group {
                    if current_group != Some(group.as_str()) {
                        output.push_str(&format!("  [{}]\n", group));
                        current_group = Some(group.as_str());
                    }
                }
                let status = row
                    .status
                    .as_ref()
                    .map(|s| format!(" [{}]", s))
                    .unwrap_or_default();
                output.push_str(&format!(
                    "  {:<12} {}{}\n    {} · {}\n",
                    row.kind, row.title, status, row.subtitle, row.when
                ));
            }
        }
        PanelBody::Heatmap { grid } => output.push_str(&render_heatmap(grid)),
    }

    output
}

pub fn render_chart(chart: &Chart) -> String {
    match chart.kind {
        ChartKind::Bar => render_bars(chart),
        ChartKind::Line | ChartKind::Area => render_sparklines(chart),
        ChartKind::Pie => render_shares(chart),
        ChartKind::Radial => render_gauges(chart),
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.clamp(1, BAR_WIDTH))
}

fn label_width(chart: &Chart) -> usize {
    chart.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0)
}

fn unit_suffix(chart: &Chart) -> String {
    chart
        .unit
        .as_ref()
        .map(|u| format!(" {}", u))
        .unwrap_or_default()
}

fn render_bars(chart: &Chart) -> String {
    let mut output = String::new();
    let max = chart.max_value();
    let width = label_width(chart);
    let unit = unit_suffix(chart);

    for series in &chart.series {
        if chart.series.len() > 1 {
            output.push_str(&format!("  {} ({})\n", series.name, series.color.name()));
        }
        for (label, value) in chart.labels.iter().zip(&series.values) {
            output.push_str(&format!(
                "  {:<width$} │{:<bar_width$} {}{}\n",
                label,
                bar(*value, max),
                format_decimal(*value),
                unit,
                width = width,
                bar_width = BAR_WIDTH,
            ));
        }
    }
    output
}

pub fn sparkline(values: &[f64]) -> String {
    let max = values.iter().copied().fold(0.0, f64::max);
    values
        .iter()
        .map(|v| {
            if max <= 0.0 || *v <= 0.0 {
                SPARKS[0]
            } else {
                let index = ((v / max) * (SPARKS.len() - 1) as f64).round() as usize;
                SPARKS[index.min(SPARKS.len() - 1)]
            }
        })
        .collect()
}

fn render_sparklines(chart: &Chart) -> String {
    let mut output = String::new();
    for series in &chart.series {
        let peak = series.values.iter().copied().fold(0.0, f64::max);
        output.push_str(&format!(
            "  {:<10} {}  peak {}{}\n",
            series.name,
            sparkline(&series.values),
            format_decimal(peak),
            unit_suffix(chart)
        ));
    }
    if let (Some(first), Some(last)) = (chart.labels.first(), chart.labels.last()) {
        output.push_str(&format!("  {:<10} {} .. {}\n", "", first, last));
    }
    output
}

fn render_shares(chart: &Chart) -> String {
    let mut output = String::new();
    let Some(series) = chart.series.first() else {
        return output;
    };
    let total: f64 = series.values.iter().sum();
    let width = label_width(chart);

    for (i, (label, value)) in chart.labels.iter().zip(&series.values).enumerate() {
        let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
        output.push_str(&format!(
            "  {:<width$} │{:<bar_width$} {} ({})\n",
            label,
            bar(share, 100.0),
            format_percent(share),
            chart.slice_color(i).hex(),
            width = width,
            bar_width = BAR_WIDTH,
        ));
    }
    output
}

fn render_gauges(chart: &Chart) -> String {
    let mut output = String::new();
    let Some(series) = chart.series.first() else {
        return output;
    };
    let total: f64 = series.values.iter().sum();
    let width = label_width(chart);

    for (label, value) in chart.labels.iter().zip(&series.values) {
        let share = if total > 0.0 { value / total } else { 0.0 };
        let filled = (share * 10.0).round() as usize;
        output.push_str(&format!(
            "  {:<width$} ({}{}) {}\n",
            label,
            "●".repeat(filled),
            "○".repeat(10 - filled.min(10)),
            format_decimal(*value),
            width = width,
        ));
    }
    output
}

pub fn render_heatmap(grid: &HeatmapGrid) -> String {
    let mut output = String::new();
    for (day, initial) in DAY_INITIALS.iter().enumerate() {
        output.push_str(&format!("  {} ", initial));
        for week in &grid.weeks {
            let glyph = match week[day] {
                Some(level) => HEAT[(level as usize).min(HEAT.len() - 1)],
                None => ' ',
            };
            output.push(glyph);
        }
        output.push('\n');
    }
    if let (Some(first), Some(last)) = (&grid.first_date, &grid.last_date) {
        output.push_str(&format!("    {} .. {}   less {} more\n", first, last, HEAT.iter().collect::<String>()));
    }
    output
}
