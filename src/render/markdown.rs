use crate::render::chart::{Chart, ChartKind};
use crate::render::format::{format_decimal, format_percent};
use crate::render::page::{Page, Panel, PanelBody};
use crate::render::text::render_heatmap;

pub fn render_markdown(page: &Page) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", page.title));

    let tabs: Vec<String> = page
        .tabs
        .iter()
        .map(|tab| {
            if tab.active {
                format!("**{}**", tab.name)
            } else {
                tab.name.clone()
            }
        })
        .collect();
    output.push_str(&tabs.join(" | "));
    output.push_str("\n\n");

    for panel in &page.panels {
        output.push_str(&render_panel(panel));
        output.push('\n');
    }

    output.push_str(&format!(
        "*Rendered at {}*\n",
        page.rendered_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut output = format!("| {} |\n", headers.join(" | "));
    output.push_str(&format!(
        "|{}\n",
        headers.iter().map(|_| "---|").collect::<String>()
    ));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| escape(c)).collect();
        output.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    output
}

fn render_panel(panel: &Panel) -> String {
    let mut output = format!("## {}\n\n", panel.title);
    if let Some(ref notice) = panel.notice {
        output.push_str(&format!("> {}\n\n", notice));
    }

    match &panel.body {
        PanelBody::Skeleton { .. } => output.push_str("_Loading..._\n"),
        PanelBody::Empty { message } => output.push_str(&format!("_{}_\n", message)),
        PanelBody::Error { message, retry_hint } => {
            output.push_str(&format!("**Error:** {} ({})\n", message, retry_hint));
        }
        PanelBody::Metrics { metrics } => {
            let rows: Vec<Vec<String>> = metrics
                .iter()
                .map(|m| vec![m.label.clone(), m.value.clone()])
                .collect();
            output.push_str(&table(&["Metric", "Value"], &rows));
        }
        PanelBody::Chart { chart } => output.push_str(&render_chart(chart)),
        PanelBody::Feed { rows } => {
            let rows: Vec<Vec<String>> = rows
                .iter()
                .map(|r| {
                    vec![
                        r.when.clone(),
                        r.kind.clone(),
                        format!("[{}]({})", r.title, r.url),
                        r.repository.clone(),
                        r.status.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            output.push_str(&table(&["When", "Kind", "Title", "Repository", "Status"], &rows));
        }
        PanelBody::Heatmap { grid } => {
            output.push_str("```\n");
            output.push_str(&render_heatmap(grid));
            output.push_str("```\n");
        }
    }

    output
}

fn render_chart(chart: &Chart) -> String {
    match chart.kind {
        ChartKind::Pie | ChartKind::Radial => {
            let values = chart
                .series
                .first()
                .map(|s| s.values.as_slice())
                .unwrap_or_default();
            let total: f64 = values.iter().sum();
            let rows: Vec<Vec<String>> = chart
                .labels
                .iter()
                .zip(values)
                .map(|(label, value)| {
                    let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                    vec![label.clone(), format_decimal(*value), format_percent(share)]
                })
                .collect();
            table(&["Label", "Value", "Share"], &rows)
        }
        _ => {
            let mut headers = vec!["Label"];
            headers.extend(chart.series.iter().map(|s| s.name.as_str()));
            let rows: Vec<Vec<String>> = chart
                .labels
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    let mut row = vec![label.clone()];
                    row.extend(chart.series.iter().map(|s| {
                        s.values
                            .get(i)
                            .map(|v| format_decimal(*v))
                            .unwrap_or_default()
                    }));
                    row
                })
                .collect();
            table(&headers, &rows)
        }
    }
}
