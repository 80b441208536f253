use std::io::Write;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use ghpulse::dashboard::command::{Command, HELP};
use ghpulse::github::Endpoint;
use ghpulse::render::Page;
use ghpulse::{Config, Dashboard, DashboardConfig, DashboardTab, MetricsClient, OutputFormat, PollingCache};

#[derive(Parser, Debug)]
#[command(name = "ghpulse")]
#[command(version = "0.1.0")]
#[command(about = "Poll a GitHub metrics API and render dashboard views")]
struct Args {
    /// Base URL of the metrics API (overrides GHPULSE_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one tab once its data has loaded
    Show {
        /// Tab to render (overview, realtime, activity, repositories)
        #[arg(short, long, default_value = "overview")]
        tab: String,

        /// Output format (text, markdown, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Keep polling and redraw on every update
    Watch {
        #[arg(short, long, default_value = "overview")]
        tab: String,
    },
    /// Print one endpoint's JSON payload
    Raw {
        /// activity, repositories, contributions, stats:overview, stats:languages, stats:repositories
        endpoint: String,

        /// Print the whole response body instead of its `data` field
        #[arg(long)]
        envelope: bool,
    },
    /// Ask the server to drop its cached GitHub responses
    ClearCache,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so rendered pages stay clean on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("ghpulse=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(api_base) = args.api_base {
        config.api_base = api_base.trim_end_matches('/').to_string();
    }

    let client = MetricsClient::from_config(&config)?;
    tracing::debug!("Using metrics API at {}", client.base_url());

    match args.command {
        Commands::Show { tab, format, output } => {
            let tab: DashboardTab = tab.parse()?;
            let format: OutputFormat = format.parse()?;
            show(client, &config, tab, format, output).await
        }
        Commands::Watch { tab } => watch(client, &config, tab.parse()?).await,
        Commands::Raw { endpoint, envelope } => {
            let endpoint: Endpoint = endpoint.parse()?;
            let body = if envelope {
                client.get_json(&endpoint.path()).await?
            } else {
                match client.get::<serde_json::Value>(endpoint).await? {
                    Some(data) => data,
                    None => {
                        tracing::warn!("{} returned no data", endpoint.path());
                        serde_json::Value::Null
                    }
                }
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Commands::ClearCache => {
            client.clear_cache().await?;
            println!("Server cache cleared");
            Ok(())
        }
    }
}

async fn show(
    client: MetricsClient,
    config: &Config,
    tab: DashboardTab,
    format: OutputFormat,
    output: Option<String>,
) -> anyhow::Result<()> {
    let cache = PollingCache::new(client);
    let mut dashboard = Dashboard::with_tab(cache, DashboardConfig::from(config), tab);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Loading {} ...", tab.name()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let settled = tokio::time::timeout(config.settle_timeout, async {
        while !dashboard.is_settled() {
            dashboard.changed().await;
        }
    })
    .await;
    spinner.finish_and_clear();

    if settled.is_err() {
        tracing::warn!(
            "Gave up waiting after {:?}; rendering what has loaded",
            config.settle_timeout
        );
    }

    let page = dashboard.render(Utc::now());
    let rendered = ghpulse::render::render(&page, format)?;

    if let Some(ref path) = output {
        std::fs::write(path, &rendered)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

/// Clears the screen, homes the cursor and writes one frame.
fn draw(out: &mut impl Write, page: &Page) -> anyhow::Result<()> {
    write!(out, "\x1b[2J\x1b[H{}", ghpulse::render::render(page, OutputFormat::Text)?)?;
    out.flush()?;
    Ok(())
}

async fn watch(client: MetricsClient, config: &Config, tab: DashboardTab) -> anyhow::Result<()> {
    let cache = PollingCache::new(client);
    let mut dashboard = Dashboard::with_tab(cache, DashboardConfig::from(config), tab);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut message: Option<String> = None;

    loop {
        let mut page = dashboard.render(Utc::now());
        page.footer = Some(match message.take() {
            Some(message) => format!("{}\n{}", message, HELP),
            None => HELP.to_string(),
        });
        draw(&mut std::io::stdout().lock(), &page)?;

        tokio::select! {
            _ = dashboard.changed() => {}
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => {
                        if !dashboard.apply(command).await {
                            break;
                        }
                    }
                    Err(e) => message = Some(e.to_string()),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufWriter;

    #[test]
    fn test_draw_flushes_whole_frame() {
        let page = Page {
            title: "GitHub Pulse".to_string(),
            tabs: Vec::new(),
            panels: Vec::new(),
            rendered_at: Utc::now(),
            footer: Some(HELP.to_string()),
        };
        let mut out = BufWriter::new(Vec::new());
        draw(&mut out, &page).unwrap();

        assert!(out.buffer().is_empty());
        let frame = String::from_utf8(out.into_inner().unwrap()).unwrap();
        assert!(frame.starts_with("\x1b[2J\x1b[H"));
        assert!(frame.contains("GitHub Pulse"));
    }
}
