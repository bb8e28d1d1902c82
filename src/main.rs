use chrono::Utc;
use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use fxsession::api::{BarSource, TwelveDataClient};
use fxsession::cache::SeriesCache;
use fxsession::config::{AppConfig, API_KEY_ENV};
use fxsession::feed::{MarketFeed, RefreshSchedule};
use fxsession::models::Instrument;
use fxsession::render::{caption, render_json, render_table};
use fxsession::summary::assemble_all;
use fxsession::Result;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fxsession", version, about = "FX session ranges and price-action signals")]
struct Cli {
    /// TOML config file (default: config/fxsession.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh once, print the dashboard and exit
    Snapshot {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Disable ANSI colours
        #[arg(long)]
        no_color: bool,
    },
    /// Print the dashboard now and again at every scheduled refresh time
    Watch {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        #[arg(long)]
        no_color: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// Everything one refresh-and-print cycle needs
struct Dashboard<S: BarSource> {
    feed: MarketFeed<S>,
    instruments: Vec<Instrument>,
    config: AppConfig,
    display_tz: Tz,
    format: OutputFormat,
    color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    setup_logging(&config);

    if config.provider.api_key.is_empty() {
        return Err(format!(
            "API key required: set {} or provider.api_key in the config file",
            API_KEY_ENV
        )
        .into());
    }

    let (format, no_color, watch) = match cli.command {
        Command::Snapshot { format, no_color } => (format, no_color, false),
        Command::Watch { format, no_color } => (format, no_color, true),
    };

    let dashboard = build_dashboard(config, format, !no_color)?;

    tracing::info!(
        "Tracking {} pairs on {} timeframes (cache TTL {}s)",
        dashboard.instruments.len(),
        dashboard.feed.timeframes().len(),
        dashboard.feed.cache().ttl().as_secs()
    );

    if watch {
        run_watch(&dashboard, tokio::signal::ctrl_c()).await
    } else {
        run_cycle(&dashboard).await
    }
}

// ============================================================================
// Initialization
// ============================================================================

fn setup_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_dashboard(
    config: AppConfig,
    format: OutputFormat,
    color: bool,
) -> Result<Dashboard<TwelveDataClient>> {
    let instruments = config.instruments()?;
    let display_tz: Tz = config
        .display
        .timezone
        .parse()
        .map_err(|e| format!("Invalid display timezone {}: {}", config.display.timezone, e))?;

    let client = TwelveDataClient::new(config.provider.clone(), config.retry.clone())?;
    let cache = SeriesCache::new(Duration::from_secs(config.cache.ttl_secs));
    let feed = MarketFeed::new(client, cache, config.timeframes.clone());

    Ok(Dashboard {
        feed,
        instruments,
        color: color && config.display.color,
        config,
        display_tz,
        format,
    })
}

// ============================================================================
// Refresh cycles
// ============================================================================

async fn run_cycle<S: BarSource>(dashboard: &Dashboard<S>) -> Result<()> {
    let report = dashboard.feed.refresh(&dashboard.instruments).await;
    let rows = assemble_all(&report.series, &dashboard.config.priority);

    if rows.is_empty() {
        tracing::warn!("No rows could be built this cycle");
    }

    match dashboard.format {
        OutputFormat::Json => println!("{}", render_json(&rows)?),
        OutputFormat::Table => {
            println!("{}", caption(Utc::now(), dashboard.display_tz));
            println!();
            print!("{}", render_table(&rows, dashboard.color));
            println!();
            println!(
                "{} pairs · refreshes {} {}",
                rows.len(),
                dashboard.config.refresh.times.join(", "),
                dashboard.config.refresh.timezone
            );
        }
    }

    Ok(())
}

/// Render now and at every scheduled time until `shutdown` resolves
///
/// `shutdown` is polled during refreshes as well as between them.
async fn run_watch<S, F>(dashboard: &Dashboard<S>, shutdown: F) -> Result<()>
where
    S: BarSource,
    F: Future,
{
    let schedule = RefreshSchedule::from_config(&dashboard.config.refresh)?;
    tokio::pin!(shutdown);

    tokio::select! {
        _ = &mut shutdown => {
            tracing::info!("Shutdown requested during refresh, exiting...");
            return Ok(());
        }
        result = run_cycle(dashboard) => result?,
    }

    loop {
        let now = Utc::now();
        let next = schedule
            .next_after(now)
            .ok_or("No upcoming refresh time in schedule")?;
        let wait = (next - now).to_std().unwrap_or_default();

        tracing::info!(
            "Next refresh at {} (in {}m)",
            next.with_timezone(&schedule.timezone()).format("%Y-%m-%d %H:%M %Z"),
            wait.as_secs() / 60
        );

        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Received Ctrl+C, shutting down...");
                break;
            }
            _ = tokio::time::sleep(wait) => {}
        }

        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested during refresh, exiting...");
                break;
            }
            result = run_cycle(dashboard) => {
                if let Err(e) = result {
                    tracing::error!("Refresh cycle failed: {}", e);
                }
            }
        }
    }

    Ok(())
}
