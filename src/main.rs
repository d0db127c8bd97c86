use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use beacon::config::{Config, StoreBackend};
use beacon::notify::{EmailJsSink, NotificationSink};
use beacon::profile::{ClientSignals, GeoLookup, IpApiLookup};
use beacon::store::{GateStore, MemoryGateStore, SqliteGateStore};
use beacon::tracker::VisitorNotifier;

#[derive(Parser)]
#[command(name = "beacon")]
#[command(about = "Best-effort visitor notification CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Perform one tracking attempt (gated to once per window per store)
    Track {
        /// User-agent string to classify; defaults to $BEACON_USER_AGENT
        #[arg(long)]
        user_agent: Option<String>,
        /// Screen dimensions as WxH, e.g. 1920x1080
        #[arg(long)]
        screen: Option<String>,
        /// Referring URL
        #[arg(long)]
        referrer: Option<String>,
        /// Language tag; defaults to a tag derived from $LANG
        #[arg(long)]
        language: Option<String>,
    },
    /// Show the persisted gate state
    Status,
    /// Clear the persisted gate so the next visit is tracked again
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store: Arc<dyn GateStore> = match config.store.backend {
        StoreBackend::Sqlite => {
            info!("Using SQLite gate store: {}", config.store.url);
            Arc::new(SqliteGateStore::new(&config.store.url).await?)
        }
        StoreBackend::Memory => {
            info!("Using in-memory gate store");
            Arc::new(MemoryGateStore::new())
        }
    };
    store.init().await?;

    match cli.command {
        Commands::Track {
            user_agent,
            screen,
            referrer,
            language,
        } => {
            let dispatch = config.dispatch.clone().context(
                "EMAILJS_SERVICE_ID, EMAILJS_TEMPLATE_ID and EMAILJS_PUBLIC_KEY must be set to send notifications",
            )?;

            let signals = ClientSignals {
                user_agent: user_agent
                    .or_else(|| std::env::var("BEACON_USER_AGENT").ok())
                    .unwrap_or_default(),
                screen: screen.as_deref().map(parse_screen).transpose()?,
                referrer,
                language: language.or_else(language_from_env),
            };

            let lookup: Arc<dyn GeoLookup> =
                Arc::new(IpApiLookup::new(config.geo.endpoint.clone())?);
            let sink: Arc<dyn NotificationSink> = Arc::new(EmailJsSink::new(&dispatch)?);

            let notifier = VisitorNotifier::new(
                store,
                lookup,
                sink,
                config.tracking.window_hours,
                dispatch.recipient,
            );
            notifier.track_visitor(&signals).await;
        }
        Commands::Status => {
            let window_ms = config.tracking.window_hours * 60 * 60 * 1000;
            match store.last_tracked().await {
                Ok(Some(last)) => {
                    let when = Utc
                        .timestamp_millis_opt(last)
                        .single()
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| format!("{last} ms"));
                    let open = Utc::now().timestamp_millis() - last >= window_ms;
                    println!("Last tracked: {when}");
                    println!(
                        "Gate: {}",
                        if open { "open (eligible)" } else { "closed" }
                    );
                }
                Ok(None) => {
                    println!("Last tracked: never");
                    println!("Gate: open (eligible)");
                }
                Err(e) => {
                    println!("Last tracked: unreadable ({e})");
                    println!("Gate: open (eligible)");
                }
            }
        }
        Commands::Reset => {
            store.clear().await?;
            println!("Tracking gate cleared");
        }
    }

    Ok(())
}

/// Parse a "WxH" dimension string
fn parse_screen(value: &str) -> Result<(u32, u32)> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .context("screen must be WxH, e.g. 1920x1080")?;
    Ok((
        w.trim().parse().context("screen width must be an integer")?,
        h.trim().parse().context("screen height must be an integer")?,
    ))
}

/// Derive a BCP 47-ish language tag from $LANG ("en_US.UTF-8" -> "en-US")
fn language_from_env() -> Option<String> {
    let lang = std::env::var("LANG").ok()?;
    let tag = lang.split('.').next().unwrap_or(&lang).replace('_', "-");
    if tag.is_empty() || tag == "C" || tag == "POSIX" {
        return None;
    }
    Some(tag)
}
