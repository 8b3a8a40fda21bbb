//! Headless front-end for the sentiment data layer
//!
//! Wires the components the way the dashboard UI does: load config, sign in
//! with the token from the environment, bulk-load the watchlist, fetch the
//! sentiment listing, run the pipeline, print one page, and warm the avatar
//! cache for the window around it.

use anyhow::{Context, Result};
use clap::Parser;
use sentiment_client::config::Config;
use sentiment_client::pipeline::{self, paging};
use sentiment_client::{
    FilterState, HttpGateway, ImagePrefetcher, SentimentFeed, WatchlistKind, WatchlistStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Principal whose watchlist to load
    #[arg(short, long)]
    principal: String,

    /// Free-text search term applied to the listing
    #[arg(short, long, default_value = "")]
    search: String,

    /// Page index to render
    #[arg(long, default_value_t = 0)]
    page: usize,

    /// Sort the page by accuracy descending
    #[arg(long)]
    sort_by_accuracy: bool,

    /// Show only watchlisted authors
    #[arg(long)]
    watched_only: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let config = Config::from_file_with_env(&args.config)
        .with_context(|| format!("loading config from {}", args.config))?;
    let token = Config::token_from_env();
    if token.is_none() {
        warn!("No bearer token in environment; authenticated requests will fail");
    }

    let gateway: Arc<dyn sentiment_client::Gateway> = Arc::new(HttpGateway::new(
        config.gateway.base_url.clone(),
        Duration::from_secs(config.gateway.timeout_secs),
        token,
    )?);

    let store = WatchlistStore::new(Arc::clone(&gateway));
    store.load(&args.principal).await;
    if let Some(err) = store.error() {
        warn!(error = %err, "Watchlist unavailable, continuing without it");
    }
    if args.watched_only {
        store.toggle_view(WatchlistKind::User);
    }

    let feed = SentimentFeed::new(Arc::clone(&gateway));
    feed.refresh().await;
    if let Some(err) = feed.error() {
        anyhow::bail!("sentiment listing unavailable: {err}");
    }

    let rows = feed.rows();
    let filter = FilterState {
        sort_by_accuracy: args.sort_by_accuracy,
        ..Default::default()
    };
    let visible = pipeline::apply(
        &rows,
        &args.search,
        &filter,
        store.view_enabled(WatchlistKind::User),
        &store.members(WatchlistKind::User),
    );

    let page_size = config.table.desktop_page_size;
    let page = paging::page_slice(&visible, args.page, page_size);
    info!(
        total = visible.len(),
        page = args.page,
        shown = page.len(),
        "Rendering page"
    );
    for row in page {
        println!(
            "{:<24} {:<10} {:>4}%  updated {}",
            row.username, row.timeframe, row.accuracy, row.last_updated
        );
    }

    if config.avatars.preload_enabled {
        let prefetcher = ImagePrefetcher::new(Arc::clone(&gateway));
        let usernames: Vec<String> = visible.iter().map(|r| r.username.clone()).collect();
        let cache = prefetcher.fetch_batch(&usernames).await;
        prefetcher.preload_window(&cache, &visible, args.page, page_size);
        // Give the detached warmers a moment before the process exits; in the
        // dashboard this is the browser staying alive, here it is a grace delay
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    Ok(())
}
