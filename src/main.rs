//! Leaderboard API server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Leaderboard API                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐    ┌──────────────┐    ┌──────────────┐       │
//! │  │  Pagination  │───▶│  Leaderboard │───▶│    Cache     │       │
//! │  │   Resolver   │    │   Fetcher    │    │   Gateway    │       │
//! │  └──────────────┘    └──────────────┘    └──────────────┘       │
//! │          │                   │                                   │
//! │          └──────▶  Leaderboard Source  ◀──────┘                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use leaderboards::adapters::{InMemoryCache, InMemoryLeaderboardSource};
use leaderboards::cache::GatewayConfig;
use leaderboards::{server, LeaderboardService};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Leaderboard API - paginated balance rankings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// API bind address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    listen_addr: String,

    /// JSON file of balances to serve, keyed by leaderboard id
    #[arg(long, env = "SEED_FILE")]
    seed_file: Option<PathBuf>,

    /// Lifetime of cached leaderboard snapshots in seconds
    #[arg(long, env = "CACHE_TTL_SECONDS", default_value = "300")]
    cache_ttl_seconds: u64,

    /// Interval between sweeps of expired cache entries in seconds
    #[arg(long, env = "CACHE_PURGE_INTERVAL_SECONDS", default_value = "60")]
    cache_purge_interval_seconds: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(&args)?;

    info!("Starting leaderboard API");
    info!("  Listen address: {}", args.listen_addr);
    info!("  Cache TTL: {}s", args.cache_ttl_seconds);

    let source = match &args.seed_file {
        Some(path) => InMemoryLeaderboardSource::from_seed_file(path)
            .with_context(|| format!("loading seed file {}", path.display()))?,
        None => {
            info!("No seed file given, serving empty leaderboards");
            InMemoryLeaderboardSource::new()
        }
    };
    let cache = Arc::new(InMemoryCache::new());

    let service = Arc::new(LeaderboardService::with_config(
        cache.clone(),
        Arc::new(source),
        GatewayConfig {
            ttl: Duration::from_secs(args.cache_ttl_seconds),
        },
    ));

    let shutdown = CancellationToken::new();

    // Ctrl-C triggers graceful shutdown
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }
        signal_token.cancel();
    });

    // Expired entries are dropped lazily on read; sweep the rest
    let purge_token = shutdown.clone();
    let purge_interval = Duration::from_secs(args.cache_purge_interval_seconds.max(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(purge_interval);
        loop {
            tokio::select! {
                _ = purge_token.cancelled() => break,
                _ = ticker.tick() => {
                    let purged = cache.purge_expired();
                    if purged > 0 {
                        debug!("Purged {} expired cache entries", purged);
                    }
                }
            }
        }
    });

    let listener = TcpListener::bind(&args.listen_addr)
        .await
        .with_context(|| format!("binding {}", args.listen_addr))?;

    server::serve(listener, service, shutdown).await?;

    info!("Leaderboard API shutdown complete");
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse()?);

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
    Ok(())
}
