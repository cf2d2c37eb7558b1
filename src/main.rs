mod cache;
mod client_ip;
mod config;
mod error;
mod extract;
mod fetch;
mod handlers;
mod metrics;
mod models;
mod rate_limit;
mod state;
mod sweeper;
mod url_validator;

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cache::PageCache;
use crate::config::Args;
use crate::fetch::Fetcher;
use crate::rate_limit::RateLimiter;
use crate::state::AppState;

// this is main async function with tokio
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scrape_gateway=info")),
        )
        .init();

    // parse cli arguments
    let args = Args::parse();

    // creating shared state
    let state = Arc::new(AppState {
        rate_limiter: RateLimiter::new(args.rate_limit_config()),
        fetcher: Fetcher::new(args.fetch_config())?,
        cache: PageCache::new(Duration::from_secs(args.cache_ttl)),
        trust_proxy: args.trust_proxy,
        max_content_chars: args.max_content_chars,
    });

    // spawn the background sweeper
    let sweep_state = Arc::clone(&state);
    let sweep_every = Duration::from_secs(args.sweep_interval);
    tokio::spawn(async move {
        sweeper::sweeper(sweep_state, sweep_every).await;
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(port = args.port, "Scrape gateway running");
    info!(
        limit = args.rate_limit,
        window_secs = args.rate_window,
        "Rate limit configured"
    );
    info!(
        timeout_secs = args.fetch_timeout,
        max_body_bytes = args.max_body_bytes,
        cache_ttl_secs = args.cache_ttl,
        trust_proxy = args.trust_proxy,
        "Fetch configured"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
