use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing::{debug, info};

use crate::metrics::{CACHE_SIZE, RATE_LIMIT_ENTRIES};
use crate::state::AppState;

// Background cleanup - drops expired rate limit windows and stale cache pages.
// Request handling never waits on this; expired windows are also reset lazily.
pub async fn sweeper(state: Arc<AppState>, every: Duration) {
    let mut interval = interval(every);

    info!(interval = ?every, "Sweeper started");

    loop {
        interval.tick().await;

        let windows = state.rate_limiter.sweep();
        let pages = state.cache.purge_expired();
        RATE_LIMIT_ENTRIES.set(state.rate_limiter.len() as f64);
        CACHE_SIZE.set(state.cache.len() as f64);

        if windows > 0 || pages > 0 {
            debug!(windows, pages, "Swept expired entries");
        }
    }
}
