mod health;
mod metrics;
mod scrape;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use scrape::scrape_handler;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::state::AppState;

// creating the router with routes
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/scrape", post(scrape_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}
