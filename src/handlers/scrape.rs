use axum::{
    Json,
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{Extensions, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::client_ip::client_identity;
use crate::error::ScrapeError;
use crate::extract::extract_content;
use crate::metrics::{
    BLOCKED_URLS, CACHE_HITS, CACHE_MISSES, CACHE_SIZE, FETCH_LATENCY, RATE_LIMITED, REQUEST_TOTAL,
};
use crate::models::{ScrapeRequest, ScrapeResponse};
use crate::rate_limit::RateLimitResult;
use crate::state::AppState;
use crate::url_validator::validate_url_for_scraping;

// POST /api/scrape - rate limit, validate, fetch, extract
pub async fn scrape_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    extensions: Extensions,
    body: Bytes,
) -> Response {
    REQUEST_TOTAL.inc();

    let peer = extensions.get::<ConnectInfo<SocketAddr>>().map(|c| c.0);
    let identity = client_identity(&headers, peer, state.trust_proxy);

    // rate limit first, it's the cheap check
    let quota = state.rate_limiter.check(&identity);

    let mut response = match scrape(&state, &identity, quota, &body).await {
        Ok(json) => json.into_response(),
        Err(err) => err.into_response(),
    };

    for (name, value) in state.rate_limiter.headers(&quota) {
        if let Ok(value) = HeaderValue::from_str(&value) {
            response.headers_mut().insert(name, value);
        }
    }
    response
}

async fn scrape(
    state: &AppState,
    identity: &str,
    quota: RateLimitResult,
    body: &[u8],
) -> Result<Json<ScrapeResponse>, ScrapeError> {
    if !quota.allowed {
        RATE_LIMITED.inc();
        warn!(identity, reset_in = quota.reset_in, "Rate limit exceeded");
        return Err(ScrapeError::RateLimited(quota));
    }

    // unreadable JSON is treated like a missing url
    let request: ScrapeRequest = serde_json::from_slice(body).unwrap_or_default();

    let url = validate_url_for_scraping(request.url_str()).inspect_err(|rejection| {
        BLOCKED_URLS.inc();
        info!(identity, %rejection, "Rejected scrape URL");
    })?;

    if let Some(page) = state.cache.get(&url) {
        CACHE_HITS.inc();
        return Ok(Json(ScrapeResponse {
            url: url.to_string(),
            page,
            cached: true,
        }));
    }
    CACHE_MISSES.inc();

    let start_time = Instant::now();
    let html = state.fetcher.fetch(&url).await.inspect_err(|e| {
        warn!(url = %url, error = %e, "Fetch failed");
    })?;
    FETCH_LATENCY.observe(start_time.elapsed().as_secs_f64());

    let page = extract_content(&html, state.max_content_chars);
    state.cache.insert(&url, page.clone());
    CACHE_SIZE.set(state.cache.len() as f64);

    info!(identity, url = %url, words = page.word_count, "Scraped page");

    Ok(Json(ScrapeResponse {
        url: url.to_string(),
        page,
        cached: false,
    }))
}
