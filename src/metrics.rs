use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("scrape_requests_total", "Total number of scrape requests").unwrap();
    pub static ref RATE_LIMITED: Counter =
        register_counter!("scrape_rate_limited_total", "Requests rejected by the rate limiter").unwrap();
    pub static ref BLOCKED_URLS: Counter =
        register_counter!("scrape_blocked_urls_total", "Requests rejected by URL validation").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("scrape_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("scrape_cache_misses_total", "Total cache misses").unwrap();
    pub static ref FETCH_LATENCY: Histogram = register_histogram!(
        "scrape_fetch_latency_seconds",
        "Outbound fetch latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("scrape_cache_size", "Current number of pages in cache").unwrap();
    pub static ref RATE_LIMIT_ENTRIES: Gauge =
        register_gauge!("scrape_rate_limit_entries", "Identities currently tracked by the rate limiter").unwrap();
}
