use clap::Parser;
use std::time::Duration;

use crate::fetch::FetchConfig;
use crate::rate_limit::RateLimitConfig;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "scrape-gateway")]
#[command(about = "Rate limited, SSRF-safe article scraping endpoint")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "SCRAPE_GATEWAY_PORT", default_value_t = 8080)]
    pub port: u16,

    // Rate limit max requests per window
    #[arg(long, env = "SCRAPE_GATEWAY_RATE_LIMIT", default_value_t = 10)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, env = "SCRAPE_GATEWAY_RATE_WINDOW", default_value_t = 60)]
    pub rate_window: u64,

    // How often expired rate limit and cache entries are swept, in seconds
    #[arg(long, env = "SCRAPE_GATEWAY_SWEEP_INTERVAL", default_value_t = 300)]
    pub sweep_interval: u64,

    // Outbound fetch timeout in seconds
    #[arg(long, env = "SCRAPE_GATEWAY_FETCH_TIMEOUT", default_value_t = 10)]
    pub fetch_timeout: u64,

    // Largest response body accepted from a scraped page
    #[arg(long, env = "SCRAPE_GATEWAY_MAX_BODY_BYTES", default_value_t = 1024 * 1024)]
    pub max_body_bytes: usize,

    // Cache TTL in seconds
    #[arg(short, long, env = "SCRAPE_GATEWAY_CACHE_TTL", default_value_t = 300)]
    pub cache_ttl: u64,

    // Extracted text is cut to this many characters
    #[arg(long, env = "SCRAPE_GATEWAY_MAX_CONTENT_CHARS", default_value_t = 50_000)]
    pub max_content_chars: usize,

    // Take the client identity from X-Forwarded-For / X-Real-IP
    #[arg(long, env = "SCRAPE_GATEWAY_TRUST_PROXY", default_value_t = true, action = clap::ArgAction::Set)]
    pub trust_proxy: bool,
}

impl Args {
    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            max_requests: self.rate_limit,
            window: Duration::from_secs(self.rate_window),
        }
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.fetch_timeout),
            max_body_bytes: self.max_body_bytes,
        }
    }
}
