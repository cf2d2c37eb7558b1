use crate::cache::PageCache;
use crate::fetch::Fetcher;
use crate::rate_limit::RateLimiter;

// app's shared state
pub struct AppState {
    pub rate_limiter: RateLimiter,
    pub fetcher: Fetcher,
    pub cache: PageCache,
    pub trust_proxy: bool,       // read identity from proxy headers
    pub max_content_chars: usize, // extracted text cut-off
}
