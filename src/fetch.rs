use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::ScrapeError;
use crate::url_validator::validate_url_for_scraping;

const MAX_REDIRECTS: usize = 5;
const USER_AGENT: &str = "Mozilla/5.0 (compatible; ScrapeGateway/0.1; +https://example.com/bot)";

#[derive(Debug, Clone, Copy)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_body_bytes: 1024 * 1024,
        }
    }
}

// Outbound HTTP for scraping. Callers validate the first URL,
// every redirect hop is validated here.
pub struct Fetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self, reqwest::Error> {
        let redirects = Policy::custom(|attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                return attempt.error("too many redirects");
            }
            match validate_url_for_scraping(Some(attempt.url().as_str())) {
                Ok(_) => attempt.follow(),
                Err(rejection) => {
                    warn!(target_url = %attempt.url(), %rejection, "Blocked redirect");
                    attempt.error(rejection)
                }
            }
        });

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .redirect(redirects)
            .no_proxy()
            .build()?;

        Ok(Self { client, config })
    }

    /// Download a page as text, enforcing the timeout and body size cap.
    pub async fn fetch(&self, url: &Url) -> Result<String, ScrapeError> {
        let max = self.config.max_body_bytes;

        let mut response = self
            .client
            .get(url.clone())
            .header("Accept", "text/html,application/xhtml+xml,text/plain;q=0.9")
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Upstream(format!("HTTP {}", status)));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();
        if !is_supported_content(&content_type) {
            return Err(ScrapeError::UnsupportedContent(content_type));
        }

        // fail fast when the server announces a big body
        if response.content_length().is_some_and(|len| len > max as u64) {
            return Err(ScrapeError::TooLarge { max });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(classify)? {
            if body.len() + chunk.len() > max {
                return Err(ScrapeError::TooLarge { max });
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url = %url, bytes = body.len(), "Fetched page");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

fn is_supported_content(content_type: &str) -> bool {
    content_type.is_empty()
        || content_type.contains("text/html")
        || content_type.contains("application/xhtml")
        || content_type.contains("text/plain")
}

fn classify(err: reqwest::Error) -> ScrapeError {
    if err.is_timeout() {
        ScrapeError::Timeout
    } else {
        ScrapeError::Upstream(err.to_string())
    }
}
