use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::PageContent;

// Scrape request body; `url` stays untyped so non-strings reach the validator
#[derive(Deserialize, Debug, Default)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: Option<Value>,
}

impl ScrapeRequest {
    pub fn url_str(&self) -> Option<&str> {
        self.url.as_ref().and_then(Value::as_str)
    }
}

// Scrape response format
#[derive(Serialize, Debug)]
pub struct ScrapeResponse {
    pub url: String,
    #[serde(flatten)]
    pub page: PageContent,
    pub cached: bool,
}
