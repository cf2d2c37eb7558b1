use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};
use url::Url;

use crate::extract::PageContent;

// Cache entry with timestamp
#[derive(Clone)]
pub struct CacheEntry {
    pub page: PageContent,
    pub created_at: Instant,
}

// Scraped pages by URL, so repeat requests don't hit the site again
pub struct PageCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, url: &Url) -> Option<PageContent> {
        let entry = self.entries.get(&make_cache_key(url))?;
        if entry.created_at.elapsed() < self.ttl {
            Some(entry.page.clone())
        } else {
            None
        }
    }

    pub fn insert(&self, url: &Url, page: PageContent) {
        self.entries.insert(
            make_cache_key(url),
            CacheEntry {
                page,
                created_at: Instant::now(),
            },
        );
    }

    // Remove stale pages, returns how many were dropped
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.created_at.elapsed() < self.ttl);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// Create a cache key (hash of the normalised URL)
pub fn make_cache_key(url: &Url) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_str());
    format!("{:x}", hasher.finalize())
}
