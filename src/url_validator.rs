//! SSRF gate for caller supplied URLs.
//!
//! Decides whether a URL is safe to fetch from the server. The check is a pure
//! string/IP analysis of the parsed URL: no DNS lookups happen here, so a name
//! that later resolves to a private address is not caught by this module.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use url::Url;

// Exact hostnames that always point back at the machine itself
const BLOCKED_HOSTNAMES: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0", "::1", "[::1]"];

// Internal-only name suffixes
const BLOCKED_SUFFIXES: &[&str] = &[".local", ".localhost", ".internal"];

lazy_static! {
    static ref IPV4_LIKE: Regex = Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").unwrap();
    static ref IPV6_LIKE: Regex = Regex::new(r"^\[?[0-9a-f:]+\]?$").unwrap();
    static ref PRIVATE_RANGES: Vec<Regex> = [
        r"^127\.",                               // loopback 127.0.0.0/8
        r"^10\.",                                // private 10.0.0.0/8
        r"^172\.(1[6-9]|2[0-9]|3[01])\.",        // private 172.16.0.0/12
        r"^192\.168\.",                          // private 192.168.0.0/16
        r"^169\.254\.",                          // link-local 169.254.0.0/16
        r"^0\.",                                 // current network 0.0.0.0/8
        r"^100\.(6[4-9]|[7-9][0-9]|1[01][0-9]|12[0-7])\.", // shared 100.64.0.0/10
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
}

/// Why a URL was refused. The `Display` text is returned to clients verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UrlRejection {
    #[error("URL is required")]
    Missing,
    #[error("Invalid URL format")]
    Malformed,
    #[error("Only HTTP and HTTPS protocols are allowed")]
    Protocol,
    #[error("Access to local/internal hosts is not allowed")]
    BlockedHost,
    #[error("Access to local/internal domains is not allowed")]
    BlockedDomain,
    #[error("Access to private/internal IP addresses is not allowed")]
    PrivateIp,
}

/// Validate a URL before the server fetches it on a caller's behalf.
///
/// `None` stands for a missing or non-string input. On success the parsed URL
/// is handed back so callers don't parse twice.
pub fn validate_url_for_scraping(input: Option<&str>) -> Result<Url, UrlRejection> {
    let raw = input.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(UrlRejection::Missing);
    }

    let url = Url::parse(raw).map_err(|_| UrlRejection::Malformed)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlRejection::Protocol);
    }

    let hostname = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(UrlRejection::Malformed)?
        .to_lowercase();

    if BLOCKED_HOSTNAMES.contains(&hostname.as_str()) {
        return Err(UrlRejection::BlockedHost);
    }

    if BLOCKED_SUFFIXES.iter().any(|s| hostname.ends_with(s)) {
        return Err(UrlRejection::BlockedDomain);
    }

    if looks_like_ip(&hostname) && is_private_ip(&hostname) {
        return Err(UrlRejection::PrivateIp);
    }

    Ok(url)
}

// Deliberately loose: a false positive only costs one more check
fn looks_like_ip(hostname: &str) -> bool {
    IPV4_LIKE.is_match(hostname) || IPV6_LIKE.is_match(hostname)
}

fn is_private_ip(hostname: &str) -> bool {
    let bare = hostname.trim_start_matches('[').trim_end_matches(']');
    PRIVATE_RANGES.iter().any(|re| re.is_match(bare))
}
