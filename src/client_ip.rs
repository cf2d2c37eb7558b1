use axum::http::HeaderMap;
use std::net::SocketAddr;

// Shared bucket for callers we can't tell apart
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Work out the rate limit identity of a caller.
///
/// Behind a proxy the first `X-Forwarded-For` hop wins, then `X-Real-IP`.
/// Without proxy trust the socket address is used. Either way a caller we
/// can't identify lands in the `"unknown"` bucket.
pub fn client_identity(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_proxy: bool,
) -> String {
    if !trust_proxy {
        return peer
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| UNKNOWN_IDENTITY.to_string());
    }

    let forwarded = header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or_else(|| header_str(headers, "x-real-ip").map(str::trim).filter(|v| !v.is_empty()))
        .unwrap_or(UNKNOWN_IDENTITY)
        .to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn peer() -> Option<SocketAddr> {
        Some(SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 4242))
    }

    #[test]
    fn first_forwarded_hop_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-For", " 203.0.113.50 , 70.41.3.18".parse().unwrap());
        headers.insert("X-Real-IP", "198.51.100.25".parse().unwrap());
        assert_eq!(client_identity(&headers, peer(), true), "203.0.113.50");
    }

    #[test]
    fn real_ip_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Real-IP", "198.51.100.25".parse().unwrap());
        assert_eq!(client_identity(&headers, peer(), true), "198.51.100.25");

        headers.insert("X-Forwarded-For", "".parse().unwrap());
        assert_eq!(client_identity(&headers, peer(), true), "198.51.100.25");
    }

    #[test]
    fn no_headers_means_unknown() {
        assert_eq!(client_identity(&HeaderMap::new(), peer(), true), "unknown");
    }

    #[test]
    fn untrusted_proxy_uses_socket_address() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-For", "203.0.113.50".parse().unwrap());
        assert_eq!(client_identity(&headers, peer(), false), "10.0.0.1");
        assert_eq!(client_identity(&headers, None, false), "unknown");
    }
}
