use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Rate limit entry - tracks requests per IP/key inside the current window
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_time: Instant,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

/// Outcome of one rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    /// Seconds until the window resets, rounded up
    pub reset_in: u64,
}

// Time source, swappable so tests can move time by hand
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Fixed window limiter keyed by client identity.
///
/// State lives in process memory only, so a restart forgets every window.
/// Running several instances would need a shared store instead.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            clock,
        }
    }

    // Record one request for `identity` and decide whether it may go through.
    // The entry guard holds the shard lock, so read-compare-increment is atomic
    // per key.
    pub fn check(&self, identity: &str) -> RateLimitResult {
        let now = self.clock.now();

        let mut entry = self
            .entries
            .entry(identity.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                reset_time: now,
            });

        // new key or window expired..? start a fresh one
        if entry.count == 0 || now > entry.reset_time {
            entry.count = 1;
            entry.reset_time = now + self.config.window;
            return RateLimitResult {
                allowed: true,
                remaining: self.config.max_requests.saturating_sub(1),
                reset_in: ceil_secs(self.config.window),
            };
        }

        entry.count = entry.count.saturating_add(1);
        let reset_in = ceil_secs(entry.reset_time.saturating_duration_since(now));

        // the request that reaches the limit is still allowed, only the next one is not
        if entry.count > self.config.max_requests {
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_in,
            };
        }

        RateLimitResult {
            allowed: true,
            remaining: self.config.max_requests - entry.count,
            reset_in,
        }
    }

    /// Headers describing the caller's quota, attached to every response.
    pub fn headers(&self, result: &RateLimitResult) -> [(&'static str, String); 3] {
        [
            ("X-RateLimit-Limit", self.config.max_requests.to_string()),
            ("X-RateLimit-Remaining", result.remaining.to_string()),
            ("X-RateLimit-Reset", result.reset_in.to_string()),
        ]
    }

    // Drop every entry whose window has passed; returns how many went
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = now <= entry.reset_time;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_millis().div_ceil(1000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ManualClock {
        start: Instant,
        offset: Mutex<Duration>,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                start: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
            })
        }

        fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.start + *self.offset.lock().unwrap()
        }
    }

    fn limiter(clock: Arc<ManualClock>) -> RateLimiter {
        RateLimiter::with_clock(RateLimitConfig::default(), clock)
    }

    #[test]
    fn allows_up_to_the_limit_then_denies() {
        let rl = limiter(ManualClock::new());

        for expected_remaining in (0..10).rev() {
            let result = rl.check("1.2.3.4");
            assert!(result.allowed);
            assert_eq!(result.remaining, expected_remaining);
            assert_eq!(result.reset_in, 60);
        }

        let denied = rl.check("1.2.3.4");
        assert_eq!(
            denied,
            RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_in: 60,
            }
        );
    }

    #[test]
    fn reset_in_counts_down_and_rounds_up() {
        let clock = ManualClock::new();
        let rl = limiter(clock.clone());

        rl.check("a");
        clock.advance(Duration::from_millis(17_500));
        assert_eq!(rl.check("a").reset_in, 43);
        clock.advance(Duration::from_millis(42_000));
        assert_eq!(rl.check("a").reset_in, 1);
    }

    #[test]
    fn window_expiry_starts_a_fresh_count() {
        let clock = ManualClock::new();
        let rl = limiter(clock.clone());

        for _ in 0..11 {
            rl.check("a");
        }
        assert!(!rl.check("a").allowed);

        clock.advance(Duration::from_secs(61));
        let result = rl.check("a");
        assert!(result.allowed);
        assert_eq!(result.remaining, 9);
        assert_eq!(result.reset_in, 60);
    }

    #[test]
    fn identities_do_not_share_quota() {
        let rl = limiter(ManualClock::new());

        for _ in 0..15 {
            rl.check("noisy");
        }
        assert!(!rl.check("noisy").allowed);

        let other = rl.check("quiet");
        assert!(other.allowed);
        assert_eq!(other.remaining, 9);
    }

    #[test]
    fn sweep_only_drops_expired_windows() {
        let clock = ManualClock::new();
        let rl = limiter(clock.clone());

        rl.check("old");
        clock.advance(Duration::from_secs(30));
        rl.check("new");
        assert_eq!(rl.sweep(), 0);

        clock.advance(Duration::from_secs(31));
        assert_eq!(rl.sweep(), 1);
        assert_eq!(rl.len(), 1);

        // swept identity starts over
        assert_eq!(rl.check("old").remaining, 9);
    }

    #[test]
    fn headers_render_quota() {
        let rl = RateLimiter::new(RateLimitConfig::default());
        let headers = rl.headers(&RateLimitResult {
            allowed: true,
            remaining: 7,
            reset_in: 42,
        });
        assert_eq!(
            headers,
            [
                ("X-RateLimit-Limit", "10".to_string()),
                ("X-RateLimit-Remaining", "7".to_string()),
                ("X-RateLimit-Reset", "42".to_string()),
            ]
        );
    }

    #[test]
    fn concurrent_checks_never_undercount() {
        let rl = Arc::new(RateLimiter::new(RateLimitConfig {
            max_requests: 50,
            window: Duration::from_secs(60),
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let rl = Arc::clone(&rl);
                std::thread::spawn(move || (0..25).filter(|_| rl.check("shared").allowed).count())
            })
            .collect();

        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, 50);
    }
}
