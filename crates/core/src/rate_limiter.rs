use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A sliding-window rate limiter keyed by client id (a session id or a client address).
///
/// A window of one message per few seconds gives the "please wait" throttle of
/// the chat UI.
pub struct RateLimiter {
    requests: HashMap<String, Vec<Instant>>,
    limit: usize,
    window: Duration,
}

impl RateLimiter {
    /// Allows `limit` requests per `window` for each id.
    pub fn new(limit: usize, window: Duration) -> Self {
        RateLimiter {
            requests: HashMap::new(),
            limit,
            window,
        }
    }

    /// Records the request and returns `true` if `id` is still within its limit.
    pub fn check(&mut self, id: &str) -> bool {
        self.check_at(id, Instant::now())
    }

    fn check_at(&mut self, id: &str, now: Instant) -> bool {
        let recent = self.requests.entry(id.to_string()).or_default();
        recent.retain(|&t| now.duration_since(t) < self.window);

        if recent.len() < self.limit {
            recent.push(now);
            true
        } else {
            false
        }
    }

    /// Drops ids with no requests inside the window.
    pub fn prune(&mut self) {
        let now = Instant::now();
        let window = self.window;
        self.requests
            .retain(|_, times| times.iter().any(|&t| now.duration_since(t) < window));
    }

    pub fn tracked_ids(&self) -> usize {
        self.requests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_message_per_window() {
        let mut limiter = RateLimiter::new(1, Duration::from_secs(5));
        let start = Instant::now();
        assert!(limiter.check_at("session", start));
        assert!(!limiter.check_at("session", start + Duration::from_secs(2)));
        assert!(limiter.check_at("session", start + Duration::from_secs(5)));
    }

    #[test]
    fn test_ids_are_independent() {
        let mut limiter = RateLimiter::new(1, Duration::from_secs(5));
        assert!(limiter.check("a"));
        assert!(limiter.check("b"));
        assert!(!limiter.check("a"));
    }

    #[test]
    fn test_limit_above_one() {
        let mut limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(limiter.check("client"));
        }
        assert!(!limiter.check("client"));
    }

    #[test]
    fn test_prune_drops_idle_ids() {
        let mut limiter = RateLimiter::new(1, Duration::from_millis(1));
        limiter.check("idle");
        std::thread::sleep(Duration::from_millis(5));
        limiter.prune();
        assert_eq!(limiter.tracked_ids(), 0);
    }
}
