//! Per-client request admission
//!
//! Each client gets a counter that resets once its window has run out. This
//! is a resetting window, not a sliding one: a client may spend its full
//! quota at the end of one window and again right after the reset.
//! Window state is kept for every client ever seen and is never purged.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{trace, warn};

use crate::config::RateLimitConfig;

/// Request count for one client in its current window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    pub count: u32,
    pub window_start: Instant,
}

impl RateWindow {
    fn fresh(now: Instant) -> Self {
        Self {
            count: 1,
            window_start: now,
        }
    }
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    /// `retry_after` is the time left until the client's window resets
    Rejected { retry_after: Duration },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

pub struct RateLimiter {
    windows: DashMap<String, RateWindow>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit or reject one request from `client_id`
    pub fn admit(&self, client_id: &str) -> Admission {
        self.admit_at(client_id, Instant::now())
    }

    /// Same as [`admit`](Self::admit) with an explicit clock reading
    pub fn admit_at(&self, client_id: &str, now: Instant) -> Admission {
        // Check and update happen under one shard lock
        match self.windows.entry(client_id.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(RateWindow::fresh(now));
                Admission::Admitted
            }
            Entry::Occupied(mut slot) => {
                let state = slot.get_mut();
                let elapsed = now.saturating_duration_since(state.window_start);

                if elapsed > self.window {
                    trace!("Rate window reset for {}", client_id);
                    *state = RateWindow::fresh(now);
                    Admission::Admitted
                } else if state.count >= self.max_requests {
                    warn!(
                        "Rate limit exceeded for client: {} ({} requests in {:?})",
                        client_id, state.count, elapsed
                    );
                    Admission::Rejected {
                        retry_after: self.window - elapsed,
                    }
                } else {
                    state.count += 1;
                    Admission::Admitted
                }
            }
        }
    }

    /// Snapshot of a client's current window
    pub fn window_of(&self, client_id: &str) -> Option<RateWindow> {
        self.windows.get(client_id).map(|w| *w)
    }

    /// Number of clients with recorded window state
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_fourth_request_rejected() {
        let limiter = RateLimiter::new(3, MINUTE);
        let start = Instant::now();

        let outcomes: Vec<bool> = (0..4)
            .map(|i| {
                limiter
                    .admit_at("10.0.0.1", start + Duration::from_secs(i))
                    .is_admitted()
            })
            .collect();
        assert_eq!(outcomes, vec![true, true, true, false]);
    }

    #[test]
    fn test_rejection_does_not_count() {
        let limiter = RateLimiter::new(2, MINUTE);
        let start = Instant::now();
        for _ in 0..5 {
            limiter.admit_at("c", start);
        }
        assert_eq!(limiter.window_of("c").unwrap().count, 2);
    }

    #[test]
    fn test_retry_after() {
        let limiter = RateLimiter::new(1, MINUTE);
        let start = Instant::now();
        limiter.admit_at("c", start);

        assert_eq!(
            limiter.admit_at("c", start + Duration::from_secs(15)),
            Admission::Rejected {
                retry_after: Duration::from_secs(45)
            }
        );
    }

    #[test]
    fn test_window_reset_after_expiry() {
        let limiter = RateLimiter::new(3, MINUTE);
        let start = Instant::now();
        for _ in 0..3 {
            assert!(limiter.admit_at("c", start).is_admitted());
        }
        assert!(!limiter.admit_at("c", start).is_admitted());

        let later = start + MINUTE + Duration::from_millis(1);
        assert!(limiter.admit_at("c", later).is_admitted());

        let window = limiter.window_of("c").unwrap();
        assert_eq!(window.count, 1);
        assert_eq!(window.window_start, later);
    }

    #[test]
    fn test_boundary_is_still_same_window() {
        // Exactly one window later is still the same window
        let limiter = RateLimiter::new(1, MINUTE);
        let start = Instant::now();
        limiter.admit_at("c", start);
        assert!(!limiter.admit_at("c", start + MINUTE).is_admitted());
    }

    #[test]
    fn test_burst_across_reset_is_allowed() {
        let limiter = RateLimiter::new(3, MINUTE);
        let start = Instant::now();
        let end_of_window = start + Duration::from_secs(59);
        let next_window = start + Duration::from_secs(61);

        assert!(limiter.admit_at("c", start).is_admitted());
        assert!(limiter.admit_at("c", end_of_window).is_admitted());
        assert!(limiter.admit_at("c", end_of_window).is_admitted());
        // New window starts at 61s and admits 3 more
        for _ in 0..3 {
            assert!(limiter.admit_at("c", next_window).is_admitted());
        }
        assert!(!limiter.admit_at("c", next_window).is_admitted());
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1, MINUTE);
        let now = Instant::now();
        assert!(limiter.admit_at("a", now).is_admitted());
        assert!(!limiter.admit_at("a", now).is_admitted());
        assert!(limiter.admit_at("b", now).is_admitted());
    }

    #[test]
    fn test_window_state_is_never_purged() {
        let limiter = RateLimiter::new(10, Duration::from_secs(1));
        let start = Instant::now();
        for i in 0..500 {
            limiter.admit_at(&format!("client-{}", i), start);
        }
        assert_eq!(limiter.tracked_clients(), 500);

        // State survives after every window has expired
        let much_later = start + Duration::from_secs(3600);
        limiter.admit_at("client-0", much_later);
        assert_eq!(limiter.tracked_clients(), 500);
        assert!(limiter.window_of("client-499").is_some());
    }
}
