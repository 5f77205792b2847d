//! Per-client sliding-window rate limiting.
//!
//! An injected component with an owned, bounded time-window structure:
//! one `VecDeque` of admission instants per client key, pruned on every
//! check. State lives in memory only and resets with the process.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: usize,
    hits: HashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            hits: HashMap::new(),
        }
    }

    /// Admit or reject a request from `key` right now.
    pub fn check(&mut self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    /// Admit or reject at an explicit instant. Rejected requests are not
    /// recorded, so a hammering client recovers as soon as the window
    /// rolls past its admitted requests.
    pub fn check_at(&mut self, key: &str, now: Instant) -> bool {
        let timestamps = self.hits.entry(key.to_string()).or_default();
        while let Some(&front) = timestamps.front() {
            if now.duration_since(front) >= self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        if timestamps.len() >= self.max_requests {
            return false;
        }
        timestamps.push_back(now);
        true
    }

    /// Drop clients whose admitted requests have all expired.
    pub fn sweep(&mut self, now: Instant) {
        let window = self.window;
        self.hits.retain(|_, timestamps| {
            while let Some(&front) = timestamps.front() {
                if now.duration_since(front) >= window {
                    timestamps.pop_front();
                } else {
                    break;
                }
            }
            !timestamps.is_empty()
        });
    }

    pub fn tracked_clients(&self) -> usize {
        self.hits.len()
    }
}
