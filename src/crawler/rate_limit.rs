//! Request pacing for a downloader
//!
//! Allows at most `max_calls` requests within any sliding window of
//! `period`. Each downloader owns one limiter, so archive and article traffic
//! are paced independently.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Sliding-window rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    max_calls: u32,
    period: Duration,

    /// Start times of the calls still inside the window, oldest first
    calls: VecDeque<Instant>,
}

impl RateLimiter {
    /// Creates a limiter; `max_calls == 0` disables limiting
    pub fn new(max_calls: u32, period: Duration) -> Self {
        Self {
            max_calls,
            period,
            calls: VecDeque::with_capacity(max_calls as usize),
        }
    }

    /// Unlimited pacing, for tests and cache-only runs
    pub fn unlimited() -> Self {
        Self::new(0, Duration::ZERO)
    }

    fn expire(&mut self, now: Instant) {
        while let Some(oldest) = self.calls.front() {
            if now.duration_since(*oldest) >= self.period {
                self.calls.pop_front();
            } else {
                break;
            }
        }
    }

    /// Checks if a call can be made at `now`
    pub fn can_call(&mut self, now: Instant) -> bool {
        self.time_until_next_call(now).is_none()
    }

    /// Calculates the time until the next call can be made
    ///
    /// Returns None if a call can be made now, or the duration to wait
    /// otherwise.
    pub fn time_until_next_call(&mut self, now: Instant) -> Option<Duration> {
        if self.max_calls == 0 {
            return None;
        }

        self.expire(now);
        if (self.calls.len() as u32) < self.max_calls {
            return None;
        }

        self.calls
            .front()
            .map(|oldest| self.period.saturating_sub(now.duration_since(*oldest)))
    }

    /// Records that a call was made at `now`
    pub fn record_call(&mut self, now: Instant) {
        if self.max_calls == 0 {
            return;
        }
        self.expire(now);
        self.calls.push_back(now);
    }

    /// Waits until a call is allowed, then records it
    pub async fn acquire(&mut self) {
        loop {
            let now = Instant::now();
            match self.time_until_next_call(now) {
                None => {
                    self.record_call(now);
                    return;
                }
                Some(wait) => {
                    tracing::trace!("Rate limit reached, waiting {:?}", wait);
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Number of calls inside the current window
    pub fn calls_in_window(&mut self, now: Instant) -> usize {
        self.expire(now);
        self.calls.len()
    }
}
