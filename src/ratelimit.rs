// ABOUTME: Token-bucket rate limiter for outbound batch embedding calls
// ABOUTME: Replaces fixed inter-batch sleeps with a tunable refill rate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! A small token bucket used by the embedding seeder to respect the
//! provider's rate limit. Decoupled from the batching logic so throughput
//! is tuned by capacity and refill rate, not by editing sleeps. Built on
//! `tokio::time` so tests can drive it with a paused clock.

use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Token bucket: `capacity` tokens maximum, refilled at `refill_per_sec`
#[derive(Debug)]
pub struct TokenBucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` or `refill_per_sec` is not positive.
    #[must_use]
    pub fn new(capacity: f64, refill_per_sec: f64) -> Self {
        assert!(capacity > 0.0, "capacity must be positive");
        assert!(refill_per_sec > 0.0, "refill rate must be positive");
        Self {
            capacity,
            tokens: capacity,
            refill_per_sec,
            last_refill: Instant::now(),
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;
    }

    /// Acquire `cost` tokens, sleeping until the bucket refills enough.
    ///
    /// Costs above capacity are clamped so the call can always complete.
    pub async fn acquire(&mut self, cost: f64) {
        let cost = cost.min(self.capacity);
        loop {
            self.refill();
            if self.tokens >= cost {
                self.tokens -= cost;
                return;
            }
            let deficit = cost - self.tokens;
            let wait = Duration::from_secs_f64(deficit / self.refill_per_sec);
            sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_full_bucket_does_not_wait() {
        let mut bucket = TokenBucket::new(5.0, 1.0);
        let start = Instant::now();
        bucket.acquire(5.0).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_bucket_waits_for_refill() {
        let mut bucket = TokenBucket::new(2.0, 1.0);
        bucket.acquire(2.0).await;

        let start = Instant::now();
        bucket.acquire(2.0).await;
        // must wait roughly 2 seconds to refill 2 tokens at 1/s
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_cost_is_clamped_to_capacity() {
        let mut bucket = TokenBucket::new(1.0, 1.0);
        bucket.acquire(100.0).await;
        // bucket drained but the call completed
        let start = Instant::now();
        bucket.acquire(1.0).await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }
}
