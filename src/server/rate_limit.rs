//! Per-caller request ceiling for the HTTP transport.
//!
//! Fixed windows: each caller IP gets `max_requests` per time bucket of
//! `window` length. Counters live in a mutex-guarded map keyed by
//! `(ip, bucket)`; buckets older than the current one are evicted as soon as
//! a new bucket begins, so memory stays bounded by the callers seen in one
//! window.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::debug;

#[derive(Debug, Default)]
struct Buckets {
    current: u64,
    counts: HashMap<(IpAddr, u64), u32>,
}

/// Fixed-window rate limiter keyed by caller IP.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window_secs: u64,
    buckets: Mutex<Buckets>,
}

impl RateLimiter {
    /// `max_requests` per `window`. Windows shorter than a second count as one second.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window_secs: window.as_secs().max(1),
            buckets: Mutex::new(Buckets::default()),
        }
    }

    /// Records a request from `ip` now. Returns false if it exceeds the ceiling.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.check_at(ip, now_secs)
    }

    /// Records a request from `ip` at `now_secs` (seconds since the Unix epoch).
    pub fn check_at(&self, ip: IpAddr, now_secs: u64) -> bool {
        let bucket = now_secs / self.window_secs;
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);

        if bucket != buckets.current {
            let before = buckets.counts.len();
            buckets.counts.retain(|(_, b), _| *b >= bucket);
            buckets.current = bucket;
            let evicted = before - buckets.counts.len();
            if evicted > 0 {
                debug!("Rate limiter evicted {evicted} stale bucket(s)");
            }
        }

        let count = buckets.counts.entry((ip, bucket)).or_insert(0);
        if *count >= self.max_requests {
            return false;
        }
        *count += 1;
        true
    }

    /// Number of `(ip, bucket)` counters currently held.
    pub fn tracked_buckets(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .counts
            .len()
    }
}
