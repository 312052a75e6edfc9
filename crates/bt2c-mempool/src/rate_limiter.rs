//! DoS guard: a separate, non-blocking admission-rate check.
//!
//! Kept as its own port so the driver never blocks on it — admission
//! just asks "would this exceed the sender's rate" and gets a yes/no,
//! no shared lock with block production or network I/O.

use std::collections::HashMap;

use bt2c_crypto::Address;

/// A per-sender admission rate guard, consulted by [`crate::Mempool::admit`]
/// before any other check.
pub trait RateLimiter: Send + Sync {
    /// Record an admission attempt from `sender` at `now` and report
    /// whether it should be allowed.
    fn check(&mut self, sender: &Address, now: u64) -> bool;
}

/// A fixed-window token-bucket limiter: each sender gets `max_per_window`
/// admissions per `window_secs`.
#[derive(Debug)]
pub struct TokenBucketLimiter {
    max_per_window: u32,
    window_secs: u64,
    windows: HashMap<Address, (u64, u32)>,
}

impl TokenBucketLimiter {
    /// Allow up to `max_per_window` admissions per `window_secs` for
    /// each sender.
    pub fn new(max_per_window: u32, window_secs: u64) -> Self {
        Self {
            max_per_window,
            window_secs,
            windows: HashMap::new(),
        }
    }
}

impl RateLimiter for TokenBucketLimiter {
    fn check(&mut self, sender: &Address, now: u64) -> bool {
        let entry = self.windows.entry(*sender).or_insert((now, 0));
        if now.saturating_sub(entry.0) >= self.window_secs {
            *entry = (now, 0);
        }
        if entry.1 >= self.max_per_window {
            return false;
        }
        entry.1 += 1;
        true
    }
}

/// A limiter that never rejects, for tests and single-node devnets
/// where DoS protection is out of scope.
#[derive(Debug, Default)]
pub struct NoopLimiter;

impl RateLimiter for NoopLimiter {
    fn check(&mut self, _sender: &Address, _now: u64) -> bool {
        true
    }
}
