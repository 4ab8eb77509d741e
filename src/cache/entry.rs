//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

// == Cache Entry ==
/// A cached response together with when it was stored and how long it lives.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// The cached value
    pub data: T,
    /// Time the entry was stored (Unix milliseconds)
    pub timestamp: u64,
    /// Lifetime in milliseconds
    pub expires_in: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry stored at `now_ms`.
    pub fn new(data: T, now_ms: u64, expires_in: u64) -> Self {
        Self {
            data,
            timestamp: now_ms,
            expires_in,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// Boundary condition: the entry is still valid when exactly `expires_in`
    /// milliseconds have elapsed, and expired one millisecond later.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.timestamp) > self.expires_in
    }

    // == Time To Live ==
    /// Returns remaining lifetime in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.timestamp);
        self.expires_in.saturating_sub(elapsed)
    }
}
