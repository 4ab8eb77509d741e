//! Cache Module
//!
//! Provides the in-memory response cache with TTL expiration and explicit
//! invalidation.

mod clock;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::TtlCache;

// == Public Constants ==
/// TTL applied when a caller stores an entry without one
pub const DEFAULT_TTL_MS: u64 = 5 * 60 * 1000;
