//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the app is mounted.
//!
//! # Tasks
//! - Status poller: refreshes the Square connection status and sweeps expired
//!   cache entries at a fixed interval

mod poller;

pub use poller::spawn_status_poller;
